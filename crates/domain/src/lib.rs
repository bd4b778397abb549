//! Domain entities and version-retention invariants.

#![forbid(unsafe_code)]

mod execution;
mod retention;
mod secret;
mod selection;
mod version;

pub use execution::{ExecutionMode, FailurePolicy};
pub use retention::{
    DEFAULT_KEEP_DISABLED_COUNT, RetentionPolicy, select_for_destruction, sort_newest_first,
};
pub use secret::{SecretName, VersionName};
pub use selection::{VersionSelection, select_latest_and_others};
pub use version::{CreateTime, VersionRecord, VersionState};
