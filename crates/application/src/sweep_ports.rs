mod events;
mod store;

pub use events::{SweepEvent, SweepEventKind, SweepEventSink};
pub use store::SecretVersionStore;
