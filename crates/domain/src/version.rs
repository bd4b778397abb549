use std::fmt::{Display, Formatter};
use std::str::FromStr;

use secret_sweep_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

use crate::secret::VersionName;

const NANOS_PER_SECOND: i32 = 1_000_000_000;

/// Lifecycle state of one secret version.
///
/// Forward transitions only: `Enabled -> Disabled -> Destroyed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VersionState {
    /// Version payload is accessible.
    Enabled,
    /// Version is hidden but retained.
    Disabled,
    /// Version payload is permanently gone.
    Destroyed,
}

impl VersionState {
    /// Returns the stable wire value for this state.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Enabled => "ENABLED",
            Self::Disabled => "DISABLED",
            Self::Destroyed => "DESTROYED",
        }
    }

    /// Returns whether a version in this state may move to `next`.
    #[must_use]
    pub fn can_transition_to(&self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Enabled, Self::Disabled)
                | (Self::Enabled, Self::Destroyed)
                | (Self::Disabled, Self::Destroyed)
        )
    }
}

impl Display for VersionState {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for VersionState {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "ENABLED" => Ok(Self::Enabled),
            "DISABLED" => Ok(Self::Disabled),
            "DESTROYED" => Ok(Self::Destroyed),
            _ => Err(AppError::Validation(format!(
                "unknown version state value '{value}'"
            ))),
        }
    }
}

/// Creation timestamp of a version, ordered by seconds then nanos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CreateTime {
    seconds: i64,
    nanos: i32,
}

impl CreateTime {
    /// Creates a timestamp from unix seconds and a sub-second nanos part.
    pub fn new(seconds: i64, nanos: i32) -> AppResult<Self> {
        if !(0..NANOS_PER_SECOND).contains(&nanos) {
            return Err(AppError::Validation(format!(
                "create time nanos must be in 0..{NANOS_PER_SECOND}, got {nanos}"
            )));
        }

        Ok(Self { seconds, nanos })
    }

    /// Returns unix seconds.
    #[must_use]
    pub fn seconds(&self) -> i64 {
        self.seconds
    }

    /// Returns the sub-second nanos part.
    #[must_use]
    pub fn nanos(&self) -> i32 {
        self.nanos
    }
}

impl Display for CreateTime {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}.{:09}", self.seconds, self.nanos)
    }
}

/// Read-only snapshot of one version as returned by a store listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionRecord {
    name: VersionName,
    create_time: CreateTime,
    state: VersionState,
}

impl VersionRecord {
    /// Creates a version snapshot.
    #[must_use]
    pub fn new(name: VersionName, create_time: CreateTime, state: VersionState) -> Self {
        Self {
            name,
            create_time,
            state,
        }
    }

    /// Returns the fully-qualified version name.
    #[must_use]
    pub fn name(&self) -> &VersionName {
        &self.name
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub fn create_time(&self) -> CreateTime {
        self.create_time
    }

    /// Returns the lifecycle state at listing time.
    #[must_use]
    pub fn state(&self) -> VersionState {
        self.state
    }

    /// Returns a copy of this snapshot in a new state.
    #[must_use]
    pub fn with_state(&self, state: VersionState) -> Self {
        Self {
            name: self.name.clone(),
            create_time: self.create_time,
            state,
        }
    }
}
