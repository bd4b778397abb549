use serde::{Deserialize, Serialize};

/// Whether a run applies mutations or only reports them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// Disable and destroy requests are sent to the store.
    #[default]
    Live,
    /// Only listing calls reach the store; intended mutations are reported.
    DryRun,
}

impl ExecutionMode {
    /// Returns a stable label value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::DryRun => "dry_run",
        }
    }

    /// Returns whether mutating store calls are suppressed.
    #[must_use]
    pub fn is_dry_run(&self) -> bool {
        matches!(self, Self::DryRun)
    }
}

/// What a project run does when sweeping one secret fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// The first failure aborts the whole run.
    #[default]
    FailFast,
    /// The failing secret is recorded as skipped and the run continues.
    SkipSecret,
}

impl FailurePolicy {
    /// Returns a stable label value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FailFast => "fail_fast",
            Self::SkipSecret => "skip_secret",
        }
    }
}
