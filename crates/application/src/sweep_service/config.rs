use secret_sweep_core::ProjectId;
use secret_sweep_domain::{ExecutionMode, FailurePolicy, RetentionPolicy};

/// Immutable settings for one sweep run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepConfig {
    project: ProjectId,
    mode: ExecutionMode,
    retention: RetentionPolicy,
    failure_policy: FailurePolicy,
}

impl SweepConfig {
    /// Creates a live, fail-fast configuration with the default keep-count.
    #[must_use]
    pub fn new(project: ProjectId) -> Self {
        Self {
            project,
            mode: ExecutionMode::default(),
            retention: RetentionPolicy::default(),
            failure_policy: FailurePolicy::default(),
        }
    }

    /// Sets the execution mode.
    #[must_use]
    pub fn with_mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the disabled-version retention policy.
    #[must_use]
    pub fn with_retention(mut self, retention: RetentionPolicy) -> Self {
        self.retention = retention;
        self
    }

    /// Sets the behavior when one secret fails.
    #[must_use]
    pub fn with_failure_policy(mut self, failure_policy: FailurePolicy) -> Self {
        self.failure_policy = failure_policy;
        self
    }

    /// Returns the project being swept.
    #[must_use]
    pub fn project(&self) -> &ProjectId {
        &self.project
    }

    /// Returns the execution mode.
    #[must_use]
    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    /// Returns the retention policy.
    #[must_use]
    pub fn retention(&self) -> RetentionPolicy {
        self.retention
    }

    /// Returns the failure policy.
    #[must_use]
    pub fn failure_policy(&self) -> FailurePolicy {
        self.failure_policy
    }
}
