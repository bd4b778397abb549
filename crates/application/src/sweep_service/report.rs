use secret_sweep_core::{ProjectId, RunId};
use secret_sweep_domain::{ExecutionMode, SecretName, VersionName};

/// Actions taken (or, in dry-run, intended) for one secret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretSweepReport {
    /// Swept secret.
    pub secret: SecretName,
    /// Mode the actions were computed under.
    pub mode: ExecutionMode,
    /// Surviving enabled version, if the secret had any.
    pub latest: Option<VersionName>,
    /// Versions disabled in the disable phase.
    pub disabled: Vec<VersionName>,
    /// Versions destroyed in the destroy phase.
    pub destroyed: Vec<VersionName>,
}

impl SecretSweepReport {
    pub(crate) fn new(secret: SecretName, mode: ExecutionMode) -> Self {
        Self {
            secret,
            mode,
            latest: None,
            disabled: Vec::new(),
            destroyed: Vec::new(),
        }
    }

    /// Returns whether the secret was already at steady state.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.disabled.is_empty() && self.destroyed.is_empty()
    }
}

/// Secret that failed and was skipped under the skip-secret failure policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedSecret {
    /// Secret that failed.
    pub secret: SecretName,
    /// Rendered failure.
    pub reason: String,
}

/// Outcome of sweeping every secret in a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSweepReport {
    /// Run identifier shared by all emitted events.
    pub run_id: RunId,
    /// Swept project.
    pub project: ProjectId,
    /// Mode the run used.
    pub mode: ExecutionMode,
    /// Per-secret reports in listing order.
    pub secrets: Vec<SecretSweepReport>,
    /// Secrets that failed and were skipped.
    pub skipped: Vec<SkippedSecret>,
}

impl ProjectSweepReport {
    pub(crate) fn new(run_id: RunId, project: ProjectId, mode: ExecutionMode) -> Self {
        Self {
            run_id,
            project,
            mode,
            secrets: Vec::new(),
            skipped: Vec::new(),
        }
    }

    /// Returns the number of versions disabled across all secrets.
    #[must_use]
    pub fn total_disabled(&self) -> usize {
        self.secrets.iter().map(|report| report.disabled.len()).sum()
    }

    /// Returns the number of versions destroyed across all secrets.
    #[must_use]
    pub fn total_destroyed(&self) -> usize {
        self.secrets.iter().map(|report| report.destroyed.len()).sum()
    }
}
