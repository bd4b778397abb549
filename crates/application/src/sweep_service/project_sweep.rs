use secret_sweep_core::AppResult;
use secret_sweep_domain::FailurePolicy;
use tracing::{info, warn};

use crate::sweep_ports::SweepEventKind;

use super::{ProjectSweepReport, SecretSweepService, SkippedSecret};

impl SecretSweepService {
    /// Sweeps every secret in the configured project, one at a time, in the
    /// order the store lists them.
    ///
    /// Under [`FailurePolicy::FailFast`] the first failing secret aborts the
    /// run. Under [`FailurePolicy::SkipSecret`] it is recorded and the run
    /// moves on. Failing to list the project's secrets always aborts.
    pub async fn run(&self) -> AppResult<ProjectSweepReport> {
        let project = self.config.project();
        let mode = self.config.mode();

        info!(
            run_id = %self.run_id,
            project = %project,
            mode = mode.as_str(),
            keep = self.config.retention().keep_disabled_count(),
            failure_policy = self.config.failure_policy().as_str(),
            "secret sweep started"
        );
        self.emit(self.event(
            SweepEventKind::RunStarted,
            format!(
                "sweep started for {} (mode {}, keep {})",
                project.resource_name(),
                mode.as_str(),
                self.config.retention().keep_disabled_count()
            ),
        ))
        .await;

        let secrets = self.store.list_secrets(project).await?;
        info!(
            run_id = %self.run_id,
            project = %project,
            secret_count = secrets.len(),
            "secrets listed"
        );

        let mut report = ProjectSweepReport::new(self.run_id, project.clone(), mode);
        for secret in secrets {
            match self.sweep_secret(&secret).await {
                Ok(secret_report) => report.secrets.push(secret_report),
                Err(error) => match self.config.failure_policy() {
                    FailurePolicy::FailFast => return Err(error),
                    FailurePolicy::SkipSecret => {
                        warn!(
                            run_id = %self.run_id,
                            secret = %secret,
                            error = %error,
                            "secret sweep failed, skipping"
                        );
                        self.emit(
                            self.event(
                                SweepEventKind::SecretSkipped,
                                format!("skipped secret after failure: {error}"),
                            )
                            .with_secret(secret.clone()),
                        )
                        .await;
                        report.skipped.push(SkippedSecret {
                            secret,
                            reason: error.to_string(),
                        });
                    }
                },
            }
        }

        info!(
            run_id = %self.run_id,
            project = %project,
            secrets = report.secrets.len(),
            skipped = report.skipped.len(),
            disabled = report.total_disabled(),
            destroyed = report.total_destroyed(),
            "secret sweep finished"
        );
        self.emit(self.event(
            SweepEventKind::RunFinished,
            format!(
                "sweep finished: {} secrets, {} disabled, {} destroyed, {} skipped",
                report.secrets.len(),
                report.total_disabled(),
                report.total_destroyed(),
                report.skipped.len()
            ),
        ))
        .await;

        Ok(report)
    }
}
