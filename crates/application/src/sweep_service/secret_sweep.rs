use secret_sweep_core::AppResult;
use secret_sweep_domain::{
    SecretName, VersionName, VersionRecord, VersionState, select_for_destruction,
    select_latest_and_others, sort_newest_first,
};
use tracing::{debug, info};

use crate::sweep_ports::SweepEventKind;

use super::{SecretSweepReport, SecretSweepService};

impl SecretSweepService {
    /// Sweeps one secret: disable phase, then destroy phase.
    ///
    /// The destroy phase lists disabled versions again after the disable
    /// phase has finished so that freshly disabled versions are counted.
    /// In dry-run the versions that would have been disabled are merged into
    /// that listing, which keeps dry-run selections identical to live ones.
    /// Any store failure is returned immediately; nothing is retried.
    pub async fn sweep_secret(&self, secret: &SecretName) -> AppResult<SecretSweepReport> {
        let mode = self.config.mode();
        let mut report = SecretSweepReport::new(secret.clone(), mode);

        let enabled = self
            .store
            .list_versions(secret, VersionState::Enabled)
            .await?;
        debug!(
            secret = %secret,
            count = enabled.len(),
            versions = ?version_names(&enabled),
            "enabled versions found"
        );

        let selection = select_latest_and_others(enabled);
        if let Some(latest) = &selection.latest {
            report.latest = Some(latest.name().clone());
            self.emit(
                self.event(
                    SweepEventKind::LatestVersionIdentified,
                    format!(
                        "latest version identified: {} (created {})",
                        latest.name(),
                        latest.create_time()
                    ),
                )
                .with_secret(secret.clone())
                .with_version(latest.name().clone()),
            )
            .await;
        }

        for version in &selection.others {
            self.disable(secret, version).await?;
            report.disabled.push(version.name().clone());
        }

        let mut disabled = self
            .store
            .list_versions(secret, VersionState::Disabled)
            .await?;
        if mode.is_dry_run() {
            for pending in &selection.others {
                if !disabled
                    .iter()
                    .any(|version| version.name() == pending.name())
                {
                    disabled.push(pending.with_state(VersionState::Disabled));
                }
            }
        }
        sort_newest_first(&mut disabled);
        debug!(
            secret = %secret,
            count = disabled.len(),
            versions = ?version_names(&disabled),
            "disabled versions found"
        );

        for version in select_for_destruction(&disabled, self.config.retention()) {
            self.destroy(secret, &version).await?;
            report.destroyed.push(version.name().clone());
        }

        info!(
            run_id = %self.run_id,
            secret = %secret,
            mode = mode.as_str(),
            disabled = report.disabled.len(),
            destroyed = report.destroyed.len(),
            "secret swept"
        );

        Ok(report)
    }

    async fn disable(&self, secret: &SecretName, version: &VersionRecord) -> AppResult<()> {
        if self.config.mode().is_dry_run() {
            self.emit(
                self.event(
                    SweepEventKind::WouldDisable,
                    format!("would disable secret version: {}", version.name()),
                )
                .with_secret(secret.clone())
                .with_version(version.name().clone()),
            )
            .await;
            return Ok(());
        }

        let response = self.store.disable_version(version.name()).await?;
        debug!(version = %version.name(), response = ?response, "disable acknowledged");
        self.emit(
            self.event(
                SweepEventKind::VersionDisabled,
                format!("disabled secret version: {}", version.name()),
            )
            .with_secret(secret.clone())
            .with_version(version.name().clone()),
        )
        .await;

        Ok(())
    }

    async fn destroy(&self, secret: &SecretName, version: &VersionRecord) -> AppResult<()> {
        if self.config.mode().is_dry_run() {
            self.emit(
                self.event(
                    SweepEventKind::WouldDestroy,
                    format!("would destroy secret version: {}", version.name()),
                )
                .with_secret(secret.clone())
                .with_version(version.name().clone()),
            )
            .await;
            return Ok(());
        }

        let response = self.store.destroy_version(version.name()).await?;
        debug!(version = %version.name(), response = ?response, "destroy acknowledged");
        self.emit(
            self.event(
                SweepEventKind::VersionDestroyed,
                format!("destroyed secret version: {}", version.name()),
            )
            .with_secret(secret.clone())
            .with_version(version.name().clone()),
        )
        .await;

        Ok(())
    }
}

fn version_names(versions: &[VersionRecord]) -> Vec<&VersionName> {
    versions.iter().map(VersionRecord::name).collect()
}
