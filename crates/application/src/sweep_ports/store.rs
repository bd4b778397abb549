use async_trait::async_trait;
use secret_sweep_core::{AppResult, ProjectId};
use secret_sweep_domain::{SecretName, VersionName, VersionRecord, VersionState};

/// Port for the secret-version catalog.
///
/// Listing operations drain every page before returning; callers never see
/// partial results.
#[async_trait]
pub trait SecretVersionStore: Send + Sync {
    /// Lists every secret under the project, in store order.
    async fn list_secrets(&self, project: &ProjectId) -> AppResult<Vec<SecretName>>;

    /// Lists the versions of one secret currently in `state`.
    async fn list_versions(
        &self,
        secret: &SecretName,
        state: VersionState,
    ) -> AppResult<Vec<VersionRecord>>;

    /// Moves an enabled version to disabled and returns the store's view of it.
    async fn disable_version(&self, version: &VersionName) -> AppResult<VersionRecord>;

    /// Irreversibly destroys a version and returns the store's view of it.
    async fn destroy_version(&self, version: &VersionName) -> AppResult<VersionRecord>;

    /// Reads the raw payload of one version.
    async fn access_version_payload(&self, version: &VersionName) -> AppResult<Vec<u8>>;
}
