use std::collections::HashMap;

use async_trait::async_trait;
use secret_sweep_application::SecretVersionStore;
use secret_sweep_core::{AppError, AppResult, ProjectId};
use secret_sweep_domain::{
    CreateTime, SecretName, VersionName, VersionRecord, VersionState, sort_newest_first,
};
use tokio::sync::RwLock;

/// One mutating call observed by [`InMemorySecretVersionStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedMutation {
    /// Version the call targeted.
    pub version: VersionName,
    /// State the call requested.
    pub target: VersionState,
}

#[derive(Debug)]
struct StoredSecret {
    name: SecretName,
    versions: Vec<VersionRecord>,
}

/// In-memory secret version catalog.
///
/// Enforces forward-only state transitions and lists versions newest-first,
/// like the hosted store. Intended as a test double for sweep runs; the
/// seeding and inspection methods exist for that purpose.
#[derive(Debug, Default)]
pub struct InMemorySecretVersionStore {
    secrets: RwLock<Vec<StoredSecret>>,
    payloads: RwLock<HashMap<VersionName, Vec<u8>>>,
    mutations: RwLock<Vec<RecordedMutation>>,
}

impl InMemorySecretVersionStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a secret under a project and returns its full name.
    pub async fn add_secret(&self, project: &ProjectId, secret_id: &str) -> AppResult<SecretName> {
        if secret_id.trim().is_empty() || secret_id.contains('/') {
            return Err(AppError::Validation(format!(
                "invalid secret id '{secret_id}'"
            )));
        }

        let name = SecretName::new(format!("{}/secrets/{secret_id}", project.resource_name()))?;
        let mut secrets = self.secrets.write().await;
        if secrets.iter().any(|stored| stored.name == name) {
            return Err(AppError::Validation(format!(
                "secret '{name}' already exists"
            )));
        }

        secrets.push(StoredSecret {
            name: name.clone(),
            versions: Vec::new(),
        });
        Ok(name)
    }

    /// Adds a version with the next sequential id and returns its name.
    pub async fn add_version(
        &self,
        secret: &SecretName,
        create_time: CreateTime,
        state: VersionState,
        payload: impl Into<Vec<u8>>,
    ) -> AppResult<VersionName> {
        let mut secrets = self.secrets.write().await;
        let stored = secrets
            .iter_mut()
            .find(|stored| &stored.name == secret)
            .ok_or_else(|| AppError::NotFound(format!("secret '{secret}'")))?;

        let version_id = (stored.versions.len() + 1).to_string();
        let name = VersionName::under(secret, version_id.as_str())?;
        stored
            .versions
            .push(VersionRecord::new(name.clone(), create_time, state));

        if state != VersionState::Destroyed {
            self.payloads
                .write()
                .await
                .insert(name.clone(), payload.into());
        }

        Ok(name)
    }

    /// Returns every version of a secret with its current state, oldest id first.
    ///
    /// Inspection helper for tests that drive a sweep against this store.
    pub async fn version_states(
        &self,
        secret: &SecretName,
    ) -> AppResult<Vec<(VersionName, VersionState)>> {
        let secrets = self.secrets.read().await;
        let stored = secrets
            .iter()
            .find(|stored| &stored.name == secret)
            .ok_or_else(|| AppError::NotFound(format!("secret '{secret}'")))?;

        Ok(stored
            .versions
            .iter()
            .map(|version| (version.name().clone(), version.state()))
            .collect())
    }

    /// Returns every mutating call received so far, in order.
    ///
    /// Inspection helper for tests asserting that dry-run or steady-state
    /// sweeps leave the store untouched.
    pub async fn mutations(&self) -> Vec<RecordedMutation> {
        self.mutations.read().await.clone()
    }

    async fn transition(
        &self,
        version: &VersionName,
        target: VersionState,
    ) -> AppResult<VersionRecord> {
        self.mutations.write().await.push(RecordedMutation {
            version: version.clone(),
            target,
        });

        let mut secrets = self.secrets.write().await;
        let stored = secrets
            .iter_mut()
            .flat_map(|secret| secret.versions.iter_mut())
            .find(|stored| stored.name() == version)
            .ok_or_else(|| AppError::Mutation(format!("version '{version}' not found")))?;

        if !stored.state().can_transition_to(target) {
            return Err(AppError::Mutation(format!(
                "version '{version}' is {} and cannot become {target}",
                stored.state()
            )));
        }

        *stored = stored.with_state(target);
        if target == VersionState::Destroyed {
            self.payloads.write().await.remove(version);
        }

        Ok(stored.clone())
    }
}

#[async_trait]
impl SecretVersionStore for InMemorySecretVersionStore {
    async fn list_secrets(&self, project: &ProjectId) -> AppResult<Vec<SecretName>> {
        let prefix = format!("{}/secrets/", project.resource_name());

        Ok(self
            .secrets
            .read()
            .await
            .iter()
            .filter(|stored| stored.name.as_str().starts_with(prefix.as_str()))
            .map(|stored| stored.name.clone())
            .collect())
    }

    async fn list_versions(
        &self,
        secret: &SecretName,
        state: VersionState,
    ) -> AppResult<Vec<VersionRecord>> {
        let secrets = self.secrets.read().await;
        let stored = secrets
            .iter()
            .find(|stored| &stored.name == secret)
            .ok_or_else(|| AppError::Listing(format!("secret '{secret}' not found")))?;

        let mut versions: Vec<VersionRecord> = stored
            .versions
            .iter()
            .rev()
            .filter(|version| version.state() == state)
            .cloned()
            .collect();
        sort_newest_first(&mut versions);

        Ok(versions)
    }

    async fn disable_version(&self, version: &VersionName) -> AppResult<VersionRecord> {
        self.transition(version, VersionState::Disabled).await
    }

    async fn destroy_version(&self, version: &VersionName) -> AppResult<VersionRecord> {
        self.transition(version, VersionState::Destroyed).await
    }

    async fn access_version_payload(&self, version: &VersionName) -> AppResult<Vec<u8>> {
        let state = self
            .secrets
            .read()
            .await
            .iter()
            .flat_map(|secret| secret.versions.iter())
            .find(|stored| stored.name() == version)
            .map(VersionRecord::state)
            .ok_or_else(|| AppError::NotFound(format!("version '{version}'")))?;

        if state != VersionState::Enabled {
            return Err(AppError::Validation(format!(
                "version '{version}' is {state}; only enabled versions can be accessed"
            )));
        }

        self.payloads
            .read()
            .await
            .get(version)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("payload of version '{version}'")))
    }
}

#[cfg(test)]
mod tests;
