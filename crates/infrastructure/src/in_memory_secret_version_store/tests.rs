use std::sync::Arc;

use secret_sweep_application::{SecretSweepService, SecretVersionStore, SweepConfig};
use secret_sweep_core::{AppError, ProjectId};
use secret_sweep_domain::{CreateTime, ExecutionMode, RetentionPolicy, SecretName, VersionState};

use crate::TracingSweepEventSink;

use super::InMemorySecretVersionStore;

fn project() -> ProjectId {
    ProjectId::new("acme").unwrap_or_else(|_| unreachable!())
}

fn at(seconds: i64, nanos: i32) -> CreateTime {
    CreateTime::new(seconds, nanos).unwrap_or_else(|_| unreachable!())
}

async fn seeded_secret(
    store: &InMemorySecretVersionStore,
    secret_id: &str,
    versions: &[(i64, VersionState)],
) -> SecretName {
    let secret = store
        .add_secret(&project(), secret_id)
        .await
        .unwrap_or_else(|_| unreachable!());
    for (seconds, state) in versions {
        let added = store
            .add_version(&secret, at(*seconds, 0), *state, b"value".to_vec())
            .await;
        assert!(added.is_ok());
    }
    secret
}

async fn count_in_state(
    store: &InMemorySecretVersionStore,
    secret: &SecretName,
    state: VersionState,
) -> usize {
    store
        .version_states(secret)
        .await
        .unwrap_or_default()
        .iter()
        .filter(|(_, stored)| *stored == state)
        .count()
}

#[tokio::test]
async fn duplicate_secret_is_rejected() {
    let store = InMemorySecretVersionStore::new();
    assert!(store.add_secret(&project(), "db").await.is_ok());
    assert!(store.add_secret(&project(), "db").await.is_err());
    assert!(store.add_secret(&project(), "nested/db").await.is_err());
}

#[tokio::test]
async fn list_secrets_does_not_leak_across_projects() {
    let store = InMemorySecretVersionStore::new();
    let other = ProjectId::new("other").unwrap_or_else(|_| unreachable!());
    assert!(store.add_secret(&project(), "db").await.is_ok());
    assert!(store.add_secret(&other, "api").await.is_ok());

    let listed = store.list_secrets(&project()).await.unwrap_or_default();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].as_str(), "projects/acme/secrets/db");
}

#[tokio::test]
async fn list_versions_returns_newest_first_for_state() {
    let store = InMemorySecretVersionStore::new();
    let secret = seeded_secret(
        &store,
        "db",
        &[
            (30, VersionState::Disabled),
            (10, VersionState::Disabled),
            (20, VersionState::Enabled),
            (40, VersionState::Disabled),
        ],
    )
    .await;

    let disabled = store
        .list_versions(&secret, VersionState::Disabled)
        .await
        .unwrap_or_default();
    let seconds: Vec<i64> = disabled
        .iter()
        .map(|version| version.create_time().seconds())
        .collect();
    assert_eq!(seconds, vec![40, 30, 10]);
}

#[tokio::test]
async fn transitions_only_move_forward() {
    let store = InMemorySecretVersionStore::new();
    let secret = seeded_secret(&store, "db", &[(1, VersionState::Enabled)]).await;
    let version = store
        .list_versions(&secret, VersionState::Enabled)
        .await
        .unwrap_or_default()
        .remove(0);

    assert!(store.disable_version(version.name()).await.is_ok());
    assert!(matches!(
        store.disable_version(version.name()).await,
        Err(AppError::Mutation(_))
    ));
    assert!(store.destroy_version(version.name()).await.is_ok());
    assert!(store.destroy_version(version.name()).await.is_err());
    assert_eq!(store.mutations().await.len(), 4);
}

#[tokio::test]
async fn payload_is_only_readable_while_enabled() {
    let store = InMemorySecretVersionStore::new();
    let secret = store
        .add_secret(&project(), "sink-token")
        .await
        .unwrap_or_else(|_| unreachable!());
    let version = store
        .add_version(&secret, at(1, 0), VersionState::Enabled, "token-123")
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(
        store.access_version_payload(&version).await.unwrap_or_default(),
        b"token-123".to_vec()
    );

    assert!(store.disable_version(&version).await.is_ok());
    assert!(store.access_version_payload(&version).await.is_err());
}

#[tokio::test]
async fn project_sweep_reaches_steady_state_and_is_idempotent() {
    let store = Arc::new(InMemorySecretVersionStore::new());
    let db = seeded_secret(
        &store,
        "db",
        &[
            (10, VersionState::Disabled),
            (20, VersionState::Disabled),
            (30, VersionState::Enabled),
            (40, VersionState::Enabled),
            (50, VersionState::Enabled),
        ],
    )
    .await;
    let api = seeded_secret(&store, "api", &[(5, VersionState::Disabled)]).await;

    let config = SweepConfig::new(project()).with_retention(RetentionPolicy::new(2));
    let sweep = SecretSweepService::new(
        store.clone(),
        Arc::new(TracingSweepEventSink::new()),
        config,
    );

    let first = sweep.run().await;
    assert!(first.is_ok());
    let first = first.unwrap_or_else(|_| unreachable!());
    assert_eq!(first.total_disabled(), 2);
    assert_eq!(first.total_destroyed(), 2);

    assert_eq!(count_in_state(&store, &db, VersionState::Enabled).await, 1);
    assert_eq!(count_in_state(&store, &db, VersionState::Disabled).await, 2);
    assert_eq!(count_in_state(&store, &api, VersionState::Disabled).await, 1);

    let mutations_after_first = store.mutations().await.len();
    let second = sweep.run().await.unwrap_or_else(|_| unreachable!());
    assert_eq!(second.total_disabled(), 0);
    assert_eq!(second.total_destroyed(), 0);
    assert_eq!(store.mutations().await.len(), mutations_after_first);
}

#[tokio::test]
async fn dry_run_project_sweep_leaves_store_untouched() {
    let store = Arc::new(InMemorySecretVersionStore::new());
    let db = seeded_secret(
        &store,
        "db",
        &[
            (10, VersionState::Disabled),
            (20, VersionState::Enabled),
            (30, VersionState::Enabled),
        ],
    )
    .await;

    let config = SweepConfig::new(project())
        .with_retention(RetentionPolicy::new(0))
        .with_mode(ExecutionMode::DryRun);
    let report = SecretSweepService::new(
        store.clone(),
        Arc::new(TracingSweepEventSink::new()),
        config,
    )
    .run()
    .await
    .unwrap_or_else(|_| unreachable!());

    assert_eq!(report.total_disabled(), 1);
    assert_eq!(report.total_destroyed(), 2);
    assert!(store.mutations().await.is_empty());
    assert_eq!(count_in_state(&store, &db, VersionState::Enabled).await, 2);
}
