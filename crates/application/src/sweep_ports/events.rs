use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secret_sweep_core::{AppResult, ProjectId, RunId};
use secret_sweep_domain::{SecretName, VersionName};
use serde::Serialize;

/// Stable kinds of events a sweep run emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepEventKind {
    /// A project run began.
    RunStarted,
    /// A project run completed.
    RunFinished,
    /// The surviving enabled version of a secret was identified.
    LatestVersionIdentified,
    /// A version was disabled.
    VersionDisabled,
    /// A version would be disabled outside dry-run.
    WouldDisable,
    /// A version was destroyed.
    VersionDestroyed,
    /// A version would be destroyed outside dry-run.
    WouldDestroy,
    /// A secret failed and was skipped.
    SecretSkipped,
    /// The run aborted.
    Fatal,
}

impl SweepEventKind {
    /// Returns a stable label value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RunStarted => "run_started",
            Self::RunFinished => "run_finished",
            Self::LatestVersionIdentified => "latest_version_identified",
            Self::VersionDisabled => "version_disabled",
            Self::WouldDisable => "would_disable",
            Self::VersionDestroyed => "version_destroyed",
            Self::WouldDestroy => "would_destroy",
            Self::SecretSkipped => "secret_skipped",
            Self::Fatal => "fatal",
        }
    }
}

/// One structured log entry produced by a sweep run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SweepEvent {
    /// Run the event belongs to.
    pub run_id: RunId,
    /// Emission timestamp.
    pub occurred_at: DateTime<Utc>,
    /// Project being swept.
    pub project: ProjectId,
    /// Event kind.
    pub kind: SweepEventKind,
    /// Human-readable message.
    pub message: String,
    /// Secret the event concerns, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret: Option<SecretName>,
    /// Version the event concerns, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<VersionName>,
}

impl SweepEvent {
    /// Creates an event stamped with the current time.
    #[must_use]
    pub fn new(
        run_id: RunId,
        project: ProjectId,
        kind: SweepEventKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            run_id,
            occurred_at: Utc::now(),
            project,
            kind,
            message: message.into(),
            secret: None,
            version: None,
        }
    }

    /// Attaches the secret the event concerns.
    #[must_use]
    pub fn with_secret(mut self, secret: SecretName) -> Self {
        self.secret = Some(secret);
        self
    }

    /// Attaches the version the event concerns.
    #[must_use]
    pub fn with_version(mut self, version: VersionName) -> Self {
        self.version = Some(version);
        self
    }
}

/// Port for shipping sweep events to a log destination.
#[async_trait]
pub trait SweepEventSink: Send + Sync {
    /// Emits one event.
    async fn emit(&self, event: &SweepEvent) -> AppResult<()>;
}
