//! Secret version sweep service.
//!
//! Drives the two-phase lifecycle cleanup for every secret in a project:
//! disable all enabled versions except the newest, then destroy disabled
//! versions beyond the retention keep-count.

use std::sync::Arc;

use secret_sweep_core::{AppError, RunId};
use tracing::warn;

use crate::sweep_ports::{SecretVersionStore, SweepEvent, SweepEventKind, SweepEventSink};

mod config;
mod project_sweep;
mod report;
mod secret_sweep;

pub use config::SweepConfig;
pub use report::{ProjectSweepReport, SecretSweepReport, SkippedSecret};

/// Application service sweeping secret versions for one project.
#[derive(Clone)]
pub struct SecretSweepService {
    store: Arc<dyn SecretVersionStore>,
    event_sink: Arc<dyn SweepEventSink>,
    config: SweepConfig,
    run_id: RunId,
}

impl SecretSweepService {
    /// Creates a sweep service with a fresh run identifier.
    #[must_use]
    pub fn new(
        store: Arc<dyn SecretVersionStore>,
        event_sink: Arc<dyn SweepEventSink>,
        config: SweepConfig,
    ) -> Self {
        Self {
            store,
            event_sink,
            config,
            run_id: RunId::new(),
        }
    }

    /// Overrides the run identifier stamped on emitted events.
    #[must_use]
    pub fn with_run_id(mut self, run_id: RunId) -> Self {
        self.run_id = run_id;
        self
    }

    /// Returns the run identifier.
    #[must_use]
    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    /// Emits the terminal event for a run that is about to abort.
    pub async fn report_fatal(&self, error: &AppError) {
        self.emit(self.event(
            SweepEventKind::Fatal,
            format!("sweep aborted ({}): {error}", error.category()),
        ))
        .await;
    }

    fn event(&self, kind: SweepEventKind, message: impl Into<String>) -> SweepEvent {
        SweepEvent::new(self.run_id, self.config.project().clone(), kind, message)
    }

    // Sink failures are logged and swallowed; shipping logs is not part of
    // the retention decision.
    async fn emit(&self, event: SweepEvent) {
        if let Err(error) = self.event_sink.emit(&event).await {
            warn!(
                run_id = %self.run_id,
                project = %self.config.project(),
                event_kind = event.kind.as_str(),
                error = %error,
                "failed to emit sweep event"
            );
        }
    }
}
