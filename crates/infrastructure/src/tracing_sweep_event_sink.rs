use async_trait::async_trait;
use secret_sweep_application::{SweepEvent, SweepEventKind, SweepEventSink};
use secret_sweep_core::AppResult;
use tracing::{error, info, warn};

/// Event sink that writes each event as a structured `tracing` record.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSweepEventSink;

impl TracingSweepEventSink {
    /// Creates the sink.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SweepEventSink for TracingSweepEventSink {
    async fn emit(&self, event: &SweepEvent) -> AppResult<()> {
        let secret = event.secret.as_ref().map(|secret| secret.as_str()).unwrap_or("-");
        let version = event
            .version
            .as_ref()
            .map(|version| version.as_str())
            .unwrap_or("-");

        match event.kind {
            SweepEventKind::Fatal => error!(
                run_id = %event.run_id,
                project = %event.project,
                event_kind = event.kind.as_str(),
                secret,
                version,
                "{}",
                event.message
            ),
            SweepEventKind::SecretSkipped => warn!(
                run_id = %event.run_id,
                project = %event.project,
                event_kind = event.kind.as_str(),
                secret,
                version,
                "{}",
                event.message
            ),
            _ => info!(
                run_id = %event.run_id,
                project = %event.project,
                event_kind = event.kind.as_str(),
                secret,
                version,
                "{}",
                event.message
            ),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use secret_sweep_application::{SweepEvent, SweepEventKind, SweepEventSink};
    use secret_sweep_core::{ProjectId, RunId};

    use super::TracingSweepEventSink;

    #[tokio::test]
    async fn every_kind_is_accepted() {
        let project = ProjectId::new("acme").unwrap_or_else(|_| unreachable!());
        let sink = TracingSweepEventSink::new();

        for kind in [
            SweepEventKind::RunStarted,
            SweepEventKind::SecretSkipped,
            SweepEventKind::Fatal,
        ] {
            let event = SweepEvent::new(RunId::new(), project.clone(), kind, "message");
            assert!(sink.emit(&event).await.is_ok());
        }
    }
}
