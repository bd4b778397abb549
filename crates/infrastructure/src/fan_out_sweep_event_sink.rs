use std::sync::Arc;

use async_trait::async_trait;
use secret_sweep_application::{SweepEvent, SweepEventSink};
use secret_sweep_core::AppResult;

/// Event sink that forwards every event to several sinks.
///
/// Every sink sees every event even when an earlier one fails; the first
/// failure is returned.
#[derive(Clone, Default)]
pub struct FanOutSweepEventSink {
    sinks: Vec<Arc<dyn SweepEventSink>>,
}

impl std::fmt::Debug for FanOutSweepEventSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FanOutSweepEventSink")
            .field("sinks", &self.sinks.len())
            .finish()
    }
}

impl FanOutSweepEventSink {
    /// Creates a fan-out over the given sinks.
    #[must_use]
    pub fn new(sinks: Vec<Arc<dyn SweepEventSink>>) -> Self {
        Self { sinks }
    }
}

#[async_trait]
impl SweepEventSink for FanOutSweepEventSink {
    async fn emit(&self, event: &SweepEvent) -> AppResult<()> {
        let mut first_error = None;
        for sink in &self.sinks {
            if let Err(error) = sink.emit(event).await {
                first_error.get_or_insert(error);
            }
        }

        match first_error {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use secret_sweep_application::{SweepEvent, SweepEventKind, SweepEventSink};
    use secret_sweep_core::{AppError, AppResult, ProjectId, RunId};
    use tokio::sync::Mutex;

    use super::FanOutSweepEventSink;

    #[derive(Default)]
    struct CountingSink {
        seen: Mutex<usize>,
        fail_with: Option<&'static str>,
    }

    #[async_trait]
    impl SweepEventSink for CountingSink {
        async fn emit(&self, _event: &SweepEvent) -> AppResult<()> {
            *self.seen.lock().await += 1;
            match self.fail_with {
                Some(message) => Err(AppError::Internal(message.to_owned())),
                None => Ok(()),
            }
        }
    }

    fn event() -> SweepEvent {
        let project = ProjectId::new("acme").unwrap_or_else(|_| unreachable!());
        SweepEvent::new(RunId::new(), project, SweepEventKind::RunStarted, "start")
    }

    #[tokio::test]
    async fn failing_sink_does_not_starve_later_sinks() {
        let first = Arc::new(CountingSink {
            fail_with: Some("first down"),
            ..CountingSink::default()
        });
        let second = Arc::new(CountingSink {
            fail_with: Some("second down"),
            ..CountingSink::default()
        });
        let third = Arc::new(CountingSink::default());

        let sinks: Vec<Arc<dyn SweepEventSink>> =
            vec![first.clone(), second.clone(), third.clone()];
        let fan_out = FanOutSweepEventSink::new(sinks);
        let result = fan_out.emit(&event()).await;

        assert!(matches!(result, Err(AppError::Internal(message)) if message == "first down"));
        assert_eq!(*first.seen.lock().await, 1);
        assert_eq!(*second.seen.lock().await, 1);
        assert_eq!(*third.seen.lock().await, 1);
    }

    #[tokio::test]
    async fn empty_fan_out_accepts_events() {
        assert!(FanOutSweepEventSink::default().emit(&event()).await.is_ok());
    }
}
