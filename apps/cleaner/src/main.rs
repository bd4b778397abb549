//! Secret version sweep runtime.

#![forbid(unsafe_code)]

mod cli;

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use secret_sweep_application::{
    SecretSweepService, SecretVersionStore, SweepConfig, SweepEvent, SweepEventKind,
    SweepEventSink,
};
use secret_sweep_core::{AppError, AppResult, RunId};
use secret_sweep_infrastructure::{
    AccessTokenSource, FanOutSweepEventSink, GcpAuthTokenSource, GcpSecretManagerStore,
    HttpSweepEventSink, StaticAccessToken, TracingSweepEventSink,
};
use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let config = match cli.sweep_config() {
        Ok(config) => config,
        Err(error) => {
            error!(
                error = %error,
                category = error.category(),
                "invalid sweep configuration"
            );
            return ExitCode::FAILURE;
        }
    };

    let service = match build_service(&cli, config.clone()).await {
        Ok(service) => service,
        Err(error) => {
            report_startup_failure(&config, &error).await;
            return ExitCode::FAILURE;
        }
    };

    match service.run().await {
        Ok(_) => ExitCode::SUCCESS,
        Err(error) => {
            service.report_fatal(&error).await;
            error!(
                run_id = %service.run_id(),
                project = %config.project(),
                error = %error,
                category = error.category(),
                "secret-sweep aborted"
            );
            ExitCode::FAILURE
        }
    }
}

async fn build_service(cli: &Cli, config: SweepConfig) -> AppResult<SecretSweepService> {
    let store_config = cli.store_config()?;
    let log_sink = cli.log_sink()?;

    let token_source: Arc<dyn AccessTokenSource> = match cli.access_token.as_deref() {
        Some(token) => Arc::new(StaticAccessToken::new(token)?),
        None => Arc::new(GcpAuthTokenSource::from_environment().await?),
    };
    let store: Arc<dyn SecretVersionStore> =
        Arc::new(GcpSecretManagerStore::new(token_source, store_config)?);

    let tracing_sink: Arc<dyn SweepEventSink> = Arc::new(TracingSweepEventSink::new());
    let event_sink: Arc<dyn SweepEventSink> = match log_sink {
        Some(settings) => {
            let mut http_sink = HttpSweepEventSink::new(settings.url, cli.request_timeout())?;
            if let Some(version) = &settings.token_version {
                http_sink = http_sink
                    .with_token_from_secret(store.as_ref(), version)
                    .await?;
            }

            let http_sink: Arc<dyn SweepEventSink> = Arc::new(http_sink);
            Arc::new(FanOutSweepEventSink::new(vec![tracing_sink, http_sink]))
        }
        None => tracing_sink,
    };

    Ok(SecretSweepService::new(store, event_sink, config))
}

async fn report_startup_failure(config: &SweepConfig, error: &AppError) {
    let event = SweepEvent::new(
        RunId::new(),
        config.project().clone(),
        SweepEventKind::Fatal,
        format!("sweep could not start ({}): {error}", error.category()),
    );
    if let Err(sink_error) = TracingSweepEventSink::new().emit(&event).await {
        error!(error = %sink_error, "failed to emit fatal sweep event");
    }
}

fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}
