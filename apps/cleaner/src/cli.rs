use std::time::Duration;

use clap::Parser;
use clap::builder::BoolishValueParser;
use secret_sweep_application::SweepConfig;
use secret_sweep_core::{AppError, AppResult, ProjectId};
use secret_sweep_domain::{
    DEFAULT_KEEP_DISABLED_COUNT, ExecutionMode, FailurePolicy, RetentionPolicy, VersionName,
};
use secret_sweep_infrastructure::{DEFAULT_SECRET_MANAGER_ENDPOINT, GcpSecretManagerConfig};
use url::Url;

/// Disables superseded secret versions and destroys old disabled ones.
#[derive(Debug, Parser)]
#[command(name = "secret-sweep", version)]
pub(crate) struct Cli {
    /// Project whose secrets are swept.
    #[arg(long, env = "SECRET_SWEEP_PROJECT")]
    pub project: String,

    /// Number of most recent disabled versions to keep per secret.
    #[arg(long, env = "SECRET_SWEEP_KEEP", default_value_t = DEFAULT_KEEP_DISABLED_COUNT)]
    pub keep: usize,

    /// Report what would change without mutating anything.
    #[arg(long, env = "SECRET_SWEEP_DRY_RUN", value_parser = BoolishValueParser::new())]
    pub dry_run: bool,

    /// Enable debug logging.
    #[arg(long, env = "SECRET_SWEEP_DEBUG", value_parser = BoolishValueParser::new())]
    pub debug: bool,

    /// Skip secrets that fail instead of aborting the run.
    #[arg(long, env = "SECRET_SWEEP_CONTINUE_ON_ERROR", value_parser = BoolishValueParser::new())]
    pub continue_on_error: bool,

    /// Secret Manager API endpoint.
    #[arg(long, env = "SECRET_SWEEP_API_ENDPOINT", default_value = DEFAULT_SECRET_MANAGER_ENDPOINT)]
    pub api_endpoint: Url,

    /// Page size for listing calls.
    #[arg(long, env = "SECRET_SWEEP_PAGE_SIZE", default_value_t = 100)]
    pub page_size: u32,

    /// Per-request timeout in seconds.
    #[arg(long, env = "SECRET_SWEEP_REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    pub request_timeout_secs: u64,

    /// HTTP endpoint that receives sweep events as JSON.
    #[arg(long, env = "SECRET_SWEEP_LOG_SINK_URL")]
    pub log_sink_url: Option<Url>,

    /// Secret version holding the log sink bearer token.
    #[arg(long, env = "SECRET_SWEEP_LOG_SINK_TOKEN_VERSION")]
    pub log_sink_token_version: Option<String>,

    /// Pre-issued OAuth2 access token; application default credentials otherwise.
    #[arg(long, env = "SECRET_SWEEP_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,
}

/// Where sweep events are shipped besides the process log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LogSinkSettings {
    pub url: Url,
    pub token_version: Option<VersionName>,
}

impl Cli {
    pub(crate) fn sweep_config(&self) -> AppResult<SweepConfig> {
        let project = ProjectId::new(self.project.as_str())?;
        let mode = if self.dry_run {
            ExecutionMode::DryRun
        } else {
            ExecutionMode::Live
        };
        let failure_policy = if self.continue_on_error {
            FailurePolicy::SkipSecret
        } else {
            FailurePolicy::FailFast
        };

        Ok(SweepConfig::new(project)
            .with_mode(mode)
            .with_retention(RetentionPolicy::new(self.keep))
            .with_failure_policy(failure_policy))
    }

    pub(crate) fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub(crate) fn store_config(&self) -> AppResult<GcpSecretManagerConfig> {
        GcpSecretManagerConfig::new(
            self.api_endpoint.clone(),
            self.page_size,
            self.request_timeout(),
        )
    }

    pub(crate) fn log_sink(&self) -> AppResult<Option<LogSinkSettings>> {
        let token_version = self
            .log_sink_token_version
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(parse_token_version)
            .transpose()?;

        match (&self.log_sink_url, token_version) {
            (Some(url), token_version) => Ok(Some(LogSinkSettings {
                url: url.clone(),
                token_version,
            })),
            (None, Some(_)) => Err(AppError::Validation(
                "--log-sink-token-version requires --log-sink-url".to_owned(),
            )),
            (None, None) => Ok(None),
        }
    }
}

fn parse_token_version(value: &str) -> AppResult<VersionName> {
    let version = VersionName::new(value)?;
    if version.secret_name().is_none() {
        return Err(AppError::Validation(format!(
            "log sink token version '{value}' must look like projects/<project>/secrets/<secret>/versions/<version>"
        )));
    }

    Ok(version)
}
