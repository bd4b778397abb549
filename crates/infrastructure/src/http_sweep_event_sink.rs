use std::time::Duration;

use async_trait::async_trait;
use reqwest::header;
use secret_sweep_application::{SecretVersionStore, SweepEvent, SweepEventSink};
use secret_sweep_core::{AppError, AppResult};
use secret_sweep_domain::VersionName;
use url::Url;

/// Event sink that POSTs each event as JSON to an HTTP log collector.
pub struct HttpSweepEventSink {
    http_client: reqwest::Client,
    endpoint: Url,
    bearer_token: Option<String>,
}

impl std::fmt::Debug for HttpSweepEventSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpSweepEventSink")
            .field("endpoint", &self.endpoint.as_str())
            .field(
                "bearer_token",
                &self.bearer_token.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

impl HttpSweepEventSink {
    /// Creates an unauthenticated sink.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is not http(s) or the client cannot be built.
    pub fn new(endpoint: Url, request_timeout: Duration) -> AppResult<Self> {
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(AppError::Validation(format!(
                "log sink url '{endpoint}' must use http or https"
            )));
        }

        let http_client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|error| AppError::Internal(format!("failed to build HTTP client: {error}")))?;

        Ok(Self {
            http_client,
            endpoint,
            bearer_token: None,
        })
    }

    /// Sends a bearer token with every event.
    #[must_use]
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// Reads the bearer token from a secret version payload.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload cannot be read or is not a non-empty UTF-8 token.
    pub async fn with_token_from_secret(
        self,
        store: &dyn SecretVersionStore,
        version: &VersionName,
    ) -> AppResult<Self> {
        let payload = store.access_version_payload(version).await?;
        let token = String::from_utf8(payload).map_err(|_| {
            AppError::Validation(format!("log sink token in '{version}' is not valid UTF-8"))
        })?;
        let token = token.trim();
        if token.is_empty() {
            return Err(AppError::Validation(format!(
                "log sink token in '{version}' is empty"
            )));
        }

        Ok(self.with_bearer_token(token))
    }
}

#[async_trait]
impl SweepEventSink for HttpSweepEventSink {
    async fn emit(&self, event: &SweepEvent) -> AppResult<()> {
        let mut request = self.http_client.post(self.endpoint.clone()).json(event);
        if let Some(token) = &self.bearer_token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let response = request.send().await.map_err(|error| {
            AppError::Internal(format!("failed to call log sink endpoint: {error}"))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_owned());
            return Err(AppError::Internal(format!(
                "log sink endpoint returned status {}: {body}",
                status.as_u16()
            )));
        }

        Ok(())
    }
}
