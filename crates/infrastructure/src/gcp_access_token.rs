use std::sync::Arc;

use async_trait::async_trait;
use gcp_auth::TokenProvider;
use secret_sweep_core::{AppError, AppResult};
use tracing::debug;

const CLOUD_PLATFORM_SCOPES: &[&str] = &["https://www.googleapis.com/auth/cloud-platform"];

/// Source of OAuth2 bearer tokens for Google APIs.
#[async_trait]
pub trait AccessTokenSource: Send + Sync {
    /// Returns a currently valid access token.
    async fn access_token(&self) -> AppResult<String>;
}

/// Token source backed by application default credentials.
pub struct GcpAuthTokenSource {
    token_provider: Arc<dyn TokenProvider>,
}

impl std::fmt::Debug for GcpAuthTokenSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GcpAuthTokenSource")
            .field("token_provider", &"<TokenProvider>")
            .finish()
    }
}

impl GcpAuthTokenSource {
    /// Discovers credentials from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if no usable credentials are found.
    pub async fn from_environment() -> AppResult<Self> {
        let token_provider = gcp_auth::provider().await.map_err(|error| {
            AppError::Validation(format!("failed to initialize GCP authentication: {error}"))
        })?;

        Ok(Self { token_provider })
    }
}

#[async_trait]
impl AccessTokenSource for GcpAuthTokenSource {
    async fn access_token(&self) -> AppResult<String> {
        debug!("fetching cloud-platform OAuth2 token");
        let token = self
            .token_provider
            .token(CLOUD_PLATFORM_SCOPES)
            .await
            .map_err(|error| AppError::Internal(format!("failed to get GCP access token: {error}")))?;

        Ok(token.as_str().to_owned())
    }
}

/// Pre-issued token, e.g. from `gcloud auth print-access-token` or an emulator.
#[derive(Clone)]
pub struct StaticAccessToken(String);

impl StaticAccessToken {
    /// Wraps a pre-issued token.
    pub fn new(token: impl Into<String>) -> AppResult<Self> {
        let token = token.into().trim().to_owned();
        if token.is_empty() {
            return Err(AppError::Validation(
                "access token must not be empty".to_owned(),
            ));
        }

        Ok(Self(token))
    }
}

impl std::fmt::Debug for StaticAccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("StaticAccessToken(<redacted>)")
    }
}

#[async_trait]
impl AccessTokenSource for StaticAccessToken {
    async fn access_token(&self) -> AppResult<String> {
        Ok(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::{AccessTokenSource, StaticAccessToken};

    #[test]
    fn static_token_rejects_blank_values() {
        assert!(StaticAccessToken::new("  ").is_err());
    }

    #[test]
    fn static_token_debug_is_redacted() {
        let token = StaticAccessToken::new("ya29.secret").unwrap_or_else(|_| unreachable!());
        assert!(!format!("{token:?}").contains("ya29"));
    }

    #[tokio::test]
    async fn static_token_is_trimmed() {
        let token = StaticAccessToken::new(" ya29.value\n").unwrap_or_else(|_| unreachable!());
        assert_eq!(token.access_token().await.unwrap_or_default(), "ya29.value");
    }
}
