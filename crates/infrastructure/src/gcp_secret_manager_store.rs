//! Google Cloud Secret Manager adapter over the v1 REST API.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use secret_sweep_application::SecretVersionStore;
use secret_sweep_core::{AppError, AppResult, ProjectId};
use secret_sweep_domain::{SecretName, VersionName, VersionRecord, VersionState};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::gcp_access_token::AccessTokenSource;

mod wire;

use wire::{
    AccessSecretVersionResponse, ListSecretVersionsResponse, ListSecretsResponse,
    SecretVersionResource,
};

/// Public Secret Manager endpoint.
pub const DEFAULT_SECRET_MANAGER_ENDPOINT: &str = "https://secretmanager.googleapis.com";

const MAX_PAGE_SIZE: u32 = 25_000;

/// Connection settings for [`GcpSecretManagerStore`].
#[derive(Debug, Clone)]
pub struct GcpSecretManagerConfig {
    api_endpoint: Url,
    page_size: u32,
    request_timeout: Duration,
}

impl GcpSecretManagerConfig {
    /// Creates validated settings.
    pub fn new(api_endpoint: Url, page_size: u32, request_timeout: Duration) -> AppResult<Self> {
        if !matches!(api_endpoint.scheme(), "http" | "https") {
            return Err(AppError::Validation(format!(
                "secret manager endpoint '{api_endpoint}' must use http or https"
            )));
        }

        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            return Err(AppError::Validation(format!(
                "page size must be between 1 and {MAX_PAGE_SIZE}, got {page_size}"
            )));
        }

        if request_timeout.is_zero() {
            return Err(AppError::Validation(
                "request timeout must be greater than zero".to_owned(),
            ));
        }

        Ok(Self {
            api_endpoint,
            page_size,
            request_timeout,
        })
    }

    /// Returns the API endpoint.
    #[must_use]
    pub fn api_endpoint(&self) -> &Url {
        &self.api_endpoint
    }

    /// Returns the listing page size.
    #[must_use]
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Returns the per-request timeout.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }
}

/// Secret version store backed by Google Cloud Secret Manager.
pub struct GcpSecretManagerStore {
    http_client: reqwest::Client,
    token_source: Arc<dyn AccessTokenSource>,
    config: GcpSecretManagerConfig,
}

impl std::fmt::Debug for GcpSecretManagerStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GcpSecretManagerStore")
            .field("config", &self.config)
            .field("token_source", &"<AccessTokenSource>")
            .finish()
    }
}

impl GcpSecretManagerStore {
    /// Creates a store with its own HTTP client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        token_source: Arc<dyn AccessTokenSource>,
        config: GcpSecretManagerConfig,
    ) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|error| AppError::Internal(format!("failed to build HTTP client: {error}")))?;

        Ok(Self {
            http_client,
            token_source,
            config,
        })
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        operation: &str,
        into_error: fn(String) -> AppError,
    ) -> AppResult<T> {
        let token = self.token_source.access_token().await?;
        let response = request.bearer_auth(token).send().await.map_err(|error| {
            into_error(format!("failed to call secret manager for {operation}: {error}"))
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_owned());
            return Err(into_error(format!(
                "secret manager {operation} returned status {}: {}",
                status.as_u16(),
                wire::error_detail(body.as_str())
            )));
        }

        response.json::<T>().await.map_err(|error| {
            into_error(format!(
                "failed to parse secret manager {operation} response body: {error}"
            ))
        })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        resource: &str,
        query: &[(&str, String)],
        operation: &str,
        into_error: fn(String) -> AppError,
    ) -> AppResult<T> {
        let url = resource_url(self.config.api_endpoint(), resource, query);
        self.send(self.http_client.get(url), operation, into_error)
            .await
    }

    async fn post_action(
        &self,
        version: &VersionName,
        action: &str,
    ) -> AppResult<VersionRecord> {
        let url = resource_url(
            self.config.api_endpoint(),
            format!("{version}:{action}").as_str(),
            &[],
        );
        let response: SecretVersionResource = self
            .send(
                self.http_client.post(url).json(&serde_json::json!({})),
                action,
                AppError::Mutation,
            )
            .await?;

        response.into_record()
    }

    fn page_query(&self, page_token: Option<&String>) -> Vec<(&'static str, String)> {
        let mut query = vec![("pageSize", self.config.page_size().to_string())];
        if let Some(token) = page_token {
            query.push(("pageToken", token.clone()));
        }
        query
    }
}

#[async_trait]
impl SecretVersionStore for GcpSecretManagerStore {
    async fn list_secrets(&self, project: &ProjectId) -> AppResult<Vec<SecretName>> {
        let resource = format!("{}/secrets", project.resource_name());
        let mut secrets = Vec::new();
        let mut page_token: Option<String> = None;
        let mut pages = 0_u32;

        loop {
            let page: ListSecretsResponse = self
                .get(
                    resource.as_str(),
                    &self.page_query(page_token.as_ref()),
                    "list secrets",
                    AppError::Listing,
                )
                .await?;
            pages = pages.saturating_add(1);

            for secret in page.secrets {
                secrets.push(secret.into_name().map_err(|error| {
                    AppError::Listing(format!("secret listing returned invalid name: {error}"))
                })?);
            }

            match wire::next_page(page.next_page_token) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        debug!(project = %project, pages, count = secrets.len(), "secret listing drained");
        Ok(secrets)
    }

    async fn list_versions(
        &self,
        secret: &SecretName,
        state: VersionState,
    ) -> AppResult<Vec<VersionRecord>> {
        let resource = format!("{secret}/versions");
        let filter = format!("state:{}", state.as_str());
        let mut versions = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query = self.page_query(page_token.as_ref());
            query.push(("filter", filter.clone()));

            let page: ListSecretVersionsResponse = self
                .get(
                    resource.as_str(),
                    &query,
                    "list secret versions",
                    AppError::Listing,
                )
                .await?;

            for version in page.versions {
                versions.push(version.into_record().map_err(|error| {
                    AppError::Listing(format!(
                        "version listing for '{secret}' returned an invalid record: {error}"
                    ))
                })?);
            }

            match wire::next_page(page.next_page_token) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(versions)
    }

    async fn disable_version(&self, version: &VersionName) -> AppResult<VersionRecord> {
        self.post_action(version, "disable").await
    }

    async fn destroy_version(&self, version: &VersionName) -> AppResult<VersionRecord> {
        self.post_action(version, "destroy").await
    }

    async fn access_version_payload(&self, version: &VersionName) -> AppResult<Vec<u8>> {
        let response: AccessSecretVersionResponse = self
            .get(
                format!("{version}:access").as_str(),
                &[],
                "access secret version",
                AppError::Internal,
            )
            .await?;

        response.into_bytes()
    }
}

/// Builds `{endpoint}/v1/{resource}?{query}`.
fn resource_url(endpoint: &Url, resource: &str, query: &[(&str, String)]) -> Url {
    let mut url = endpoint.clone();
    url.set_path(
        format!(
            "{}/v1/{}",
            endpoint.path().trim_end_matches('/'),
            resource.trim_start_matches('/')
        )
        .as_str(),
    );
    url.set_query(None);

    if !query.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in query {
            pairs.append_pair(key, value);
        }
    }

    url
}
