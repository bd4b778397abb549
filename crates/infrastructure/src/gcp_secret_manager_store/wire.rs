//! Secret Manager v1 REST payloads.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::DateTime;
use secret_sweep_core::{AppError, AppResult};
use secret_sweep_domain::{CreateTime, SecretName, VersionName, VersionRecord, VersionState};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ListSecretsResponse {
    #[serde(default)]
    pub secrets: Vec<SecretResource>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct SecretResource {
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ListSecretVersionsResponse {
    #[serde(default)]
    pub versions: Vec<SecretVersionResource>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SecretVersionResource {
    pub name: String,
    pub create_time: String,
    pub state: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct AccessSecretVersionResponse {
    pub payload: SecretPayload,
}

#[derive(Debug, Deserialize)]
pub(super) struct SecretPayload {
    #[serde(default)]
    pub data: String,
}

#[derive(Debug, Deserialize)]
struct GoogleApiErrorResponse {
    error: GoogleApiError,
}

#[derive(Debug, Deserialize)]
struct GoogleApiError {
    message: String,
    #[serde(default)]
    status: Option<String>,
}

impl SecretResource {
    pub fn into_name(self) -> AppResult<SecretName> {
        SecretName::new(self.name)
    }
}

impl SecretVersionResource {
    pub fn into_record(self) -> AppResult<VersionRecord> {
        let create_time = parse_create_time(self.create_time.as_str())?;
        let state = self.state.parse::<VersionState>()?;

        Ok(VersionRecord::new(
            VersionName::new(self.name)?,
            create_time,
            state,
        ))
    }
}

impl AccessSecretVersionResponse {
    pub fn into_bytes(self) -> AppResult<Vec<u8>> {
        STANDARD
            .decode(self.payload.data.as_bytes())
            .map_err(|error| AppError::Internal(format!("secret payload is not base64: {error}")))
    }
}

/// Parses an RFC 3339 `createTime` into seconds and nanos.
pub(super) fn parse_create_time(value: &str) -> AppResult<CreateTime> {
    let timestamp = DateTime::parse_from_rfc3339(value).map_err(|error| {
        AppError::Validation(format!("invalid version createTime '{value}': {error}"))
    })?;
    let nanos = i32::try_from(timestamp.timestamp_subsec_nanos()).map_err(|error| {
        AppError::Validation(format!("invalid version createTime '{value}': {error}"))
    })?;

    CreateTime::new(timestamp.timestamp(), nanos)
}

/// Treats a missing or empty `nextPageToken` as the last page.
pub(super) fn next_page(token: Option<String>) -> Option<String> {
    token.filter(|value| !value.is_empty())
}

/// Extracts the API error message from a response body, falling back to the raw body.
pub(super) fn error_detail(body: &str) -> String {
    match serde_json::from_str::<GoogleApiErrorResponse>(body) {
        Ok(response) => match response.error.status {
            Some(status) => format!("{status}: {}", response.error.message),
            None => response.error.message,
        },
        Err(_) => body.to_owned(),
    }
}
