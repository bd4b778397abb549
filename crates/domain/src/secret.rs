use std::fmt::{Display, Formatter};

use secret_sweep_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

const VERSIONS_SEGMENT: &str = "/versions/";

/// Fully-qualified secret name, e.g. `projects/acme/secrets/db-password`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SecretName(NonEmptyString);

impl SecretName {
    /// Creates a validated secret name.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        Ok(Self(NonEmptyString::new(value)?))
    }

    /// Returns the underlying resource name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for SecretName {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Fully-qualified version name, e.g. `projects/acme/secrets/db-password/versions/7`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VersionName(NonEmptyString);

impl VersionName {
    /// Creates a validated version name.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        Ok(Self(NonEmptyString::new(value)?))
    }

    /// Builds a version name under a secret.
    pub fn under(secret: &SecretName, version_id: &str) -> AppResult<Self> {
        if version_id.trim().is_empty() || version_id.contains('/') {
            return Err(AppError::Validation(format!(
                "invalid version id '{version_id}' for secret '{secret}'"
            )));
        }

        Self::new(format!("{}{VERSIONS_SEGMENT}{version_id}", secret.as_str()))
    }

    /// Returns the underlying resource name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the owning secret when the name has the `.../versions/{id}` shape.
    #[must_use]
    pub fn secret_name(&self) -> Option<SecretName> {
        self.as_str()
            .rsplit_once(VERSIONS_SEGMENT)
            .and_then(|(secret, _)| SecretName::new(secret).ok())
    }
}

impl Display for VersionName {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}
