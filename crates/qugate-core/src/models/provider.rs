//! Storage-provider records and their login schemas.
//!
//! A provider record is persisted by the external record store; the gateway
//! consumes it read-only. The `login` blob is opaque JSON whose shape is
//! validated against the schema of its declared `storage_type` at write
//! time; the factory re-validates defensively when instantiating a client.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

/// Discriminator for the three storage-provider client variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "storage_type", rename_all = "lowercase")
)]
pub enum StorageType {
    /// S3-compatible object storage (cloud-file role).
    Object,
    /// Document database.
    Mongodb,
    /// Local filesystem.
    Local,
}

impl StorageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageType::Object => "object",
            StorageType::Mongodb => "mongodb",
            StorageType::Local => "local",
        }
    }
}

/// A persisted storage-provider record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderRecord {
    pub id: Uuid,
    pub storage_type: StorageType,
    /// Unique, lowercase alphanumeric; see [`validate_provider_name`].
    pub name: String,
    pub is_active: bool,
    /// Owning user, by username.
    pub owner: String,
    pub description: String,
    /// Login blob; shape keyed by `storage_type`.
    pub login: serde_json::Value,
}

/// Login schema for S3-compatible object storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ObjectLogin {
    pub bucket: String,
    pub region: String,
    #[serde(default)]
    pub endpoint_url: Option<String>,
    pub access_key_id: String,
    pub secret_access_key: String,
}

/// Login schema for a document database.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MongodbLogin {
    pub mongodb_database_url: String,
    pub mongodb_username: String,
    pub mongodb_password: String,
}

/// Login schema for a local-filesystem provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LocalLogin {
    pub base_path: String,
}

impl ProviderRecord {
    /// Check the login blob against the schema of the declared storage type.
    /// Performed at record-write time; the factory repeats it so corrupted
    /// records surface as `Misconfigured` rather than panicking downstream.
    pub fn validate_login(&self) -> Result<(), AppError> {
        let result = match self.storage_type {
            StorageType::Object => {
                serde_json::from_value::<ObjectLogin>(self.login.clone()).map(drop)
            }
            StorageType::Mongodb => {
                serde_json::from_value::<MongodbLogin>(self.login.clone()).map(drop)
            }
            StorageType::Local => {
                serde_json::from_value::<LocalLogin>(self.login.clone()).map(drop)
            }
        };
        result.map_err(|e| {
            AppError::Misconfigured(format!(
                "poor login dict for {} provider {}: {}",
                self.storage_type.as_str(),
                self.name,
                e
            ))
        })
    }
}

/// Normalize and validate a provider name: lowercased, non-empty, ASCII
/// lowercase alphanumeric only. Underscores are forbidden because they are
/// the separator in full backend identifiers; spaces are forbidden outright.
pub fn validate_provider_name(name: &str) -> Result<String, AppError> {
    if name.contains(' ') || name.contains('_') {
        return Err(AppError::Internal(format!(
            "provider name '{name}' cannot contain spaces or underscores"
        )));
    }
    let name = name.to_lowercase();
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()) {
        return Err(AppError::Internal(format!(
            "provider name '{name}' can only contain lowercase alphanumeric characters"
        )));
    }
    Ok(name)
}
