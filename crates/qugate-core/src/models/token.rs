//! Credential records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

/// A bearer credential mapping one-to-one to a user identity. Lookup by
/// `key` is the sole authentication primitive of the gateway; inactive
/// tokens are never returned by the record store, and there is no expiry
/// or scope check beyond that.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiToken {
    /// The opaque bearer string; unique.
    pub key: String,
    /// The linked user's username, used as the addressing key into a
    /// provider's job namespace.
    pub user: String,
    pub created_at: DateTime<Utc>,
    pub is_active: bool,
    /// Optional link to a storage-provider record.
    pub storage_provider: Option<Uuid>,
    /// Optional unique 24-hex-digit user identifier.
    pub uuid_hex: Option<String>,
}

/// A uuid_hex is exactly 24 lowercase hex digits.
pub fn validate_uuid_hex(value: &str) -> Result<(), AppError> {
    if value.len() != 24 || !value.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase())
    {
        return Err(AppError::Internal(format!(
            "{value} is not a valid UUID hex[:24]"
        )));
    }
    Ok(())
}
