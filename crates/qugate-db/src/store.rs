//! The `RecordStore` trait: everything the gateway needs to know about
//! registered providers and tokens, with validation shared across
//! implementations.

use async_trait::async_trait;
use qugate_core::models::{validate_provider_name, validate_uuid_hex, ApiToken, ProviderRecord};
use qugate_core::AppError;

/// Persistence seam for provider records and API tokens.
///
/// `list_providers` must return records in registration order; bare-device
/// resolution and backend listings depend on that order being stable.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetch one provider record by its unique name.
    async fn get_provider_by_name(&self, name: &str) -> Result<Option<ProviderRecord>, AppError>;

    /// All provider records, active or not, in registration order.
    async fn list_providers(&self) -> Result<Vec<ProviderRecord>, AppError>;

    /// Register a provider. The record is validated first; the returned
    /// record carries the normalized name.
    async fn add_provider(&self, record: ProviderRecord) -> Result<ProviderRecord, AppError>;

    /// Flip a provider's active flag.
    async fn set_provider_active(&self, name: &str, is_active: bool) -> Result<(), AppError>;

    /// Look up a token by its exact key. Inactive tokens are not returned.
    async fn get_token_by_key(&self, key: &str) -> Result<Option<ApiToken>, AppError>;

    /// Store a token after validating its optional hex handle.
    async fn add_token(&self, token: ApiToken) -> Result<(), AppError>;
}

/// Validate and normalize a provider record before it is written.
pub(crate) fn prepare_provider(mut record: ProviderRecord) -> Result<ProviderRecord, AppError> {
    record.name = validate_provider_name(&record.name)?;
    record.validate_login()?;
    Ok(record)
}

/// Validate a token before it is written.
pub(crate) fn check_token(token: &ApiToken) -> Result<(), AppError> {
    if token.key.is_empty() {
        return Err(AppError::Internal("token key cannot be empty".to_string()));
    }
    if let Some(ref hex) = token.uuid_hex {
        validate_uuid_hex(hex)?;
    }
    Ok(())
}
