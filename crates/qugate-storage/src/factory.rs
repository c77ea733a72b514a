use crate::{
    DocumentProvider, LocalProvider, ObjectProvider, StorageError, StorageProvider, StorageResult,
};
use qugate_core::models::{LocalLogin, MongodbLogin, ObjectLogin, ProviderRecord, StorageType};
use std::sync::Arc;

/// Build the storage client for a provider record based on its declared
/// storage type. The login blob is re-parsed here so a corrupted record
/// surfaces as a configuration error instead of a panic downstream.
pub async fn create_provider(record: &ProviderRecord) -> StorageResult<Arc<dyn StorageProvider>> {
    match record.storage_type {
        StorageType::Object => {
            let login: ObjectLogin = parse_login(record)?;
            let provider = ObjectProvider::new(login, record.name.clone()).await?;
            Ok(Arc::new(provider))
        }
        StorageType::Mongodb => {
            let login: MongodbLogin = parse_login(record)?;
            let provider = DocumentProvider::new(login, record.name.clone()).await?;
            Ok(Arc::new(provider))
        }
        StorageType::Local => {
            let login: LocalLogin = parse_login(record)?;
            let provider = LocalProvider::new(login, record.name.clone()).await?;
            Ok(Arc::new(provider))
        }
    }
}

fn parse_login<T: serde::de::DeserializeOwned>(record: &ProviderRecord) -> StorageResult<T> {
    serde_json::from_value(record.login.clone()).map_err(|e| {
        StorageError::ConfigError(format!(
            "Provider '{}' has an invalid {} login: {}",
            record.name,
            record.storage_type.as_str(),
            e
        ))
    })
}
