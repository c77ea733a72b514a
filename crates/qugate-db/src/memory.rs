//! In-memory record store. Backs integration tests and single-node setups
//! where no Postgres instance is available.

use crate::store::{check_token, prepare_provider, RecordStore};
use async_trait::async_trait;
use qugate_core::models::{ApiToken, ProviderRecord};
use qugate_core::AppError;
use std::collections::HashMap;
use std::sync::RwLock;

#[derive(Default)]
struct Inner {
    /// Registration-ordered provider records.
    providers: Vec<ProviderRecord>,
    tokens: HashMap<String, ApiToken>,
}

/// `RecordStore` over process memory.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Inner>, AppError> {
        self.inner
            .read()
            .map_err(|_| AppError::Internal("record store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Inner>, AppError> {
        self.inner
            .write()
            .map_err(|_| AppError::Internal("record store lock poisoned".to_string()))
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn get_provider_by_name(&self, name: &str) -> Result<Option<ProviderRecord>, AppError> {
        let inner = self.read()?;
        Ok(inner.providers.iter().find(|p| p.name == name).cloned())
    }

    async fn list_providers(&self) -> Result<Vec<ProviderRecord>, AppError> {
        let inner = self.read()?;
        Ok(inner.providers.clone())
    }

    async fn add_provider(&self, record: ProviderRecord) -> Result<ProviderRecord, AppError> {
        let record = prepare_provider(record)?;
        let mut inner = self.write()?;
        if inner.providers.iter().any(|p| p.name == record.name) {
            return Err(AppError::Internal(format!(
                "provider '{}' already registered",
                record.name
            )));
        }
        inner.providers.push(record.clone());
        Ok(record)
    }

    async fn set_provider_active(&self, name: &str, is_active: bool) -> Result<(), AppError> {
        let mut inner = self.write()?;
        let provider = inner
            .providers
            .iter_mut()
            .find(|p| p.name == name)
            .ok_or_else(|| AppError::UnknownProvider(name.to_string()))?;
        provider.is_active = is_active;
        Ok(())
    }

    async fn get_token_by_key(&self, key: &str) -> Result<Option<ApiToken>, AppError> {
        let inner = self.read()?;
        Ok(inner
            .tokens
            .get(key)
            .filter(|t| t.is_active)
            .cloned())
    }

    async fn add_token(&self, token: ApiToken) -> Result<(), AppError> {
        check_token(&token)?;
        let mut inner = self.write()?;
        inner.tokens.insert(token.key.clone(), token);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use qugate_core::models::StorageType;
    use uuid::Uuid;

    fn local_record(name: &str) -> ProviderRecord {
        ProviderRecord {
            id: Uuid::new_v4(),
            storage_type: StorageType::Local,
            name: name.to_string(),
            is_active: true,
            owner: "admin".to_string(),
            description: String::new(),
            login: serde_json::json!({ "base_path": format!("/tmp/{name}") }),
        }
    }

    #[tokio::test]
    async fn test_providers_listed_in_registration_order() {
        let store = MemoryStore::new();
        store.add_provider(local_record("alpha")).await.unwrap();
        store.add_provider(local_record("beta")).await.unwrap();
        store.add_provider(local_record("gamma")).await.unwrap();

        let names: Vec<_> = store
            .list_providers()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["alpha", "beta", "gamma"]);
    }

    #[tokio::test]
    async fn test_duplicate_provider_name_rejected() {
        let store = MemoryStore::new();
        store.add_provider(local_record("alpha")).await.unwrap();
        assert!(store.add_provider(local_record("alpha")).await.is_err());
    }

    #[tokio::test]
    async fn test_inactive_token_not_returned() {
        let store = MemoryStore::new();
        let mut token = ApiToken {
            key: "tok1".to_string(),
            user: "alice".to_string(),
            created_at: Utc::now(),
            is_active: true,
            storage_provider: None,
            uuid_hex: None,
        };
        store.add_token(token.clone()).await.unwrap();
        assert!(store.get_token_by_key("tok1").await.unwrap().is_some());

        token.is_active = false;
        store.add_token(token).await.unwrap();
        assert!(store.get_token_by_key("tok1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_provider_active() {
        let store = MemoryStore::new();
        store.add_provider(local_record("alpha")).await.unwrap();
        store.set_provider_active("alpha", false).await.unwrap();

        let record = store.get_provider_by_name("alpha").await.unwrap().unwrap();
        assert!(!record.is_active);
    }
}
