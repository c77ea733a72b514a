//! Provider registry: turn a backend identifier into a live storage-provider
//! client plus the device short-name it addresses.

use qugate_core::models::ProviderRecord;
use qugate_core::{AppError, BackendName};
use qugate_db::RecordStore;
use qugate_storage::{create_provider, StorageError, StorageProvider};
use std::sync::Arc;

/// A fully resolved backend: the instantiated provider client, its record,
/// and the device short-name.
pub struct ResolvedBackend {
    pub provider: Arc<dyn StorageProvider>,
    pub record: ProviderRecord,
    pub device: String,
}

/// Resolves backend identifiers against the record store and instantiates
/// the matching storage-provider client.
#[derive(Clone)]
pub struct ProviderRegistry {
    records: Arc<dyn RecordStore>,
}

impl ProviderRegistry {
    pub fn new(records: Arc<dyn RecordStore>) -> Self {
        Self { records }
    }

    /// Resolve an identifier to a provider client and device, verifying the
    /// device is a member of the provider's current device list.
    ///
    /// A 3-part identifier names its provider directly. A bare device name
    /// is resolved by scanning provider records in registration order and
    /// picking the first one hosting that device.
    pub async fn resolve(&self, identifier: &str) -> Result<ResolvedBackend, AppError> {
        let name = BackendName::parse(identifier)
            .ok_or_else(|| AppError::MalformedIdentifier(identifier.to_string()))?;

        match name.provider {
            Some(ref provider_name) => {
                let record = self
                    .records
                    .get_provider_by_name(provider_name)
                    .await?
                    .ok_or_else(|| AppError::UnknownProvider(identifier.to_string()))?;
                let provider = self.instantiate(&record).await?;

                let devices = provider
                    .get_backends()
                    .await
                    .map_err(|e| AppError::ProviderRead(e.to_string()))?;
                if !devices.contains(&name.device) {
                    return Err(AppError::UnknownDevice(name.device.clone()));
                }

                Ok(ResolvedBackend {
                    provider,
                    record,
                    device: name.device,
                })
            }
            None => {
                for record in self.records.list_providers().await? {
                    let provider = match self.instantiate(&record).await {
                        Ok(provider) => provider,
                        Err(e) => {
                            tracing::warn!(provider = %record.name, error = %e, "Skipping provider during bare-device resolution");
                            continue;
                        }
                    };
                    match provider.get_backends().await {
                        Ok(devices) if devices.contains(&name.device) => {
                            return Ok(ResolvedBackend {
                                provider,
                                record,
                                device: name.device,
                            });
                        }
                        Ok(_) => {}
                        Err(e) => {
                            tracing::warn!(provider = %record.name, error = %e, "Device listing failed during bare-device resolution");
                        }
                    }
                }
                Err(AppError::UnknownProvider(identifier.to_string()))
            }
        }
    }

    /// Provider records usable for backend listings, in registration order.
    pub async fn list_active_providers(&self) -> Result<Vec<ProviderRecord>, AppError> {
        let records = self.records.list_providers().await?;
        Ok(records.into_iter().filter(|r| r.is_active).collect())
    }

    /// Build the provider client for a record.
    pub async fn instantiate(
        &self,
        record: &ProviderRecord,
    ) -> Result<Arc<dyn StorageProvider>, AppError> {
        create_provider(record).await.map_err(|e| match e {
            StorageError::ConfigError(msg) => AppError::Misconfigured(msg),
            other => AppError::Misconfigured(other.to_string()),
        })
    }
}
