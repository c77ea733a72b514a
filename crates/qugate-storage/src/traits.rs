//! Storage-provider abstraction trait
//!
//! This module defines the capability set every storage provider client must
//! implement. The job lifecycle coordinator works against this trait only
//! and never learns which concrete backend holds a device's documents.

use async_trait::async_trait;
use chrono::Utc;
use qugate_core::backend_name::BackendName;
use qugate_core::models::{BackendConfig, BackendStatus, DeviceConfig, ResultDoc, StatusMsg};
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Document not found: {0}")]
    NotFound(String),

    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Read failed: {0}")]
    ReadFailed(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Capability set of a storage provider hosting one or more backends.
///
/// Jobs, statuses, and results are addressed by `(device, username, job_id)`.
/// The provider owns all status transitions; the gateway only writes the
/// initial INITIALIZING record and reads thereafter.
#[async_trait]
pub trait StorageProvider: Send + Sync {
    /// The provider's record name (lowercase alphanumeric).
    fn name(&self) -> &str;

    /// Short names of all devices this provider currently hosts, in storage
    /// order (not sorted).
    async fn get_backends(&self) -> StorageResult<Vec<String>>;

    /// The stored configuration document for one device.
    async fn get_config(&self, device: &str) -> StorageResult<DeviceConfig>;

    /// Store (or replace) the configuration document for a device. This is
    /// how a backend comes into existence.
    async fn upload_config(&self, config: &DeviceConfig, device: &str) -> StorageResult<()>;

    /// Record that a worker just polled the device's queue; drives the
    /// operational flag.
    async fn timestamp_queue(&self, device: &str) -> StorageResult<()>;

    /// Number of queued jobs for a device.
    async fn pending_jobs(&self, device: &str) -> StorageResult<u64>;

    /// Persist a job payload, minting a fresh job id. Never idempotent:
    /// identical payloads get distinct ids.
    async fn upload_job(
        &self,
        payload: &serde_json::Value,
        device: &str,
        username: &str,
    ) -> StorageResult<String>;

    /// Write the initial status record for a freshly uploaded job and return
    /// it.
    async fn upload_status(
        &self,
        device: &str,
        username: &str,
        job_id: &str,
    ) -> StorageResult<StatusMsg>;

    /// Fetch the current status record of a job.
    async fn get_status(
        &self,
        device: &str,
        username: &str,
        job_id: &str,
    ) -> StorageResult<StatusMsg>;

    /// Fetch the result record of a job. Callers must have observed DONE
    /// status first.
    async fn get_result(
        &self,
        device: &str,
        username: &str,
        job_id: &str,
    ) -> StorageResult<ResultDoc>;

    /// Device metadata assembled for `get_config` / `/backends`. The `url`
    /// field is left empty; the coordinator derives it.
    async fn get_backend_dict(&self, device: &str) -> StorageResult<BackendConfig> {
        let config = self.get_config(device).await?;
        let pending = self.pending_jobs(device).await.unwrap_or(0);
        Ok(BackendConfig::from_device(
            self.name(),
            device,
            &config,
            pending,
            Utc::now(),
        ))
    }

    /// Live status of a device.
    async fn get_backend_status(&self, device: &str) -> StorageResult<BackendStatus> {
        let config = self.get_config(device).await?;
        let pending = self.pending_jobs(device).await.unwrap_or(0);
        let now = Utc::now();
        Ok(BackendStatus {
            backend_name: BackendName::full_name(self.name(), device, config.simulator),
            backend_version: config.version.clone(),
            operational: config.operational(now),
            pending_jobs: pending,
            status_msg: String::new(),
        })
    }
}

/// Reject path components that could escape the provider's namespace.
/// Device names, usernames, and job ids are all used as key components.
pub(crate) fn safe_component(value: &str) -> StorageResult<&str> {
    if value.is_empty()
        || value.contains("..")
        || value.contains('/')
        || value.contains('\\')
        || value.starts_with('.')
    {
        return Err(StorageError::InvalidKey(format!(
            "'{value}' contains invalid characters"
        )));
    }
    Ok(value)
}

pub(crate) fn config_key(device: &str) -> StorageResult<String> {
    Ok(format!("backends/configs/{}.json", safe_component(device)?))
}

pub(crate) fn job_key(device: &str, username: &str, job_id: &str) -> StorageResult<String> {
    Ok(format!(
        "jobs/queued/{}/{}/job-{}.json",
        safe_component(device)?,
        safe_component(username)?,
        safe_component(job_id)?
    ))
}

pub(crate) fn status_key(device: &str, username: &str, job_id: &str) -> StorageResult<String> {
    Ok(format!(
        "status/{}/{}/status-{}.json",
        safe_component(device)?,
        safe_component(username)?,
        safe_component(job_id)?
    ))
}

pub(crate) fn result_key(device: &str, username: &str, job_id: &str) -> StorageResult<String> {
    Ok(format!(
        "results/{}/{}/result-{}.json",
        safe_component(device)?,
        safe_component(username)?,
        safe_component(job_id)?
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_component_rejects_traversal() {
        assert!(safe_component("fermions").is_ok());
        assert!(safe_component("..").is_err());
        assert!(safe_component("a/b").is_err());
        assert!(safe_component("a\\b").is_err());
        assert!(safe_component(".hidden").is_err());
        assert!(safe_component("").is_err());
    }

    #[test]
    fn test_key_layout() {
        assert_eq!(
            config_key("fermions").unwrap(),
            "backends/configs/fermions.json"
        );
        assert_eq!(
            status_key("fermions", "alice", "j1").unwrap(),
            "status/fermions/alice/status-j1.json"
        );
        assert!(job_key("fermions", "../alice", "j1").is_err());
    }
}
