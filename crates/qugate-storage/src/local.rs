use crate::traits::{
    config_key, job_key, result_key, status_key, StorageError, StorageProvider, StorageResult,
};
use async_trait::async_trait;
use chrono::Utc;
use qugate_core::models::{DeviceConfig, LocalLogin, ResultDoc, StatusMsg};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

/// Local filesystem storage provider: every document is a JSON file under
/// the configured base path.
#[derive(Clone)]
pub struct LocalProvider {
    name: String,
    base_path: PathBuf,
}

impl LocalProvider {
    /// Create a new LocalProvider for a provider record.
    ///
    /// # Arguments
    /// * `login` - validated login blob carrying the base path
    /// * `name` - the provider record's unique name
    pub async fn new(login: LocalLogin, name: String) -> StorageResult<Self> {
        let base_path = PathBuf::from(&login.base_path);

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalProvider { name, base_path })
    }

    fn full_path(&self, key: &str) -> PathBuf {
        self.base_path.join(key)
    }

    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    async fn write_doc<T: Serialize>(&self, key: &str, doc: &T) -> StorageResult<()> {
        let path = self.full_path(key);
        self.ensure_parent_dir(&path).await?;

        let data = serde_json::to_vec_pretty(doc)
            .map_err(|e| StorageError::WriteFailed(format!("Failed to encode {key}: {e}")))?;

        let start = std::time::Instant::now();

        let mut file = fs::File::create(&path).await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;
        file.write_all(&data).await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;
        file.sync_all().await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        tracing::debug!(
            provider = %self.name,
            key = %key,
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local document write successful"
        );

        Ok(())
    }

    async fn read_doc<T: DeserializeOwned>(&self, key: &str) -> StorageResult<T> {
        let path = self.full_path(key);

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Err(StorageError::NotFound(key.to_string()));
        }

        let data = fs::read(&path).await.map_err(|e| {
            StorageError::ReadFailed(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        serde_json::from_slice(&data)
            .map_err(|e| StorageError::ReadFailed(format!("Failed to decode {key}: {e}")))
    }
}

#[async_trait]
impl StorageProvider for LocalProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get_backends(&self) -> StorageResult<Vec<String>> {
        let configs_dir = self.base_path.join("backends/configs");
        if !fs::try_exists(&configs_dir).await.unwrap_or(false) {
            return Ok(Vec::new());
        }

        let mut backends = Vec::new();
        let mut entries = fs::read_dir(&configs_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    backends.push(stem.to_string());
                }
            }
        }
        Ok(backends)
    }

    async fn get_config(&self, device: &str) -> StorageResult<DeviceConfig> {
        self.read_doc(&config_key(device)?).await
    }

    async fn upload_config(&self, config: &DeviceConfig, device: &str) -> StorageResult<()> {
        self.write_doc(&config_key(device)?, config).await
    }

    async fn timestamp_queue(&self, device: &str) -> StorageResult<()> {
        let mut config = self.get_config(device).await?;
        config.last_queue_check = Some(Utc::now());
        self.upload_config(&config, device).await
    }

    async fn pending_jobs(&self, device: &str) -> StorageResult<u64> {
        let queued_dir = self
            .base_path
            .join("jobs/queued")
            .join(crate::traits::safe_component(device)?);
        if !fs::try_exists(&queued_dir).await.unwrap_or(false) {
            return Ok(0);
        }

        let mut count = 0u64;
        let mut user_dirs = fs::read_dir(&queued_dir).await?;
        while let Some(user_dir) = user_dirs.next_entry().await? {
            if !user_dir.file_type().await?.is_dir() {
                continue;
            }
            let mut jobs = fs::read_dir(user_dir.path()).await?;
            while let Some(job) = jobs.next_entry().await? {
                if job.file_type().await?.is_file() {
                    count += 1;
                }
            }
        }
        Ok(count)
    }

    async fn upload_job(
        &self,
        payload: &serde_json::Value,
        device: &str,
        username: &str,
    ) -> StorageResult<String> {
        let job_id = Uuid::new_v4().to_string();
        let doc = serde_json::json!({
            "job_id": job_id,
            "device": device,
            "user": username,
            "job": payload,
        });
        self.write_doc(&job_key(device, username, &job_id)?, &doc)
            .await?;

        tracing::info!(
            provider = %self.name,
            device = %device,
            user = %username,
            job_id = %job_id,
            "Job uploaded"
        );

        Ok(job_id)
    }

    async fn upload_status(
        &self,
        device: &str,
        username: &str,
        job_id: &str,
    ) -> StorageResult<StatusMsg> {
        let status = StatusMsg::initializing(job_id);
        self.write_doc(&status_key(device, username, job_id)?, &status)
            .await?;
        Ok(status)
    }

    async fn get_status(
        &self,
        device: &str,
        username: &str,
        job_id: &str,
    ) -> StorageResult<StatusMsg> {
        self.read_doc(&status_key(device, username, job_id)?).await
    }

    async fn get_result(
        &self,
        device: &str,
        username: &str,
        job_id: &str,
    ) -> StorageResult<ResultDoc> {
        self.read_doc(&result_key(device, username, job_id)?).await
    }
}
