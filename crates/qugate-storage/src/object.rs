use crate::traits::{
    config_key, job_key, result_key, safe_component, status_key, StorageError, StorageProvider,
    StorageResult,
};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use futures::TryStreamExt;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path;
use object_store::Error as ObjectStoreError;
use object_store::{ObjectStore, ObjectStoreExt, PutPayload, Result as ObjectResult};
use qugate_core::models::{DeviceConfig, ObjectLogin, ResultDoc, StatusMsg};
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

/// S3-compatible object storage provider. Documents live as JSON objects in
/// one bucket per provider record.
#[derive(Clone)]
pub struct ObjectProvider {
    name: String,
    store: AmazonS3,
    bucket: String,
}

impl ObjectProvider {
    /// Create a new ObjectProvider instance
    ///
    /// # Arguments
    /// * `login` - validated login blob with bucket, region and credentials
    /// * `name` - the provider record's unique name
    ///
    /// `endpoint_url` in the login supports S3-compatible providers
    /// (e.g. "http://localhost:9000" for MinIO).
    pub async fn new(login: ObjectLogin, name: String) -> StorageResult<Self> {
        let mut builder = AmazonS3Builder::from_env()
            .with_region(login.region.clone())
            .with_bucket_name(login.bucket.clone())
            .with_access_key_id(login.access_key_id.clone())
            .with_secret_access_key(login.secret_access_key.clone());

        if let Some(ref endpoint) = login.endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder
                .with_endpoint(endpoint.clone())
                .with_allow_http(allow_http);
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        Ok(ObjectProvider {
            name,
            store,
            bucket: login.bucket,
        })
    }

    async fn write_doc<T: Serialize>(&self, key: &str, doc: &T) -> StorageResult<()> {
        let data = serde_json::to_vec(doc)
            .map_err(|e| StorageError::WriteFailed(format!("Failed to encode {key}: {e}")))?;
        let size = data.len() as u64;
        let bytes = Bytes::from(data);
        let location = Path::from(key.to_string());

        let start = std::time::Instant::now();

        let result: ObjectResult<_> = self.store.put(&location, PutPayload::from(bytes)).await;

        result.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                key = %key,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Object write failed"
            );
            StorageError::WriteFailed(e.to_string())
        })?;

        tracing::debug!(
            bucket = %self.bucket,
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Object write successful"
        );

        Ok(())
    }

    async fn read_doc<T: DeserializeOwned>(&self, key: &str) -> StorageResult<T> {
        let start = std::time::Instant::now();
        let location = Path::from(key.to_string());

        let result: ObjectResult<_> = self.store.get(&location).await;

        let result = result.map_err(|e| match e {
            ObjectStoreError::NotFound { .. } => StorageError::NotFound(key.to_string()),
            other => {
                tracing::error!(
                    error = %other,
                    bucket = %self.bucket,
                    key = %key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Object read failed"
                );
                StorageError::ReadFailed(other.to_string())
            }
        })?;

        let bytes = result
            .bytes()
            .await
            .map_err(|e| StorageError::ReadFailed(e.to_string()))?;

        serde_json::from_slice(&bytes)
            .map_err(|e| StorageError::ReadFailed(format!("Failed to decode {key}: {e}")))
    }

    async fn list_keys(&self, prefix: &str) -> StorageResult<Vec<Path>> {
        let prefix = Path::from(prefix.to_string());
        let objects: Vec<_> = self
            .store
            .list(Some(&prefix))
            .try_collect()
            .await
            .map_err(|e| StorageError::ReadFailed(e.to_string()))?;
        Ok(objects.into_iter().map(|meta| meta.location).collect())
    }
}

#[async_trait]
impl StorageProvider for ObjectProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get_backends(&self) -> StorageResult<Vec<String>> {
        let keys = self.list_keys("backends/configs").await?;
        let backends = keys
            .iter()
            .filter_map(|key| key.filename())
            .filter_map(|name| name.strip_suffix(".json"))
            .map(|name| name.to_string())
            .collect();
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
        let prefix = format!("jobs/queued/{}", safe_component(device)?);
        let keys = self.list_keys(&prefix).await?;
        Ok(keys.len() as u64)
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
            bucket = %self.bucket,
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
