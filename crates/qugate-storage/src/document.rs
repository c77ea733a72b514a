use crate::traits::{StorageError, StorageProvider, StorageResult};
use async_trait::async_trait;
use chrono::Utc;
use mongodb::bson::{doc, Bson, Document};
use mongodb::{Client, Collection, Database};
use qugate_core::models::{DeviceConfig, MongodbLogin, ResultDoc, StatusMsg};
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

/// MongoDB document storage provider. Each provider record gets its own
/// database; device configs, queued jobs, status records and results each
/// live in their own collection.
#[derive(Clone)]
pub struct DocumentProvider {
    name: String,
    db: Database,
}

impl DocumentProvider {
    /// Create a new DocumentProvider instance
    ///
    /// # Arguments
    /// * `login` - validated login blob with the cluster address and credentials
    /// * `name` - the provider record's unique name, used as the database name
    pub async fn new(login: MongodbLogin, name: String) -> StorageResult<Self> {
        // The stored address may or may not carry the scheme already.
        let address = login
            .mongodb_database_url
            .strip_prefix("mongodb://")
            .unwrap_or(&login.mongodb_database_url);
        let uri = if login.mongodb_username.is_empty() {
            format!("mongodb://{address}")
        } else {
            format!(
                "mongodb://{}:{}@{address}",
                login.mongodb_username, login.mongodb_password
            )
        };

        let client = Client::with_uri_str(&uri)
            .await
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;
        let db = client.database(&name);

        Ok(DocumentProvider { name, db })
    }

    fn configs(&self) -> Collection<Document> {
        self.db.collection("configs")
    }

    fn jobs(&self) -> Collection<Document> {
        self.db.collection("jobs")
    }

    fn status(&self) -> Collection<Document> {
        self.db.collection("status")
    }

    fn results(&self) -> Collection<Document> {
        self.db.collection("results")
    }

    fn encode<T: Serialize>(value: &T) -> StorageResult<Bson> {
        mongodb::bson::to_bson(value).map_err(|e| StorageError::WriteFailed(e.to_string()))
    }

    fn decode<T: DeserializeOwned>(bson: Bson) -> StorageResult<T> {
        mongodb::bson::from_bson(bson).map_err(|e| StorageError::ReadFailed(e.to_string()))
    }

    /// Fetch one embedded document from a collection, or NotFound.
    async fn read_embedded<T: DeserializeOwned>(
        &self,
        collection: Collection<Document>,
        filter: Document,
        field: &str,
        key: &str,
    ) -> StorageResult<T> {
        let found = collection
            .find_one(filter)
            .await
            .map_err(|e| StorageError::ReadFailed(e.to_string()))?;

        let mut found = found.ok_or_else(|| StorageError::NotFound(key.to_string()))?;
        let bson = found
            .remove(field)
            .ok_or_else(|| StorageError::ReadFailed(format!("Missing field {field} in {key}")))?;
        Self::decode(bson)
    }
}

#[async_trait]
impl StorageProvider for DocumentProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get_backends(&self) -> StorageResult<Vec<String>> {
        let devices = self
            .configs()
            .distinct("device", doc! {})
            .await
            .map_err(|e| StorageError::ReadFailed(e.to_string()))?;

        Ok(devices
            .into_iter()
            .filter_map(|b| match b {
                Bson::String(device) => Some(device),
                _ => None,
            })
            .collect())
    }

    async fn get_config(&self, device: &str) -> StorageResult<DeviceConfig> {
        self.read_embedded(self.configs(), doc! { "device": device }, "config", device)
            .await
    }

    async fn upload_config(&self, config: &DeviceConfig, device: &str) -> StorageResult<()> {
        let start = std::time::Instant::now();
        let replacement = doc! {
            "device": device,
            "config": Self::encode(config)?,
        };

        self.configs()
            .replace_one(doc! { "device": device }, replacement)
            .upsert(true)
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    provider = %self.name,
                    device = %device,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Config write failed"
                );
                StorageError::WriteFailed(e.to_string())
            })?;

        tracing::debug!(
            provider = %self.name,
            device = %device,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Config write successful"
        );

        Ok(())
    }

    async fn timestamp_queue(&self, device: &str) -> StorageResult<()> {
        let mut config = self.get_config(device).await?;
        config.last_queue_check = Some(Utc::now());
        self.upload_config(&config, device).await
    }

    async fn pending_jobs(&self, device: &str) -> StorageResult<u64> {
        self.jobs()
            .count_documents(doc! { "device": device })
            .await
            .map_err(|e| StorageError::ReadFailed(e.to_string()))
    }

    async fn upload_job(
        &self,
        payload: &serde_json::Value,
        device: &str,
        username: &str,
    ) -> StorageResult<String> {
        let job_id = Uuid::new_v4().to_string();
        let job = doc! {
            "job_id": &job_id,
            "device": device,
            "username": username,
            "job": Self::encode(payload)?,
        };

        self.jobs()
            .insert_one(job)
            .await
            .map_err(|e| StorageError::WriteFailed(e.to_string()))?;

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
        let record = doc! {
            "job_id": job_id,
            "device": device,
            "username": username,
            "status_msg": Self::encode(&status)?,
        };

        self.status()
            .replace_one(doc! { "job_id": job_id, "device": device, "username": username }, record)
            .upsert(true)
            .await
            .map_err(|e| StorageError::WriteFailed(e.to_string()))?;

        Ok(status)
    }

    async fn get_status(
        &self,
        device: &str,
        username: &str,
        job_id: &str,
    ) -> StorageResult<StatusMsg> {
        self.read_embedded(
            self.status(),
            doc! { "job_id": job_id, "device": device, "username": username },
            "status_msg",
            job_id,
        )
        .await
    }

    async fn get_result(
        &self,
        device: &str,
        username: &str,
        job_id: &str,
    ) -> StorageResult<ResultDoc> {
        self.read_embedded(
            self.results(),
            doc! { "job_id": job_id, "device": device, "username": username },
            "result",
            job_id,
        )
        .await
    }
}
