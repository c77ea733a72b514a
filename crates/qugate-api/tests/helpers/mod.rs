//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p qugate-api`. Tests run against
//! the in-memory record store and local-filesystem providers under a
//! tempdir, so no external services are required.

use axum::Router;
use axum_test::TestServer;
use chrono::Utc;
use qugate_api::setup::routes;
use qugate_api::state::AppState;
use qugate_core::models::{
    ApiToken, DeviceConfig, ProviderRecord, ResultDoc, StatusMsg, StorageType,
};
use qugate_core::{Config, RecordStoreKind};
use qugate_db::{MemoryStore, RecordStore};
use qugate_storage::{LocalProvider, StorageProvider};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use uuid::Uuid;

pub const BASE_URL: &str = "http://testserver";

/// Test application: server, record store, and the tempdir backing the
/// local providers.
pub struct TestApp {
    pub server: TestServer,
    pub records: Arc<MemoryStore>,
    temp_dir: TempDir,
}

impl TestApp {
    /// Root directory for one provider's documents.
    pub fn provider_path(&self, provider_name: &str) -> PathBuf {
        self.temp_dir.path().join(provider_name)
    }

    /// Register a local-filesystem provider record.
    pub async fn register_provider(&self, name: &str, is_active: bool) -> ProviderRecord {
        let record = ProviderRecord {
            id: Uuid::new_v4(),
            storage_type: StorageType::Local,
            name: name.to_string(),
            is_active,
            owner: "admin".to_string(),
            description: String::new(),
            login: serde_json::json!({
                "base_path": self.provider_path(name).to_string_lossy(),
            }),
        };
        self.records.add_provider(record.clone()).await.unwrap();
        record
    }

    /// Store a device config under a provider, optionally marking the queue
    /// as freshly checked so the device reports operational.
    pub async fn register_device(
        &self,
        provider_name: &str,
        device: &str,
        simulator: bool,
        operational: bool,
    ) {
        let storage = LocalProvider::new(
            serde_json::from_value(serde_json::json!({
                "base_path": self.provider_path(provider_name).to_string_lossy(),
            }))
            .unwrap(),
            provider_name.to_string(),
        )
        .await
        .unwrap();

        storage
            .upload_config(&device_config(device, simulator), device)
            .await
            .unwrap();
        if operational {
            storage.timestamp_queue(device).await.unwrap();
        }
    }

    /// Register a token mapping to a username.
    pub async fn register_token(&self, key: &str, user: &str) {
        self.records
            .add_token(ApiToken {
                key: key.to_string(),
                user: user.to_string(),
                created_at: Utc::now(),
                is_active: true,
                storage_provider: None,
                uuid_hex: None,
            })
            .await
            .unwrap();
    }

    /// Overwrite a job's stored status record directly, as a worker would.
    pub fn write_status(
        &self,
        provider_name: &str,
        device: &str,
        username: &str,
        status: &StatusMsg,
    ) {
        let path = self
            .provider_path(provider_name)
            .join(format!(
                "status/{device}/{username}/status-{}.json",
                status.job_id
            ));
        write_json(&path, status);
    }

    /// Store a result document directly, as a worker would after finishing.
    pub fn write_result(
        &self,
        provider_name: &str,
        device: &str,
        username: &str,
        result: &ResultDoc,
    ) {
        let path = self.provider_path(provider_name).join(format!(
            "results/{device}/{username}/result-{}.json",
            result.job_id
        ));
        write_json(&path, result);
    }
}

fn write_json<T: serde::Serialize>(path: &Path, doc: &T) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, serde_json::to_vec_pretty(doc).unwrap()).unwrap();
}

pub fn device_config(device: &str, simulator: bool) -> DeviceConfig {
    serde_json::from_value(serde_json::json!({
        "display_name": device,
        "description": format!("{device} test device"),
        "version": "0.0.1",
        "simulator": simulator,
        "num_wires": 4,
        "max_shots": 100,
        "max_experiments": 5,
    }))
    .unwrap()
}

pub fn done_result(device: &str, job_id: &str) -> ResultDoc {
    ResultDoc {
        backend_name: device.to_string(),
        display_name: device.to_string(),
        backend_version: "0.0.1".to_string(),
        job_id: job_id.to_string(),
        qobj_id: None,
        success: true,
        status: "finished".to_string(),
        header: serde_json::json!({}),
        results: vec![serde_json::json!({ "shots": 4, "success": true })],
    }
}

/// Build the test server over an in-memory record store.
pub async fn setup_test_app() -> TestApp {
    let temp_dir = tempfile::tempdir().unwrap();
    let records = Arc::new(MemoryStore::new());

    let config = Config {
        server_port: 8000,
        base_url: BASE_URL.to_string(),
        record_store: RecordStoreKind::Memory,
        database_url: None,
        environment: "test".to_string(),
        cors_origins: vec!["*".to_string()],
    };

    let state = AppState::new(config.clone(), records.clone());
    let router: Router = routes::setup_routes(&config, state).unwrap();
    let server = TestServer::new(router).unwrap();

    TestApp {
        server,
        records,
        temp_dir,
    }
}
