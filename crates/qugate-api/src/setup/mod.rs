//! Application setup and initialization, extracted from main.rs.

pub mod database;
pub mod routes;
pub mod server;
pub mod telemetry;

use crate::state::AppState;
use anyhow::{Context, Result};
use qugate_core::{Config, RecordStoreKind};
use qugate_db::{MemoryStore, PgStore, RecordStore};
use std::sync::Arc;

/// Initialize the entire application: configuration validation, telemetry,
/// record store, state, and routes.
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    config
        .validate()
        .context("Configuration validation failed")?;

    telemetry::init_telemetry();
    tracing::info!("Configuration loaded and validated successfully");

    let records: Arc<dyn RecordStore> = match config.record_store {
        RecordStoreKind::Postgres => {
            let pool = database::setup_database(&config).await?;
            Arc::new(PgStore::new(pool))
        }
        RecordStoreKind::Memory => {
            tracing::warn!("Using in-memory record store; records will not survive a restart");
            Arc::new(MemoryStore::new())
        }
    };

    let state = AppState::new(config.clone(), records);
    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
