//! Application state shared across handlers.

use crate::registry::ProviderRegistry;
use qugate_core::Config;
use qugate_db::RecordStore;
use std::sync::Arc;

/// Everything a handler needs: the loaded configuration, the record store,
/// and the provider registry built on top of it.
pub struct AppState {
    pub config: Config,
    pub records: Arc<dyn RecordStore>,
    pub registry: ProviderRegistry,
}

impl AppState {
    pub fn new(config: Config, records: Arc<dyn RecordStore>) -> Arc<Self> {
        let registry = ProviderRegistry::new(records.clone());
        Arc::new(AppState {
            config,
            records,
            registry,
        })
    }
}
