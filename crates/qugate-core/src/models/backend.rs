//! Backend (device) read models.
//!
//! `DeviceConfig` is the document a provider stores per device;
//! `BackendConfig` and `BackendStatus` are the per-request read models the
//! API assembles from it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::backend_name::BackendName;

/// A device is considered operational only if a worker has checked its queue
/// within this window.
pub const QUEUE_CHECK_WINDOW_SECS: i64 = 300;

/// The configuration document stored by a provider for one device, keyed by
/// the device short-name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub cold_atom_type: String,
    pub simulator: bool,
    #[serde(default)]
    pub num_wires: u64,
    #[serde(default)]
    pub num_species: u64,
    #[serde(default)]
    pub max_shots: u64,
    #[serde(default)]
    pub max_experiments: u64,
    #[serde(default)]
    pub wire_order: String,
    #[serde(default)]
    pub gates: Vec<serde_json::Value>,
    #[serde(default)]
    pub supported_instructions: Vec<String>,
    /// Last time a worker polled this device's queue. Freshness drives the
    /// operational flag; the stored `operational` field of the original
    /// upload is deliberately not trusted.
    #[serde(default)]
    pub last_queue_check: Option<DateTime<Utc>>,
}

fn default_version() -> String {
    "0.0.1".to_string()
}

impl DeviceConfig {
    /// Operational means the queue was checked recently.
    pub fn operational(&self, now: DateTime<Utc>) -> bool {
        match self.last_queue_check {
            Some(checked) => (now - checked).num_seconds() < QUEUE_CHECK_WINDOW_SECS,
            None => false,
        }
    }
}

/// Device metadata as served by `get_config` and `/backends`. The `url`
/// field is derived by the coordinator, never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    pub backend_name: String,
    pub display_name: String,
    pub description: String,
    pub backend_version: String,
    pub cold_atom_type: String,
    pub simulator: bool,
    pub num_wires: u64,
    pub num_species: u64,
    pub max_shots: u64,
    pub max_experiments: u64,
    pub wire_order: String,
    pub gates: Vec<serde_json::Value>,
    pub supported_instructions: Vec<String>,
    pub pending_jobs: u64,
    pub operational: bool,
    pub url: String,
}

impl BackendConfig {
    /// Assemble the read model for one device of one provider. The fully
    /// qualified `backend_name` gets its variant suffix from the device's
    /// own simulator flag.
    pub fn from_device(
        provider_name: &str,
        device: &str,
        config: &DeviceConfig,
        pending_jobs: u64,
        now: DateTime<Utc>,
    ) -> Self {
        BackendConfig {
            backend_name: BackendName::full_name(provider_name, device, config.simulator),
            display_name: config.display_name.clone(),
            description: config.description.clone(),
            backend_version: config.version.clone(),
            cold_atom_type: config.cold_atom_type.clone(),
            simulator: config.simulator,
            num_wires: config.num_wires,
            num_species: config.num_species,
            max_shots: config.max_shots,
            max_experiments: config.max_experiments,
            wire_order: config.wire_order.clone(),
            gates: config.gates.clone(),
            supported_instructions: config.supported_instructions.clone(),
            pending_jobs,
            operational: config.operational(now),
            url: String::new(),
        }
    }
}

/// Live device status as served by `get_backend_status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendStatus {
    pub backend_name: String,
    pub backend_version: String,
    pub operational: bool,
    pub pending_jobs: u64,
    pub status_msg: String,
}
