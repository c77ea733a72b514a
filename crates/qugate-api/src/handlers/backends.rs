//! Backend metadata endpoints: configuration, live status, and the listing
//! of all visible devices.

use crate::error::HttpAppError;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::Json;
use qugate_core::models::{BackendConfig, BackendStatus};
use qugate_core::AppError;
use qugate_storage::StorageError;
use std::sync::Arc;

/// A missing device document is reported as an unknown backend, everything
/// else as a provider read failure.
fn map_device_read(device: &str, e: StorageError) -> AppError {
    match e {
        StorageError::NotFound(_) => AppError::UnknownDevice(device.to_string()),
        other => AppError::ProviderRead(other.to_string()),
    }
}

/// The fully qualified backend URL served in device configurations.
fn derive_url(base_url: &str, full_backend_name: &str) -> String {
    format!("{base_url}/api/v2/{full_backend_name}/")
}

/// GET `/{backend_name}/get_config` - device metadata with the derived URL.
/// No auth required.
pub async fn get_config(
    State(state): State<Arc<AppState>>,
    Path(backend_name): Path<String>,
) -> Result<Json<BackendConfig>, HttpAppError> {
    let resolved = state.registry.resolve(&backend_name).await?;
    let mut config = resolved
        .provider
        .get_backend_dict(&resolved.device)
        .await
        .map_err(|e| map_device_read(&resolved.device, e))?;

    // The URL is derived per request; the variant suffix comes from the
    // device's own simulator flag, already baked into backend_name.
    config.url = derive_url(&state.config.base_url, &config.backend_name);

    Ok(Json(config))
}

/// GET `/{backend_name}/get_backend_status` - live device status. No auth
/// required.
pub async fn get_backend_status(
    State(state): State<Arc<AppState>>,
    Path(backend_name): Path<String>,
) -> Result<Json<BackendStatus>, HttpAppError> {
    let resolved = state.registry.resolve(&backend_name).await?;
    let status = resolved
        .provider
        .get_backend_status(&resolved.device)
        .await
        .map_err(|e| map_device_read(&resolved.device, e))?;
    Ok(Json(status))
}

/// GET `/backends` - every device of every active provider, in registration
/// order then device-list order. Devices with "dummy" in the name are test
/// fixtures and are skipped.
pub async fn list_backends(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<BackendConfig>>, HttpAppError> {
    let mut backend_list = Vec::new();

    for record in state.registry.list_active_providers().await? {
        let provider = match state.registry.instantiate(&record).await {
            Ok(provider) => provider,
            Err(e) => {
                tracing::warn!(provider = %record.name, error = %e, "Skipping provider in backend listing");
                continue;
            }
        };

        let devices = match provider.get_backends().await {
            Ok(devices) => devices,
            Err(e) => {
                tracing::warn!(provider = %record.name, error = %e, "Device listing failed");
                continue;
            }
        };

        for device in devices {
            if device.contains("dummy") {
                continue;
            }
            match provider.get_backend_dict(&device).await {
                Ok(config) => backend_list.push(config),
                Err(e) => {
                    tracing::warn!(provider = %record.name, device = %device, error = %e, "Device config unavailable")
                }
            }
        }
    }

    Ok(Json(backend_list))
}
