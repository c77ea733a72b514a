//! Health check handlers.

use crate::state::AppState;
use axum::extract::State;
use axum::{http::StatusCode, response::IntoResponse, Json};
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Run an async check with timeout; returns "healthy", "timeout", or
/// "{prefix}: {error}".
async fn run_check<F, E>(timeout: Duration, f: F, error_prefix: &str) -> String
where
    F: Future<Output = Result<(), E>>,
    E: Display,
{
    match tokio::time::timeout(timeout, f).await {
        Ok(Ok(())) => "healthy".to_string(),
        Ok(Err(e)) => format!("{}: {}", error_prefix, e),
        Err(_) => "timeout".to_string(),
    }
}

/// Liveness probe - process is running.
pub async fn liveness_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({ "status": "alive" })),
    )
}

/// Health check - verifies the record store answers and every active
/// storage provider can be instantiated.
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    const TIMEOUT: Duration = Duration::from_secs(5);

    let records = state.records.clone();
    let record_store = run_check(
        TIMEOUT,
        async move { records.list_providers().await.map(drop) },
        "unhealthy",
    )
    .await;

    let registry = state.registry.clone();
    let providers = run_check(
        TIMEOUT,
        async move {
            for record in registry.list_active_providers().await? {
                registry.instantiate(&record).await?;
            }
            Ok::<(), qugate_core::AppError>(())
        },
        "unhealthy",
    )
    .await;

    let healthy = record_store == "healthy" && providers == "healthy";
    let status_code = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status_code,
        Json(serde_json::json!({
            "status": if healthy { "healthy" } else { "unhealthy" },
            "record_store": record_store,
            "providers": providers,
        })),
    )
}
