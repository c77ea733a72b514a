//! Job lifecycle endpoints: submission, status polling, and result
//! retrieval. All three require a credential, carried either as a bearer
//! header or embedded in the payload/query string.

use crate::auth::{authenticate, select_token};
use crate::error::HttpAppError;
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use qugate_core::models::StatusMsg;
use qugate_core::AppError;
use qugate_storage::StorageError;
use serde::Deserialize;
use std::sync::Arc;

/// Submission body. The job is a JSON-encoded string; the optional token
/// field is the payload-embedded credential binding.
#[derive(Debug, Deserialize)]
pub struct JobSubmission {
    pub job: String,
    #[serde(default)]
    pub token: Option<String>,
}

/// Query parameters for status and result polling.
#[derive(Debug, Deserialize)]
pub struct JobQuery {
    pub job_id: String,
    #[serde(default)]
    pub token: Option<String>,
}

fn map_status_read(job_id: &str, e: StorageError) -> AppError {
    match e {
        StorageError::NotFound(_) => {
            AppError::ProviderRead(format!("The job {job_id} does not exist."))
        }
        other => AppError::ProviderRead(other.to_string()),
    }
}

/// POST `/{backend_name}/post_job` - submit a job.
///
/// Order of checks: credential, backend resolution and device membership,
/// payload decoding, then the two-step provider write (job record, then the
/// initial status record). Each submission mints a new job id; resubmission
/// is never idempotent.
pub async fn post_job(
    State(state): State<Arc<AppState>>,
    Path(backend_name): Path<String>,
    headers: HeaderMap,
    body: String,
) -> Result<Json<StatusMsg>, HttpAppError> {
    // The body is deserialized lazily so a credential failure is reported
    // before any payload complaint. Without a bearer header the embedded
    // token is the only credential, so an undecodable body then means no
    // credential at all.
    let submission: Option<JobSubmission> = serde_json::from_str(&body).ok();
    let token = select_token(
        &headers,
        submission.as_ref().and_then(|s| s.token.as_deref()),
    )?;
    let username = authenticate(state.records.as_ref(), &token).await?;

    let resolved = state.registry.resolve(&backend_name).await?;

    let submission =
        submission.ok_or_else(|| AppError::PayloadDecode("undecodable submission body".into()))?;
    let payload: serde_json::Value = serde_json::from_str(&submission.job)
        .map_err(|e| AppError::PayloadDecode(e.to_string()))?;

    let job_id = resolved
        .provider
        .upload_job(&payload, &resolved.device, &username)
        .await
        .map_err(|e| AppError::ProviderWrite(e.to_string()))?;
    let status = resolved
        .provider
        .upload_status(&resolved.device, &username, &job_id)
        .await
        .map_err(|e| AppError::ProviderWrite(e.to_string()))?;

    tracing::info!(
        backend = %backend_name,
        user = %username,
        job_id = %status.job_id,
        "Job accepted"
    );

    Ok(Json(status))
}

/// GET `/{backend_name}/get_job_status?job_id=` - poll the status record.
///
/// A stored ERROR status is echoed at 406 while remaining the body's own
/// terminal state.
pub async fn get_job_status(
    State(state): State<Arc<AppState>>,
    Path(backend_name): Path<String>,
    headers: HeaderMap,
    Query(query): Query<JobQuery>,
) -> Result<Response, HttpAppError> {
    let token = select_token(&headers, query.token.as_deref())?;
    let username = authenticate(state.records.as_ref(), &token).await?;

    let resolved = state.registry.resolve(&backend_name).await?;

    let status = resolved
        .provider
        .get_status(&resolved.device, &username, &query.job_id)
        .await
        .map_err(|e| map_status_read(&query.job_id, e))?;

    if status.is_error() {
        return Ok((StatusCode::NOT_ACCEPTABLE, Json(status)).into_response());
    }
    Ok((StatusCode::OK, Json(status)).into_response())
}

/// GET `/{backend_name}/get_job_result?job_id=` - fetch the result once the
/// job is DONE.
///
/// The status record is consulted first: ERROR echoes at 406, anything
/// short of DONE returns the status record at 200 so the client keeps
/// polling. A result is never returned before the status reaches DONE.
/// Status and result are two separate provider reads; a status flip between
/// them is tolerated.
pub async fn get_job_result(
    State(state): State<Arc<AppState>>,
    Path(backend_name): Path<String>,
    headers: HeaderMap,
    Query(query): Query<JobQuery>,
) -> Result<Response, HttpAppError> {
    let token = select_token(&headers, query.token.as_deref())?;
    let username = authenticate(state.records.as_ref(), &token).await?;

    let resolved = state.registry.resolve(&backend_name).await?;

    let status = resolved
        .provider
        .get_status(&resolved.device, &username, &query.job_id)
        .await
        .map_err(|e| map_status_read(&query.job_id, e))?;

    if status.is_error() {
        return Ok((StatusCode::NOT_ACCEPTABLE, Json(status)).into_response());
    }
    if !status.is_done() {
        return Ok((StatusCode::OK, Json(status)).into_response());
    }

    let result = resolved
        .provider
        .get_result(&resolved.device, &username, &query.job_id)
        .await
        .map_err(|e| map_status_read(&query.job_id, e))?;

    Ok((StatusCode::OK, Json(result)).into_response())
}
