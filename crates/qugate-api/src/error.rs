//! HTTP error response conversion.
//!
//! Handlers return `Result<impl IntoResponse, HttpAppError>`. `AppError`
//! values convert via `?` and render as the uniform
//! `{job_id, status, detail, error_message}` envelope with the fixed
//! transport code of the error class (401 credential, 404 unknown backend,
//! 406 payload/provider failures).

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use qugate_core::models::StatusMsg;
use qugate_core::{AppError, LogLevel};

/// Wrapper type for AppError to implement IntoResponse. Needed because of
/// Rust's orphan rules - IntoResponse is an external trait and AppError
/// lives in qugate-core.
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

fn log_error(error: &AppError) {
    match error.log_level() {
        LogLevel::Debug => tracing::debug!(error = %error, "Request failed"),
        LogLevel::Warn => tracing::warn!(error = %error, "Request failed"),
        LogLevel::Error => tracing::error!(error = %error, "Request failed"),
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        log_error(app_error);

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = StatusMsg {
            job_id: "None".to_string(),
            status: "ERROR".to_string(),
            detail: app_error.detail(),
            error_message: app_error.error_message(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_fields_for_unknown_backend() {
        let response = HttpAppError(AppError::UnknownDevice("fermions".into())).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_credential_failure_is_401() {
        let response = HttpAppError(AppError::InvalidCredential).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
