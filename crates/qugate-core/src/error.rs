//! Error types module
//!
//! All failures in the gateway are unified under the `AppError` enum. Every
//! variant carries enough information to render the uniform
//! `{job_id, status, detail, error_message}` envelope that all endpoints
//! return on failure; the HTTP-specific conversion lives in the api crate.

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like unknown backends
    Debug,
    /// Warning level - for rejected credentials and bad payloads
    Warn,
    /// Error level - for unexpected failures
    Error,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The backend identifier did not split into 1 or 3 parts.
    #[error("malformed backend identifier: {0}")]
    MalformedIdentifier(String),

    /// No storage-provider record matched the identifier.
    #[error("unknown provider for backend: {0}")]
    UnknownProvider(String),

    /// The provider exists but does not host the requested device.
    #[error("unknown device: {0}")]
    UnknownDevice(String),

    /// The presented credential matched no stored token key.
    #[error("invalid credentials")]
    InvalidCredential,

    /// The submitted job payload was not decodable as structured job data.
    #[error("payload decode error: {0}")]
    PayloadDecode(String),

    /// The storage provider rejected a job or status write.
    #[error("provider write failure: {0}")]
    ProviderWrite(String),

    /// The storage provider could not produce a status or result record.
    #[error("provider read failure: {0}")]
    ProviderRead(String),

    /// A stored provider record does not satisfy its declared login schema.
    #[error("misconfigured provider record: {0}")]
    Misconfigured(String),

    /// Record-store (database) failure.
    #[error("record store error: {0}")]
    Database(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status code for this error (see the endpoint table in the docs:
    /// 401 for credential failures, 404 for unknown backends, 406 for
    /// payload and provider failures).
    pub fn http_status_code(&self) -> u16 {
        match self {
            AppError::MalformedIdentifier(_)
            | AppError::UnknownProvider(_)
            | AppError::UnknownDevice(_)
            | AppError::Misconfigured(_) => 404,
            AppError::InvalidCredential => 401,
            AppError::PayloadDecode(_) | AppError::ProviderWrite(_) | AppError::ProviderRead(_) => {
                406
            }
            AppError::Database(_) | AppError::Internal(_) => 500,
        }
    }

    /// The `detail` field of the uniform error envelope.
    pub fn detail(&self) -> String {
        match self {
            AppError::MalformedIdentifier(name) | AppError::UnknownProvider(name) => format!(
                "Unknown back-end {name}! The string should have 1 or three parts separated by `_`!"
            ),
            AppError::UnknownDevice(_) | AppError::Misconfigured(_) => {
                "Unknown back-end!".to_string()
            }
            AppError::InvalidCredential => "Invalid credentials!".to_string(),
            AppError::PayloadDecode(_) => {
                "The encoding of your json seems not work out!".to_string()
            }
            AppError::ProviderWrite(_) => "Error saving json data to database!".to_string(),
            AppError::ProviderRead(msg) => msg.clone(),
            AppError::Database(_) | AppError::Internal(_) => "Internal error!".to_string(),
        }
    }

    /// The `error_message` field of the uniform error envelope.
    pub fn error_message(&self) -> String {
        match self {
            AppError::MalformedIdentifier(_)
            | AppError::UnknownProvider(_)
            | AppError::UnknownDevice(_)
            | AppError::Misconfigured(_) => "Unknown back-end!".to_string(),
            AppError::InvalidCredential => "Invalid credentials!".to_string(),
            AppError::PayloadDecode(_) => {
                "The encoding of your json seems not work out!".to_string()
            }
            AppError::ProviderWrite(_) => "Error saving json data to database!".to_string(),
            AppError::ProviderRead(msg) => msg.clone(),
            AppError::Database(_) | AppError::Internal(_) => "Internal error!".to_string(),
        }
    }

    /// Log level for this error
    pub fn log_level(&self) -> LogLevel {
        match self {
            AppError::MalformedIdentifier(_)
            | AppError::UnknownProvider(_)
            | AppError::UnknownDevice(_) => LogLevel::Debug,
            AppError::InvalidCredential | AppError::PayloadDecode(_) => LogLevel::Warn,
            AppError::ProviderWrite(_)
            | AppError::ProviderRead(_)
            | AppError::Misconfigured(_)
            | AppError::Database(_)
            | AppError::Internal(_) => LogLevel::Error,
        }
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::InvalidCredential.http_status_code(), 401);
        assert_eq!(
            AppError::MalformedIdentifier("a_b".into()).http_status_code(),
            404
        );
        assert_eq!(
            AppError::UnknownDevice("fermions".into()).http_status_code(),
            404
        );
        assert_eq!(
            AppError::PayloadDecode("bad json".into()).http_status_code(),
            406
        );
        assert_eq!(
            AppError::ProviderWrite("auth failed".into()).http_status_code(),
            406
        );
    }

    #[test]
    fn test_unknown_backend_detail_names_offender() {
        let err = AppError::UnknownProvider("ghostprovider_x_simulator".into());
        assert!(err.detail().contains("Unknown back-end ghostprovider_x_simulator!"));
        assert_eq!(err.error_message(), "Unknown back-end!");
    }

    #[test]
    fn test_invalid_credential_bodies_match() {
        let err = AppError::InvalidCredential;
        assert_eq!(err.detail(), "Invalid credentials!");
        assert_eq!(err.error_message(), "Invalid credentials!");
    }
}
