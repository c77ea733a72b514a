//! Qugate Core Library
//!
//! This crate provides the domain models, error types, configuration, and
//! backend-name resolution shared across all qugate components.

pub mod backend_name;
pub mod config;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use backend_name::BackendName;
pub use config::{Config, RecordStoreKind};
pub use error::{AppError, LogLevel};
pub use models::{
    ApiToken, BackendConfig, BackendStatus, DeviceConfig, JobStatus, LocalLogin, MongodbLogin,
    ObjectLogin, ProviderRecord, ResultDoc, StatusMsg, StorageType,
};
