//! Domain models shared across the gateway.

pub mod backend;
pub mod job;
pub mod provider;
pub mod token;

pub use backend::{BackendConfig, BackendStatus, DeviceConfig};
pub use job::{JobStatus, ResultDoc, StatusMsg};
pub use provider::{
    validate_provider_name, LocalLogin, MongodbLogin, ObjectLogin, ProviderRecord, StorageType,
};
pub use token::{validate_uuid_hex, ApiToken};
