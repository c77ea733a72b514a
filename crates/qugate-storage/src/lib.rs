//! Storage-provider clients for the qugate gateway.
//!
//! A backend (compute device) is physically hosted by exactly one storage
//! provider: local filesystem, S3-compatible object storage, or a document
//! database. All three clients speak the same capability set defined by the
//! [`StorageProvider`] trait and share one document layout:
//!
//! ```text
//! backends/configs/{device}.json
//! jobs/queued/{device}/{username}/job-{job_id}.json
//! status/{device}/{username}/status-{job_id}.json
//! results/{device}/{username}/result-{job_id}.json
//! ```
//!
//! The coordinator in the api crate consumes providers purely through the
//! trait; adding a storage backend means adding a client here and a factory
//! arm, nothing else.

pub mod document;
pub mod factory;
pub mod local;
pub mod object;
pub mod traits;

pub use document::DocumentProvider;
pub use factory::create_provider;
pub use local::LocalProvider;
pub use object::ObjectProvider;
pub use traits::{StorageError, StorageProvider, StorageResult};
