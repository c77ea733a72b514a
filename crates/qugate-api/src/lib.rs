//! HTTP gateway for submitting computational jobs to named backends hosted
//! by heterogeneous storage providers.
//!
//! Request flow: the backend identifier in the path is parsed, resolved to a
//! provider record and a device through [`registry::ProviderRegistry`], the
//! bearer credential (where required) is mapped to a username through
//! [`auth`], and the handler drives the submit/status/result sequence
//! against the provider client. Every failure renders the uniform
//! `{job_id, status, detail, error_message}` envelope.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod registry;
pub mod setup;
pub mod state;
