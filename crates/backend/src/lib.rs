//! HTTP client for the JobPing notification backend.
//!
//! Implements the backend side of the push-subscription lifecycle:
//! VAPID key retrieval plus persistence and deletion of subscription
//! records, with bearer-token auth and exponential-backoff retry on the
//! persistence calls. The backend is the system of record -- nothing is
//! persisted client-side.

pub mod api;
pub mod config;

pub use api::{BackendApi, BackendApiError};
pub use config::BackendConfig;
