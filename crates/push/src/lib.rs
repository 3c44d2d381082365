//! Push-subscription lifecycle orchestration for JobPing.
//!
//! This crate owns the subscribe/unsubscribe pipeline over the port
//! traits defined in `jobping-core`:
//!
//! - [`CapabilityProbe`] -- runtime capability detection.
//! - [`PermissionGate`] -- notification-permission read/request.
//! - [`ServiceWorkerRegistrar`] -- background execution context
//!   registration and readiness.
//! - [`SubscriptionManager`] -- the lifecycle state machine tying the
//!   pieces together against the notification backend.

pub mod capability;
pub mod manager;
pub mod permission;
pub mod registrar;

pub use capability::CapabilityProbe;
pub use manager::{SubscriptionManager, SubscriptionPhase};
pub use permission::PermissionGate;
pub use registrar::{ServiceWorkerRegistrar, SERVICE_WORKER_SCRIPT};
