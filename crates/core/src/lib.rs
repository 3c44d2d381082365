//! JobPing push-subscription domain types and port definitions.
//!
//! This crate provides the shared building blocks for the push channel
//! lifecycle:
//!
//! - [`SubscriptionRecord`] -- the wire format persisted by the backend.
//! - [`PushError`] -- the failure taxonomy for every lifecycle operation.
//! - [`keys`] -- VAPID key codec (base64url in, standard base64 out).
//! - [`ports`] -- platform and backend port traits injected into the
//!   subscription manager, substitutable with test doubles.

pub mod error;
pub mod keys;
pub mod ports;
pub mod subscription;
pub mod types;

pub use error::{FailureKind, PushError};
pub use subscription::{CapabilitySet, PermissionState, SubscriptionKeys, SubscriptionRecord};
pub use types::UserId;
