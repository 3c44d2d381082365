//! Platform and backend port traits.
//!
//! The subscription manager never touches the runtime's push surface
//! directly -- it goes through these traits, so the capability probe,
//! permission gate, and backend sync are substitutable with
//! deterministic doubles in tests. Production adapters wrap the real
//! platform bindings and the notification backend's HTTP API.

use async_trait::async_trait;

use crate::error::PushError;
use crate::subscription::{PermissionState, SubscriptionRecord};
use crate::types::UserId;

/// Handle for a registered background execution context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    /// URL of the registered worker script.
    pub script_url: String,
    /// Scope the registration controls.
    pub scope: String,
    /// Whether the worker has reached the active state.
    pub active: bool,
}

/// A live push channel: the platform-issued endpoint plus raw
/// encryption key material. Encoded into a
/// [`SubscriptionRecord`](crate::SubscriptionRecord) for transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushChannel {
    /// Opaque push-service URL addressing this device.
    pub endpoint: String,
    /// Raw client public key bytes (uncompressed P-256 point).
    pub p256dh: Vec<u8>,
    /// Raw authentication secret bytes.
    pub auth: Vec<u8>,
}

/// Options for the platform push-subscribe call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscribeOptions {
    /// Every push must produce a user-visible notification. A platform
    /// requirement -- subscribe calls without it are rejected.
    pub user_visible_only: bool,
    /// Decoded VAPID public key identifying the application server.
    pub application_server_key: Vec<u8>,
}

/// Notification display and permission surface.
#[async_trait]
pub trait NotificationPort: Send + Sync {
    /// Whether notification display is available at all.
    fn supported(&self) -> bool;

    /// Current permission state. Synchronous read, never prompts.
    fn permission(&self) -> PermissionState;

    /// Prompt the user for notification permission and suspend until
    /// they respond. The platform offers no timeout: an unanswered
    /// prompt suspends the caller indefinitely.
    async fn request_permission(&self) -> Result<PermissionState, PushError>;

    /// Display a locally generated notification.
    async fn show_notification(
        &self,
        title: &str,
        body: &str,
        icon: &str,
    ) -> Result<(), PushError>;
}

/// Background execution context hosting surface.
#[async_trait]
pub trait ServiceWorkerPort: Send + Sync {
    /// Whether background execution contexts can be registered.
    fn supported(&self) -> bool;

    /// Register the worker script. Idempotent -- registering the same
    /// script twice returns the existing registration. Resolves when
    /// the registration call resolves, which may be before the worker
    /// is active.
    async fn register(&self, script_url: &str) -> Result<Registration, PushError>;

    /// Resolve once an active registration exists.
    async fn ready(&self) -> Result<Registration, PushError>;
}

/// Push messaging surface of the registered execution context.
#[async_trait]
pub trait PushPort: Send + Sync {
    /// Whether push messaging is available.
    fn supported(&self) -> bool;

    /// Create (or return the existing) push channel for the
    /// registration.
    async fn subscribe(
        &self,
        registration: &Registration,
        options: SubscribeOptions,
    ) -> Result<PushChannel, PushError>;

    /// The currently active channel, if any.
    async fn subscription(
        &self,
        registration: &Registration,
    ) -> Result<Option<PushChannel>, PushError>;

    /// Revoke a live channel.
    async fn unsubscribe(&self, channel: &PushChannel) -> Result<(), PushError>;
}

/// The notification backend -- the system of record for subscriptions.
#[async_trait]
pub trait BackendPort: Send + Sync {
    /// Fetch the server's VAPID public key (base64url).
    async fn vapid_public_key(&self) -> Result<String, PushError>;

    /// Persist a subscription record for the authenticated account.
    async fn save_subscription(
        &self,
        user_id: UserId,
        record: &SubscriptionRecord,
    ) -> Result<(), PushError>;

    /// Delete the stored subscription for the authenticated account.
    async fn remove_subscription(&self, user_id: UserId) -> Result<(), PushError>;
}
