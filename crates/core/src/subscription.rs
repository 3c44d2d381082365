//! Subscription record and permission/capability value types.

use serde::{Deserialize, Serialize};

use crate::keys;
use crate::ports::PushChannel;

/// The user's notification-permission state as reported by the runtime.
///
/// Mutated only by explicit user action through the permission prompt,
/// never by this component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionState {
    /// The user has not been asked yet.
    Default,
    /// The user granted notification permission.
    Granted,
    /// The user denied notification permission.
    Denied,
}

/// Capability flags for the runtime environment, computed fresh on every
/// probe -- the environment can change under a test harness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapabilitySet {
    /// A background execution context can be registered.
    pub service_worker: bool,
    /// Push messaging is available.
    pub push: bool,
    /// Notifications can be displayed.
    pub notifications: bool,
}

impl CapabilitySet {
    /// True only if all three capabilities are present. Callers must
    /// short-circuit on `false` rather than attempt registration.
    pub fn is_supported(&self) -> bool {
        self.service_worker && self.push && self.notifications
    }
}

/// Encryption keys of a push channel, standard-base64 encoded for
/// transport. The backend decodes these with a standard (non-URL-safe)
/// decoder, so the alphabet must match exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionKeys {
    /// Client public key (uncompressed P-256 point).
    pub p256dh: String,
    /// Authentication secret.
    pub auth: String,
}

/// The subscription record persisted by the backend: an opaque
/// push-service endpoint plus the channel's encryption keys.
///
/// Immutable once created. A fresh record requires unsubscribing the old
/// channel first -- enforced by the platform, not by this layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionRecord {
    /// Opaque push-service URL addressing this device.
    pub endpoint: String,
    /// Channel encryption keys, standard base64.
    pub keys: SubscriptionKeys,
}

impl SubscriptionRecord {
    /// Build the transport record from a live platform channel,
    /// encoding the raw key bytes as standard base64.
    pub fn from_channel(channel: &PushChannel) -> Self {
        Self {
            endpoint: channel.endpoint.clone(),
            keys: SubscriptionKeys {
                p256dh: keys::encode_key_buffer(&channel.p256dh),
                auth: keys::encode_key_buffer(&channel.auth),
            },
        }
    }
}
