//! Failure taxonomy for the push-subscription lifecycle.
//!
//! Every top-level operation returns a tagged [`PushError`] so callers can
//! distinguish "user declined" from "network failure" and pick a retry or
//! degrade policy accordingly. [`FailureKind`] is the lightweight
//! classification the subscription state machine parks in when a pipeline
//! step fails.

use crate::subscription::PermissionState;

/// Error type for every push-subscription operation.
#[derive(Debug, thiserror::Error)]
pub enum PushError {
    /// The runtime is missing at least one required capability
    /// (background execution context, push messaging, or notification
    /// display).
    #[error("Push notifications are not supported in this environment")]
    UnsupportedEnvironment,

    /// The user did not grant notification permission. An expected
    /// outcome, not an exceptional one -- callers should hide or disable
    /// the feature rather than report an error.
    #[error("Notification permission not granted (state: {0:?})")]
    PermissionDenied(PermissionState),

    /// Service-worker registration failed to install or resolve.
    #[error("Service worker registration failed: {0}")]
    RegistrationFailed(String),

    /// The VAPID public key could not be fetched or decoded.
    #[error("VAPID key fetch failed: {0}")]
    KeyFetchFailed(String),

    /// The platform refused to create the push channel.
    #[error("Push subscribe failed: {0}")]
    SubscribeFailed(String),

    /// The backend could not persist or delete the subscription record.
    /// On the subscribe path the push channel is already live client-side
    /// when this is returned; re-running the pipeline re-attempts only
    /// the sync (the platform subscribe call is idempotent).
    #[error("Backend sync failed: {0}")]
    BackendSyncFailed(String),

    /// The local push channel could not be revoked.
    #[error("Unsubscribe failed: {0}")]
    UnsubscribeFailed(String),
}

/// Broad classification of a pipeline failure, carried by the
/// subscription state machine's terminal `Failed` phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    UnsupportedEnvironment,
    PermissionDenied,
    RegistrationFailed,
    KeyFetchFailed,
    SubscribeFailed,
    BackendSyncFailed,
    UnsubscribeFailed,
}

impl PushError {
    /// Classify this error for state reporting.
    pub fn kind(&self) -> FailureKind {
        match self {
            PushError::UnsupportedEnvironment => FailureKind::UnsupportedEnvironment,
            PushError::PermissionDenied(_) => FailureKind::PermissionDenied,
            PushError::RegistrationFailed(_) => FailureKind::RegistrationFailed,
            PushError::KeyFetchFailed(_) => FailureKind::KeyFetchFailed,
            PushError::SubscribeFailed(_) => FailureKind::SubscribeFailed,
            PushError::BackendSyncFailed(_) => FailureKind::BackendSyncFailed,
            PushError::UnsubscribeFailed(_) => FailureKind::UnsubscribeFailed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_matches_variant() {
        assert_eq!(
            PushError::UnsupportedEnvironment.kind(),
            FailureKind::UnsupportedEnvironment
        );
        assert_eq!(
            PushError::PermissionDenied(PermissionState::Denied).kind(),
            FailureKind::PermissionDenied
        );
        assert_eq!(
            PushError::BackendSyncFailed("HTTP 502".into()).kind(),
            FailureKind::BackendSyncFailed
        );
    }

    #[test]
    fn display_includes_cause() {
        let err = PushError::RegistrationFailed("script failed to install".into());
        assert_eq!(
            err.to_string(),
            "Service worker registration failed: script failed to install"
        );
    }
}
