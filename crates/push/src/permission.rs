//! Notification permission gate.

use std::sync::Arc;

use jobping_core::ports::NotificationPort;
use jobping_core::{PermissionState, PushError};

use crate::capability::CapabilityProbe;

/// Reads and requests the user's notification-permission state.
///
/// The permission itself is owned by the runtime and only changes
/// through the user answering the prompt -- never through this gate.
#[derive(Clone)]
pub struct PermissionGate {
    probe: CapabilityProbe,
    notifications: Arc<dyn NotificationPort>,
}

impl PermissionGate {
    /// Create a gate over the notification port, capability-checked by
    /// the given probe.
    pub fn new(probe: CapabilityProbe, notifications: Arc<dyn NotificationPort>) -> Self {
        Self {
            probe,
            notifications,
        }
    }

    /// Current permission state. Synchronous read, never prompts.
    pub fn permission(&self) -> PermissionState {
        self.notifications.permission()
    }

    /// Prompt the user for notification permission.
    ///
    /// Checks capability first and fails with
    /// [`PushError::UnsupportedEnvironment`] when the runtime cannot
    /// host push at all. Otherwise prompts exactly once and suspends
    /// until the user responds -- the platform offers no timeout, so an
    /// unanswered prompt suspends the caller indefinitely.
    pub async fn request_permission(&self) -> Result<PermissionState, PushError> {
        if !self.probe.is_supported() {
            return Err(PushError::UnsupportedEnvironment);
        }

        self.notifications.request_permission().await
    }
}
