//! Runtime capability detection.

use std::sync::Arc;

use jobping_core::ports::{NotificationPort, PushPort, ServiceWorkerPort};
use jobping_core::CapabilitySet;

/// Detects whether the runtime exposes the primitives a push channel
/// requires: a background execution context host, push messaging, and
/// notification display.
#[derive(Clone)]
pub struct CapabilityProbe {
    service_worker: Arc<dyn ServiceWorkerPort>,
    push: Arc<dyn PushPort>,
    notifications: Arc<dyn NotificationPort>,
}

impl CapabilityProbe {
    /// Create a probe over the three platform ports.
    pub fn new(
        service_worker: Arc<dyn ServiceWorkerPort>,
        push: Arc<dyn PushPort>,
        notifications: Arc<dyn NotificationPort>,
    ) -> Self {
        Self {
            service_worker,
            push,
            notifications,
        }
    }

    /// Read the current capability flags. Pure and synchronous, no side
    /// effects. Computed fresh on every call -- the environment can
    /// change under a test harness, so the result is never cached.
    pub fn probe(&self) -> CapabilitySet {
        CapabilitySet {
            service_worker: self.service_worker.supported(),
            push: self.push.supported(),
            notifications: self.notifications.supported(),
        }
    }

    /// True only if every required capability is present. Callers must
    /// short-circuit on `false` rather than attempt registration.
    pub fn is_supported(&self) -> bool {
        self.probe().is_supported()
    }
}
