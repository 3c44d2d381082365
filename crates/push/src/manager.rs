//! Subscribe/unsubscribe orchestration and lifecycle state.
//!
//! [`SubscriptionManager`] drives the full pipeline: capability gate,
//! worker registration, permission prompt, VAPID key exchange, platform
//! subscribe, and backend sync. The current [`SubscriptionPhase`] is
//! observable at any point; subscribe and unsubscribe serialize through
//! an in-flight guard so two UI triggers in quick succession cannot
//! race each other into a double backend sync.

use std::sync::{Arc, Mutex};

use jobping_core::keys;
use jobping_core::ports::{
    BackendPort, NotificationPort, PushPort, ServiceWorkerPort, SubscribeOptions,
};
use jobping_core::{FailureKind, PermissionState, PushError, SubscriptionRecord, UserId};

use crate::capability::CapabilityProbe;
use crate::permission::PermissionGate;
use crate::registrar::ServiceWorkerRegistrar;

/// Content of the locally generated test notification.
const TEST_NOTIFICATION_TITLE: &str = "Test Notification";
const TEST_NOTIFICATION_BODY: &str = "This is a test notification from JobPing";
const TEST_NOTIFICATION_ICON: &str = "/logos.png";

/// Lifecycle phase of the push subscription pipeline.
///
/// `Failed` is reachable from every non-terminal phase and records the
/// failure classification; a later subscribe or unsubscribe restarts
/// the machine from the top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionPhase {
    /// No pipeline in flight and no active subscription known.
    Idle,
    /// Registering the background execution context.
    Registering,
    /// Waiting on the user to answer the permission prompt.
    AwaitingPermission,
    /// Fetching the VAPID public key from the backend.
    FetchingKey,
    /// Creating the platform push channel.
    Subscribing,
    /// Persisting the subscription record to the backend.
    Syncing,
    /// A subscription is live and known to the backend.
    Active,
    /// Revoking the local channel and deleting the backend record.
    Unsubscribing,
    /// A pipeline step failed; holds the failure classification.
    Failed(FailureKind),
}

/// Orchestrates the push-subscription lifecycle over injected ports.
pub struct SubscriptionManager {
    probe: CapabilityProbe,
    gate: PermissionGate,
    registrar: ServiceWorkerRegistrar,
    push: Arc<dyn PushPort>,
    backend: Arc<dyn BackendPort>,
    notifications: Arc<dyn NotificationPort>,
    phase: Mutex<SubscriptionPhase>,
    in_flight: tokio::sync::Mutex<()>,
}

impl SubscriptionManager {
    /// Create a manager over the three platform ports and the backend.
    pub fn new(
        notifications: Arc<dyn NotificationPort>,
        service_worker: Arc<dyn ServiceWorkerPort>,
        push: Arc<dyn PushPort>,
        backend: Arc<dyn BackendPort>,
    ) -> Self {
        let probe = CapabilityProbe::new(
            service_worker.clone(),
            push.clone(),
            notifications.clone(),
        );
        let gate = PermissionGate::new(probe.clone(), notifications.clone());
        let registrar = ServiceWorkerRegistrar::new(service_worker);

        Self {
            probe,
            gate,
            registrar,
            push,
            backend,
            notifications,
            phase: Mutex::new(SubscriptionPhase::Idle),
            in_flight: tokio::sync::Mutex::new(()),
        }
    }

    /// Override the worker script URL used for registration.
    pub fn with_script_url(mut self, script_url: impl Into<String>) -> Self {
        self.registrar = self.registrar.with_script_url(script_url);
        self
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> SubscriptionPhase {
        *self.phase.lock().expect("phase lock poisoned")
    }

    /// Establish a push subscription for `user_id`.
    ///
    /// Runs the full pipeline and returns the persisted record. Each
    /// failure carries the step it happened in; `PermissionDenied` and
    /// `UnsupportedEnvironment` are expected outcomes callers should
    /// degrade on, not report as errors.
    ///
    /// On `BackendSyncFailed` the push channel is already live
    /// client-side but unknown to the backend. It is kept live: the
    /// platform subscribe call is idempotent, so re-running the
    /// pipeline reuses the channel and re-attempts only the sync.
    pub async fn subscribe_to_push(
        &self,
        user_id: UserId,
    ) -> Result<SubscriptionRecord, PushError> {
        let _guard = self.in_flight.lock().await;

        let caps = self.probe.probe();
        if !caps.is_supported() {
            tracing::warn!(?caps, "Push subscription unavailable in this environment");
            return Err(self.fail(PushError::UnsupportedEnvironment));
        }

        self.set_phase(SubscriptionPhase::Registering);
        let registration = match self.registrar.register().await {
            Ok(registration) => registration,
            Err(e) => return Err(self.fail(e)),
        };

        self.set_phase(SubscriptionPhase::AwaitingPermission);
        let permission = match self.gate.request_permission().await {
            Ok(permission) => permission,
            Err(e) => return Err(self.fail(e)),
        };
        if permission != PermissionState::Granted {
            tracing::info!(user_id, ?permission, "Push notification permission not granted");
            return Err(self.fail(PushError::PermissionDenied(permission)));
        }

        self.set_phase(SubscriptionPhase::FetchingKey);
        let raw_key = match self.backend.vapid_public_key().await {
            Ok(key) => key,
            Err(e) => return Err(self.fail(e)),
        };
        let server_key = match keys::decode_vapid_key(&raw_key) {
            Ok(bytes) => bytes,
            Err(e) => return Err(self.fail(PushError::KeyFetchFailed(e.to_string()))),
        };

        self.set_phase(SubscriptionPhase::Subscribing);
        let options = SubscribeOptions {
            user_visible_only: true,
            application_server_key: server_key,
        };
        let channel = match self.push.subscribe(&registration, options).await {
            Ok(channel) => channel,
            Err(e) => return Err(self.fail(e)),
        };

        let record = SubscriptionRecord::from_channel(&channel);

        self.set_phase(SubscriptionPhase::Syncing);
        if let Err(e) = self.backend.save_subscription(user_id, &record).await {
            tracing::warn!(
                user_id,
                endpoint = %record.endpoint,
                error = %e,
                "Push channel created but backend sync failed; channel kept live for retry",
            );
            return Err(self.fail(e));
        }

        self.set_phase(SubscriptionPhase::Active);
        tracing::info!(user_id, endpoint = %record.endpoint, "Push subscription active");
        Ok(record)
    }

    /// Tear down the push subscription for `user_id`.
    ///
    /// Returns `Ok(false)` when no channel exists (idempotent no-op, no
    /// backend call). The local revoke is authoritative: if backend
    /// removal fails afterwards the operation still reports success,
    /// since the device can no longer receive pushes and the dangling
    /// backend record fails at dispatch time.
    pub async fn unsubscribe(&self, user_id: UserId) -> Result<bool, PushError> {
        let _guard = self.in_flight.lock().await;

        let registration = match self.registrar.ready().await {
            Ok(registration) => registration,
            Err(e) => return Err(self.fail(e)),
        };
        let channel = match self.push.subscription(&registration).await {
            Ok(channel) => channel,
            Err(e) => return Err(self.fail(e)),
        };

        let Some(channel) = channel else {
            tracing::debug!(user_id, "No push channel to unsubscribe");
            return Ok(false);
        };

        self.set_phase(SubscriptionPhase::Unsubscribing);
        if let Err(e) = self.push.unsubscribe(&channel).await {
            return Err(self.fail(e));
        }

        if let Err(e) = self.backend.remove_subscription(user_id).await {
            tracing::warn!(
                user_id,
                error = %e,
                "Push channel revoked locally but backend removal failed",
            );
        }

        self.set_phase(SubscriptionPhase::Idle);
        tracing::info!(user_id, endpoint = %channel.endpoint, "Push subscription removed");
        Ok(true)
    }

    /// Whether a push channel currently exists client-side.
    ///
    /// Never consults the backend -- this reflects the platform's view
    /// only.
    pub async fn is_subscribed(&self) -> Result<bool, PushError> {
        let registration = self.registrar.ready().await?;
        let channel = self.push.subscription(&registration).await?;
        Ok(channel.is_some())
    }

    /// Display a locally generated notification for UI feedback.
    ///
    /// Bypasses the subscription pipeline entirely; a silent no-op when
    /// permission has not been granted.
    pub async fn test_notification(&self) -> Result<(), PushError> {
        if self.gate.permission() != PermissionState::Granted {
            tracing::debug!("Skipping test notification, permission not granted");
            return Ok(());
        }

        self.notifications
            .show_notification(
                TEST_NOTIFICATION_TITLE,
                TEST_NOTIFICATION_BODY,
                TEST_NOTIFICATION_ICON,
            )
            .await
    }

    // ---- private helpers ----

    fn set_phase(&self, next: SubscriptionPhase) {
        tracing::debug!(?next, "Subscription phase transition");
        *self.phase.lock().expect("phase lock poisoned") = next;
    }

    /// Park the state machine in `Failed` and hand the error back.
    fn fail(&self, err: PushError) -> PushError {
        self.set_phase(SubscriptionPhase::Failed(err.kind()));
        err
    }
}
