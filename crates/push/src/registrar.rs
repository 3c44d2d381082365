//! Background execution context registration.

use std::sync::Arc;

use jobping_core::ports::{Registration, ServiceWorkerPort};
use jobping_core::PushError;

/// Worker script served from the app's web root.
pub const SERVICE_WORKER_SCRIPT: &str = "/service-worker.js";

/// Registers the push-receiving worker script and awaits its readiness.
pub struct ServiceWorkerRegistrar {
    service_worker: Arc<dyn ServiceWorkerPort>,
    script_url: String,
}

impl ServiceWorkerRegistrar {
    /// Create a registrar for the default script path.
    pub fn new(service_worker: Arc<dyn ServiceWorkerPort>) -> Self {
        Self {
            service_worker,
            script_url: SERVICE_WORKER_SCRIPT.to_string(),
        }
    }

    /// Override the worker script URL.
    pub fn with_script_url(mut self, script_url: impl Into<String>) -> Self {
        self.script_url = script_url.into();
        self
    }

    /// URL of the worker script this registrar installs.
    pub fn script_url(&self) -> &str {
        &self.script_url
    }

    /// Register the worker script.
    ///
    /// Idempotent -- registering an already-registered script returns
    /// the existing registration. Resolves when the registration call
    /// resolves; the worker may not be active yet (callers needing an
    /// active worker await [`ready`](Self::ready) separately).
    pub async fn register(&self) -> Result<Registration, PushError> {
        if !self.service_worker.supported() {
            return Err(PushError::RegistrationFailed(
                "background execution contexts are not supported".to_string(),
            ));
        }

        let registration = self.service_worker.register(&self.script_url).await?;

        tracing::info!(
            script_url = %registration.script_url,
            scope = %registration.scope,
            "Service worker registered",
        );

        Ok(registration)
    }

    /// Resolve once an active registration exists.
    pub async fn ready(&self) -> Result<Registration, PushError> {
        self.service_worker.ready().await
    }
}
