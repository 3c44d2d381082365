//! REST client for the backend's push endpoints.
//!
//! Wraps the three-endpoint push API (VAPID key retrieval, subscription
//! persistence, subscription deletion) using [`reqwest`]. The key fetch
//! fails fast; the persistence calls are retried with exponential
//! backoff before giving up.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use jobping_core::ports::BackendPort;
use jobping_core::{PushError, SubscriptionRecord, UserId};

use crate::config::BackendConfig;

/// Path of the unauthenticated VAPID public key endpoint.
const VAPID_KEY_PATH: &str = "/api/push/vapid-public-key";

/// Path of the subscription persistence endpoint.
const SUBSCRIBE_PATH: &str = "/api/push/subscribe";

/// Path of the subscription deletion endpoint.
const UNSUBSCRIBE_PATH: &str = "/api/push/unsubscribe";

/// Retry delays in seconds for the persistence calls (exponential
/// backoff: 1s, 2s, 4s).
const RETRY_DELAYS_SECS: [u64; 3] = [1, 2, 4];

/// Response returned by the VAPID key endpoint.
#[derive(Debug, Deserialize)]
struct VapidKeyResponse {
    #[serde(rename = "publicKey")]
    public_key: String,
}

/// Errors from the push API layer.
#[derive(Debug, thiserror::Error)]
pub enum BackendApiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout) or
    /// the body could not be parsed.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend returned a non-2xx status code.
    #[error("Push API error ({status}): {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}

impl BackendApiError {
    /// Whether another attempt could plausibly succeed. Client errors
    /// (4xx) are terminal; transport failures and 5xx are not.
    fn is_retryable(&self) -> bool {
        match self {
            BackendApiError::Request(_) => true,
            BackendApiError::Status { status, .. } => *status >= 500,
        }
    }
}

/// HTTP client for the notification backend's push API.
pub struct BackendApi {
    client: reqwest::Client,
    base_url: String,
    bearer_token: Option<String>,
}

impl BackendApi {
    /// Create a new API client from configuration.
    pub fn new(config: &BackendConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .expect("Failed to build reqwest HTTP client");

        Self {
            client,
            base_url: config.base_url.clone(),
            bearer_token: config.bearer_token.clone(),
        }
    }

    /// Create an API client reusing an existing [`reqwest::Client`]
    /// (useful for connection pooling with other backend calls).
    pub fn with_client(client: reqwest::Client, config: &BackendConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.clone(),
            bearer_token: config.bearer_token.clone(),
        }
    }

    /// Fetch the server's VAPID public key.
    ///
    /// Sends an unauthenticated `GET` and parses the `publicKey` field.
    /// Not retried -- the subscribe pipeline fails fast here.
    pub async fn get_vapid_public_key(&self) -> Result<String, BackendApiError> {
        let response = self
            .client
            .get(format!("{}{}", self.base_url, VAPID_KEY_PATH))
            .send()
            .await?;

        let parsed: VapidKeyResponse = Self::parse_response(response).await?;
        Ok(parsed.public_key)
    }

    /// Persist a subscription record for the authenticated account.
    ///
    /// Sends `POST /api/push/subscribe` with the record as the JSON
    /// body, retrying transient failures with backoff.
    pub async fn save_subscription(
        &self,
        user_id: UserId,
        record: &SubscriptionRecord,
    ) -> Result<(), BackendApiError> {
        let url = format!("{}{}", self.base_url, SUBSCRIBE_PATH);
        let body = serde_json::to_value(record).expect("SubscriptionRecord is always serialisable");

        tracing::debug!(user_id, endpoint = %record.endpoint, "Saving push subscription");
        self.post_with_retry(&url, Some(&body)).await
    }

    /// Delete the stored subscription for the authenticated account.
    ///
    /// Sends `POST /api/push/unsubscribe` with an empty body, retrying
    /// transient failures with backoff.
    pub async fn remove_subscription(&self, user_id: UserId) -> Result<(), BackendApiError> {
        let url = format!("{}{}", self.base_url, UNSUBSCRIBE_PATH);

        tracing::debug!(user_id, "Removing push subscription");
        self.post_with_retry(&url, None).await
    }

    // ---- private helpers ----

    /// POST to a persistence endpoint with retry.
    ///
    /// Retries up to 3 times with exponential backoff while the failure
    /// is retryable (transport errors and 5xx). Returns `Ok(())` on the
    /// first successful attempt.
    async fn post_with_retry(
        &self,
        url: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<(), BackendApiError> {
        let mut last_err: Option<BackendApiError> = None;

        for (attempt, delay_secs) in RETRY_DELAYS_SECS.iter().enumerate() {
            match self.try_post(url, body).await {
                Ok(()) => return Ok(()),
                Err(e) if !e.is_retryable() => return Err(e),
                Err(e) => {
                    tracing::warn!(
                        attempt = attempt + 1,
                        url,
                        error = %e,
                        "Push API call failed, retrying"
                    );
                    last_err = Some(e);
                    tokio::time::sleep(Duration::from_secs(*delay_secs)).await;
                }
            }
        }

        // Final attempt after the last backoff.
        match self.try_post(url, body).await {
            Ok(()) => Ok(()),
            Err(e) => {
                tracing::error!(url, error = %e, "Push API call failed after all retries");
                Err(last_err.unwrap_or(e))
            }
        }
    }

    /// Execute a single authenticated POST and check the status.
    async fn try_post(
        &self,
        url: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<(), BackendApiError> {
        let mut request = self.client.post(url);

        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        Self::check_status(response).await
    }

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or a [`BackendApiError::Status`]
    /// containing the status and body text on failure.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, BackendApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(BackendApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, BackendApiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }

    /// Assert the response has a success status code, discarding the body.
    async fn check_status(response: reqwest::Response) -> Result<(), BackendApiError> {
        Self::ensure_success(response).await?;
        Ok(())
    }
}

#[async_trait]
impl BackendPort for BackendApi {
    async fn vapid_public_key(&self) -> Result<String, PushError> {
        self.get_vapid_public_key()
            .await
            .map_err(|e| PushError::KeyFetchFailed(e.to_string()))
    }

    async fn save_subscription(
        &self,
        user_id: UserId,
        record: &SubscriptionRecord,
    ) -> Result<(), PushError> {
        BackendApi::save_subscription(self, user_id, record)
            .await
            .map_err(|e| PushError::BackendSyncFailed(e.to_string()))
    }

    async fn remove_subscription(&self, user_id: UserId) -> Result<(), PushError> {
        BackendApi::remove_subscription(self, user_id)
            .await
            .map_err(|e| PushError::BackendSyncFailed(e.to_string()))
    }
}
