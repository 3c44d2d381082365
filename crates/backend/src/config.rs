/// Client configuration for the notification backend.
///
/// All fields have defaults suitable for local development. In
/// production, override via environment variables. The bearer token is
/// injected here by the embedding application; this crate never reads
/// ambient credential storage.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Base URL of the backend, without a trailing slash
    /// (default: `http://localhost:8000`).
    pub base_url: String,
    /// Bearer credential for the persistence endpoints. The VAPID key
    /// endpoint is unauthenticated.
    pub bearer_token: Option<String>,
    /// Per-request HTTP timeout in seconds (default: `10`).
    pub request_timeout_secs: u64,
}

impl BackendConfig {
    /// Create a config for the given base URL with default timeout and
    /// no credential.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            bearer_token: None,
            request_timeout_secs: 10,
        }
    }

    /// Attach a bearer credential for the persistence endpoints.
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                 |
    /// |-------------------------|-------------------------|
    /// | `PUSH_API_BASE_URL`     | `http://localhost:8000` |
    /// | `PUSH_API_TOKEN`        | (none)                  |
    /// | `PUSH_API_TIMEOUT_SECS` | `10`                    |
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("PUSH_API_BASE_URL").unwrap_or_else(|_| "http://localhost:8000".into());

        let bearer_token = std::env::var("PUSH_API_TOKEN").ok().filter(|t| !t.is_empty());

        let request_timeout_secs: u64 = std::env::var("PUSH_API_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(10);

        Self {
            base_url,
            bearer_token,
            request_timeout_secs,
        }
    }
}
