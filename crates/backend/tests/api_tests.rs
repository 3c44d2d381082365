//! HTTP-level tests for the push API client, against a mock backend.
//!
//! Verifies endpoint paths, auth header placement, wire formats, and
//! the retry policy on the persistence calls.

use assert_matches::assert_matches;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use jobping_backend::{BackendApi, BackendApiError, BackendConfig};
use jobping_core::ports::BackendPort;
use jobping_core::{PushError, SubscriptionKeys, SubscriptionRecord};

const VAPID_KEY: &str =
    "BEl62iUYgUivxIkv69yViEuiBIa-Ib9-SkvMeAtA3LFgDzkrxZJjSgSnfckjBJuBkr3qBUYIHBQFLXYp5Nksh8U";

fn api_for(server: &MockServer) -> BackendApi {
    BackendApi::new(&BackendConfig::new(server.uri()).with_bearer_token("tok123"))
}

fn test_record() -> SubscriptionRecord {
    SubscriptionRecord {
        endpoint: "https://push.example/abc123".to_string(),
        keys: SubscriptionKeys {
            p256dh: "AQIDBAUGBwg=".to_string(),
            auth: "++++".to_string(),
        },
    }
}

// ---------------------------------------------------------------------------
// VAPID key fetch
// ---------------------------------------------------------------------------

/// The key endpoint is hit with a plain unauthenticated GET and the
/// `publicKey` field is extracted.
#[tokio::test]
async fn get_vapid_public_key_returns_key_without_auth() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/push/vapid-public-key"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "publicKey": VAPID_KEY })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let key = api_for(&server).get_vapid_public_key().await.unwrap();
    assert_eq!(key, VAPID_KEY);

    let requests = server.received_requests().await.unwrap();
    assert!(
        !requests[0].headers.contains_key("authorization"),
        "key fetch must not carry the bearer credential"
    );
}

/// Non-success status fails fast -- exactly one request, no retry.
#[tokio::test]
async fn get_vapid_public_key_fails_fast_on_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/push/vapid-public-key"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;

    let err = api_for(&server).get_vapid_public_key().await.unwrap_err();
    assert_matches!(err, BackendApiError::Status { status: 500, .. });
}

/// A 2xx response with a malformed body is still a failure.
#[tokio::test]
async fn get_vapid_public_key_rejects_malformed_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/push/vapid-public-key"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = api_for(&server).get_vapid_public_key().await.unwrap_err();
    assert_matches!(err, BackendApiError::Request(_));
}

// ---------------------------------------------------------------------------
// Persistence calls
// ---------------------------------------------------------------------------

/// The record travels as the JSON body with the bearer credential.
#[tokio::test]
async fn save_subscription_posts_record_with_bearer() {
    let server = MockServer::start().await;
    let record = test_record();

    Mock::given(method("POST"))
        .and(path("/api/push/subscribe"))
        .and(header("authorization", "Bearer tok123"))
        .and(body_json(&record))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    api_for(&server).save_subscription(42, &record).await.unwrap();
}

/// A transient 5xx is retried with backoff until the backend recovers.
#[tokio::test]
async fn save_subscription_retries_transient_failures() {
    let server = MockServer::start().await;
    let record = test_record();

    Mock::given(method("POST"))
        .and(path("/api/push/subscribe"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/push/subscribe"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    api_for(&server).save_subscription(42, &record).await.unwrap();
}

/// Client errors are terminal -- exactly one request, no retry.
#[tokio::test]
async fn save_subscription_fails_fast_on_client_error() {
    let server = MockServer::start().await;
    let record = test_record();

    Mock::given(method("POST"))
        .and(path("/api/push/subscribe"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let err = api_for(&server)
        .save_subscription(42, &record)
        .await
        .unwrap_err();
    assert_matches!(err, BackendApiError::Status { status: 401, .. });
}

/// Unsubscribe is an authenticated POST with an empty body.
#[tokio::test]
async fn remove_subscription_posts_empty_body_with_bearer() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/push/unsubscribe"))
        .and(header("authorization", "Bearer tok123"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    api_for(&server).remove_subscription(42).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].body.is_empty());
}

// ---------------------------------------------------------------------------
// Port mapping
// ---------------------------------------------------------------------------

/// Through the `BackendPort` trait the transport errors carry the
/// pipeline's failure taxonomy.
#[tokio::test]
async fn backend_port_maps_status_errors_onto_taxonomy() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/push/vapid-public-key"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let api = api_for(&server);
    let err = BackendPort::vapid_public_key(&api).await.unwrap_err();
    assert_matches!(err, PushError::KeyFetchFailed(_));
}
