//! Integration test harnesses for Cedars Subscriptions.
//!
//! Both binaries are exercised as in-process axum routers over the
//! in-memory document store, one request at a time via
//! `tower::ServiceExt::oneshot`.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p cedars-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;

use cedars_store::{DocumentStore, MemoryStore, collections};

/// A storefront router over a fresh in-memory store.
pub struct StorefrontHarness {
    pub app: Router,
    pub store: Arc<MemoryStore>,
    // keeps the preference file's directory alive for the test
    _prefs_dir: tempfile::TempDir,
}

/// Build the storefront app; seed the store before calling this so the
/// initial catalog snapshot holds the fixtures.
///
/// # Panics
///
/// Panics on harness setup failure; only call from tests.
pub async fn storefront_harness(store: Arc<MemoryStore>) -> StorefrontHarness {
    let prefs_dir = tempfile::tempdir().expect("temp dir");
    let config = cedars_storefront::config::StorefrontConfig {
        host: std::net::IpAddr::from([127, 0, 0, 1]),
        port: 0,
        order_contact: "96170000000".to_string(),
        prefs_path: prefs_dir.path().join("prefs.json"),
    };

    let catalog = cedars_storefront::catalog_feed::start(store.as_ref())
        .await
        .expect("catalog subscription");
    let prefs = cedars_storefront::prefs::FilePrefStore::open(&config.prefs_path);
    let state = cedars_storefront::state::AppState::new(
        config,
        Arc::clone(&store) as Arc<dyn DocumentStore>,
        catalog,
        prefs,
    );

    StorefrontHarness {
        app: cedars_storefront::routes::routes().with_state(state),
        store,
        _prefs_dir: prefs_dir,
    }
}

/// An admin router over a fresh in-memory store.
pub struct AdminHarness {
    pub app: Router,
    pub state: cedars_admin::state::AppState,
    pub store: Arc<MemoryStore>,
}

/// Build the admin app over its own in-memory store.
#[must_use]
pub fn admin_harness() -> AdminHarness {
    let store = Arc::new(MemoryStore::new());
    let config = cedars_admin::config::AdminConfig {
        host: std::net::IpAddr::from([127, 0, 0, 1]),
        port: 0,
    };
    let state = cedars_admin::state::AppState::new(
        config,
        Arc::clone(&store) as Arc<dyn DocumentStore>,
    );

    AdminHarness {
        app: cedars_admin::routes::routes().with_state(state.clone()),
        state,
        store,
    }
}

/// Seed one service document and return its store-assigned id.
///
/// # Panics
///
/// Panics on store failure; only call from tests.
pub async fn seed_service(store: &MemoryStore, fields: Value) -> String {
    store
        .create_document(collections::SERVICES, fields)
        .await
        .expect("seed service")
        .id
}

/// One-shot a request against a router clone.
///
/// # Panics
///
/// Panics if the service call itself fails; only call from tests.
pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.expect("infallible")
}

/// GET helper.
#[must_use]
pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

/// JSON-body request helper.
#[must_use]
pub fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

/// Attach a bearer token to a request builder-produced request.
#[must_use]
pub fn with_bearer(mut request: Request<Body>, token: &str) -> Request<Body> {
    let value = format!("Bearer {token}")
        .parse()
        .expect("header value");
    request.headers_mut().insert(header::AUTHORIZATION, value);
    request
}

/// Read a response body as JSON.
///
/// # Panics
///
/// Panics if the body is not valid JSON; only call from tests.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    serde_json::from_slice(&bytes).expect("json parse")
}

/// Read a response body as text.
///
/// # Panics
///
/// Panics if the body is not UTF-8; only call from tests.
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

/// Assert a status, with the body in the failure message.
///
/// # Panics
///
/// Panics when the status differs; only call from tests.
pub async fn expect_status(response: Response<Body>, expected: StatusCode) -> Response<Body> {
    let status = response.status();
    if status != expected {
        let body = body_text(response).await;
        panic!("expected {expected}, got {status}: {body}");
    }
    response
}
