#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use trolyphaply_api::config::ServerConfig;
use trolyphaply_api::router::build_app_router;
use trolyphaply_api::state::AppState;
use trolyphaply_core::memory::MemoryStore;

pub const ADMIN_TOKEN: &str = "test-admin-token";

/// Build a test `ServerConfig` with safe defaults and a known admin token.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        admin_token: Some(ADMIN_TOKEN.to_string()),
    }
}

/// Build the full application router over the given store.
pub fn build_app_with(store: Arc<MemoryStore>, config: ServerConfig) -> Router {
    build_app_router(AppState::new(store, config))
}

/// Build the full application router over a fresh in-memory store.
pub fn build_test_app() -> Router {
    build_app_with(Arc::new(MemoryStore::new()), test_config())
}

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
    token: Option<&str>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

/// Unauthenticated GET.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

/// Admin GET.
pub async fn admin_get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, Some(ADMIN_TOKEN)).await
}

/// Admin POST with a JSON body.
pub async fn admin_post(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body), Some(ADMIN_TOKEN)).await
}

/// Admin POST without a body.
pub async fn admin_post_empty(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(ADMIN_TOKEN)).await
}

/// Admin PUT with a JSON body.
pub async fn admin_put(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::PUT, uri, Some(body), Some(ADMIN_TOKEN)).await
}

/// Admin DELETE.
pub async fn admin_delete(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, None, Some(ADMIN_TOKEN)).await
}

/// Request with an explicit (possibly wrong) token.
pub async fn request_with_token(
    app: Router,
    method: Method,
    uri: &str,
    token: &str,
) -> Response<Body> {
    send(app, method, uri, None, Some(token)).await
}

/// Send a raw body with a JSON content type.
pub async fn admin_send_raw(
    app: Router,
    method: Method,
    uri: &str,
    raw: &'static str,
) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {ADMIN_TOKEN}"))
        .header("content-type", "application/json")
        .body(Body::from(raw))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
