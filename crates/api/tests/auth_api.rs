//! Admin routes require `Authorization: Bearer <ADMIN_TOKEN>`.

mod common;

use std::sync::Arc;

use axum::http::{Method, StatusCode};
use common::{body_json, get, request_with_token};
use trolyphaply_core::memory::MemoryStore;

#[tokio::test]
async fn missing_token_is_unauthorized() {
    let app = common::build_test_app();
    let response = get(app, "/api/v1/admin/prompts").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
    assert_eq!(json["error"], "Missing Authorization header");
}

#[tokio::test]
async fn wrong_token_is_unauthorized() {
    let app = common::build_test_app();
    let response =
        request_with_token(app, Method::GET, "/api/v1/admin/qa-prompts", "not-the-token").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Invalid admin token");
}

#[tokio::test]
async fn unconfigured_token_rejects_everything() {
    let mut config = common::test_config();
    config.admin_token = None;
    let app = common::build_app_with(Arc::new(MemoryStore::new()), config);

    let response = request_with_token(
        app,
        Method::DELETE,
        "/api/v1/admin/prompts/1",
        common::ADMIN_TOKEN,
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn public_routes_need_no_token() {
    let app = common::build_test_app();
    let response = get(app, "/api/v1/prompts").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn valid_token_is_accepted() {
    let app = common::build_test_app();
    let response = request_with_token(
        app,
        Method::GET,
        "/api/v1/admin/prompts",
        common::ADMIN_TOKEN,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}
