//! Tests for `AppError` -> HTTP response mapping.
//!
//! Most call `IntoResponse` directly on `AppError` values. The extractor
//! tests at the end go through the router.

mod common;

use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use http_body_util::BodyExt;
use trolyphaply_api::error::AppError;
use trolyphaply_core::error::CoreError;
use trolyphaply_core::store::StoreError;

use common::{admin_get, admin_put, body_json, get};
use serde_json::json;

async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn not_found_error_returns_404() {
    let err = AppError::Core(CoreError::NotFound {
        entity: "Prompt",
        id: 42,
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Prompt with id 42 not found");
}

#[tokio::test]
async fn store_core_error_maps_like_core_error() {
    let err = AppError::Store(StoreError::not_found("PromptVersion", 7));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "PromptVersion with id 7 not found");
}

#[tokio::test]
async fn validation_error_returns_400() {
    let err = AppError::Core(CoreError::Validation("Title must not be empty".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "Title must not be empty");
}

#[tokio::test]
async fn conflict_error_returns_409() {
    let err = AppError::Store(StoreError::Core(CoreError::Conflict(
        "Cannot delete active prompt".into(),
    )));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "CONFLICT");
}

#[tokio::test]
async fn unauthorized_error_returns_401() {
    let err = AppError::Core(CoreError::Unauthorized("Invalid admin token".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn backend_error_returns_500_and_sanitizes_message() {
    let err = AppError::Store(StoreError::backend(std::io::Error::other(
        "connection to 10.0.0.5 refused",
    )));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");
}

#[tokio::test]
async fn backend_row_not_found_returns_404() {
    let err = AppError::Store(StoreError::backend(sqlx::Error::RowNotFound));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
}

#[tokio::test]
async fn bad_request_error_returns_400() {
    let err = AppError::BadRequest("Failed to parse the request body as JSON".into());

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");
}

// ---------------------------------------------------------------------------
// Extractor rejections
// ---------------------------------------------------------------------------

async fn assert_json_bad_request(response: axum::response::Response) {
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("application/json"), "got {content_type}");
    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn malformed_query_returns_json_400() {
    let app = common::build_test_app();
    assert_json_bad_request(get(app.clone(), "/api/v1/prompts?limit=abc").await).await;
    assert_json_bad_request(admin_get(app, "/api/v1/admin/prompts?offset=-x").await).await;
}

#[tokio::test]
async fn non_numeric_path_id_returns_json_400() {
    let app = common::build_test_app();
    assert_json_bad_request(get(app.clone(), "/api/v1/prompts/abc").await).await;
    assert_json_bad_request(admin_get(app.clone(), "/api/v1/admin/prompts/1/versions/xyz").await)
        .await;
    assert_json_bad_request(
        admin_put(
            app,
            "/api/v1/admin/qa-prompts/abc",
            json!({ "name": "A", "prompt_text": "B" }),
        )
        .await,
    )
    .await;
}
