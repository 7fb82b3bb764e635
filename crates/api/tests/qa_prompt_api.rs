//! Integration tests for Q&A prompts: single active prompt, history, delete.

mod common;

use axum::http::StatusCode;
use axum::Router;
use common::{admin_delete, admin_get, admin_post, admin_post_empty, admin_put, body_json};
use serde_json::{json, Value};

async fn create(app: &Router, name: &str, active: bool) -> i64 {
    let response = admin_post(
        app.clone(),
        "/api/v1/admin/qa-prompts",
        json!({
            "name": name,
            "prompt_text": format!("Bạn là trợ lý {name}."),
            "is_active": active,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

async fn list(app: &Router) -> Vec<Value> {
    let json = body_json(admin_get(app.clone(), "/api/v1/admin/qa-prompts").await).await;
    json["data"].as_array().unwrap().clone()
}

fn active_ids(prompts: &[Value]) -> Vec<i64> {
    prompts
        .iter()
        .filter(|p| p["is_active"] == true)
        .map(|p| p["id"].as_i64().unwrap())
        .collect()
}

#[tokio::test]
async fn at_most_one_active_prompt() {
    let app = common::build_test_app();
    let a = create(&app, "A", true).await;
    let b = create(&app, "B", true).await;
    let c = create(&app, "C", false).await;
    assert_eq!(active_ids(&list(&app).await), vec![b]);

    let response = admin_post_empty(app.clone(), &format!("/api/v1/admin/qa-prompts/{c}/activate")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["is_active"], true);
    assert_eq!(active_ids(&list(&app).await), vec![c]);

    let response = admin_put(
        app.clone(),
        &format!("/api/v1/admin/qa-prompts/{a}"),
        json!({ "name": "A", "prompt_text": "Bạn là trợ lý A.", "is_active": true }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(active_ids(&list(&app).await), vec![a]);

    let active = body_json(admin_get(app, "/api/v1/admin/qa-prompts/active").await).await;
    assert_eq!(active["data"]["id"], a);
}

#[tokio::test]
async fn active_is_null_when_none() {
    let app = common::build_test_app();
    create(&app, "A", false).await;

    let response = admin_get(app, "/api/v1/admin/qa-prompts/active").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_json(response).await["data"].is_null());
}

#[tokio::test]
async fn activate_missing_is_404_and_keeps_current() {
    let app = common::build_test_app();
    let a = create(&app, "A", true).await;

    let response = admin_post_empty(app.clone(), "/api/v1/admin/qa-prompts/999/activate").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(active_ids(&list(&app).await), vec![a]);
}

#[tokio::test]
async fn text_change_bumps_version_and_history() {
    let app = common::build_test_app();
    let id = create(&app, "A", false).await;
    let uri = format!("/api/v1/admin/qa-prompts/{id}");

    // Rename only: same version, no history row.
    let json = body_json(
        admin_put(
            app.clone(),
            &uri,
            json!({ "name": "A2", "prompt_text": "Bạn là trợ lý A." }),
        )
        .await,
    )
    .await;
    assert_eq!(json["data"]["version"], 1);
    assert_eq!(json["data"]["name"], "A2");

    let json = body_json(
        admin_put(
            app.clone(),
            &uri,
            json!({
                "name": "A2",
                "prompt_text": "Bạn là luật sư đất đai.",
                "change_note": "thu hẹp phạm vi",
            }),
        )
        .await,
    )
    .await;
    assert_eq!(json["data"]["version"], 2);

    let history = body_json(admin_get(app, &format!("{uri}/history")).await).await;
    let rows = history["data"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["version"], 2);
    assert_eq!(rows[0]["change_description"], "thu hẹp phạm vi");
    assert_eq!(rows[0]["prompt_text"], "Bạn là luật sư đất đai.");
    assert_eq!(rows[1]["version"], 1);
    assert_eq!(rows[1]["change_description"], "Initial version");
    assert_eq!(rows[1]["changed_by"], "admin");
}

#[tokio::test]
async fn cannot_delete_active_prompt() {
    let app = common::build_test_app();
    let active = create(&app, "A", true).await;
    let idle = create(&app, "B", false).await;

    let response = admin_delete(app.clone(), &format!("/api/v1/admin/qa-prompts/{active}")).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "CONFLICT");
    assert_eq!(json["error"], "Cannot delete active prompt");

    let response = admin_delete(app.clone(), &format!("/api/v1/admin/qa-prompts/{idle}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = admin_get(app.clone(), &format!("/api/v1/admin/qa-prompts/{idle}/history")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = admin_delete(app, &format!("/api/v1/admin/qa-prompts/{idle}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_requires_name_and_text() {
    let app = common::build_test_app();
    let response = admin_post(app, "/api/v1/admin/qa-prompts", json!({ "name": "A" })).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "Name and prompt_text are required");
}

#[tokio::test]
async fn update_without_active_flag_keeps_it() {
    let app = common::build_test_app();
    let a = create(&app, "A", true).await;

    let response = admin_put(
        app.clone(),
        &format!("/api/v1/admin/qa-prompts/{a}"),
        json!({ "name": "A2", "prompt_text": "Bạn là trợ lý A." }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["is_active"], true);

    let active = body_json(admin_get(app.clone(), "/api/v1/admin/qa-prompts/active").await).await;
    assert_eq!(active["data"]["id"], a);

    // An explicit false still deactivates.
    let response = admin_put(
        app.clone(),
        &format!("/api/v1/admin/qa-prompts/{a}"),
        json!({ "name": "A2", "prompt_text": "Bạn là trợ lý A.", "is_active": false }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(active_ids(&list(&app).await).is_empty());
}

#[tokio::test]
async fn update_rejects_overlong_change_note() {
    let app = common::build_test_app();
    let id = create(&app, "A", false).await;

    let response = admin_put(
        app.clone(),
        &format!("/api/v1/admin/qa-prompts/{id}"),
        json!({
            "name": "A",
            "prompt_text": "Bạn là luật sư.",
            "change_note": "n".repeat(1_001),
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    let json = body_json(admin_get(app, &format!("/api/v1/admin/qa-prompts/{id}")).await).await;
    assert_eq!(json["data"]["version"], 1);
}
