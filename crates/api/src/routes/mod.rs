pub mod health;
pub mod prompts;
pub mod qa_prompts;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /prompts                                            list public prompts
/// /prompts/{id}                                       get public prompt
///
/// /admin/prompts                                      list, create
/// /admin/prompts/{id}                                 get, update, delete
/// /admin/prompts/{id}/versions                        list, snapshot current
/// /admin/prompts/{id}/versions/{version_id}           get version
/// /admin/prompts/{id}/versions/{version_id}/restore   restore (POST)
///
/// /admin/qa-prompts                                   list, create
/// /admin/qa-prompts/active                            get active
/// /admin/qa-prompts/{id}                              get, update, delete
/// /admin/qa-prompts/{id}/activate                     activate (POST)
/// /admin/qa-prompts/{id}/history                      text history
/// ```
///
/// Every `/admin` handler takes the `AdminAuth` extractor.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/prompts", prompts::public_router())
        .nest("/admin/prompts", prompts::admin_router())
        .nest("/admin/qa-prompts", qa_prompts::router())
}
