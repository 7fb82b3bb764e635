//! Route definitions for the prompt library and its version history.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{prompt_versions, prompts};
use crate::state::AppState;

/// Public routes -- mounted at `/prompts`.
pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/", get(prompts::list_public))
        .route("/{id}", get(prompts::get_public))
}

/// Admin routes -- mounted at `/admin/prompts`.
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/", get(prompts::list_prompts).post(prompts::create_prompt))
        .route(
            "/{id}",
            get(prompts::get_prompt)
                .put(prompts::update_prompt)
                .delete(prompts::delete_prompt),
        )
        .route(
            "/{id}/versions",
            get(prompt_versions::list_versions).post(prompt_versions::snapshot_current),
        )
        .route(
            "/{id}/versions/{version_id}",
            get(prompt_versions::get_version),
        )
        .route(
            "/{id}/versions/{version_id}/restore",
            post(prompt_versions::restore_version),
        )
}
