//! Route definitions for Q&A prompts -- mounted at `/admin/qa-prompts`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::qa_prompts;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(qa_prompts::list_qa_prompts).post(qa_prompts::create_qa_prompt),
        )
        .route("/active", get(qa_prompts::get_active_qa_prompt))
        .route(
            "/{id}",
            get(qa_prompts::get_qa_prompt)
                .put(qa_prompts::update_qa_prompt)
                .delete(qa_prompts::delete_qa_prompt),
        )
        .route("/{id}/activate", post(qa_prompts::activate_qa_prompt))
        .route("/{id}/history", get(qa_prompts::list_qa_prompt_history))
}
