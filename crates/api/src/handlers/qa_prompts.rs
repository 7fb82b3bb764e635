//! Handlers for Q&A system prompts.
//!
//! At most one Q&A prompt is active. Creating or updating a prompt with
//! `is_active: true`, or calling the activate endpoint, deactivates every
//! other prompt in the same transaction. An update that leaves out
//! `is_active` keeps the stored flag.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use trolyphaply_core::error::CoreError;
use trolyphaply_core::qa_prompt::QaPromptDraft;
use trolyphaply_core::types::DbId;

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath};
use crate::middleware::auth::AdminAuth;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /admin/qa-prompts
pub async fn list_qa_prompts(
    State(state): State<AppState>,
    _admin: AdminAuth,
) -> AppResult<impl IntoResponse> {
    let prompts = state.store.list_qa_prompts().await?;
    tracing::debug!(count = prompts.len(), "Listed Q&A prompts");
    Ok(Json(DataResponse { data: prompts }))
}

/// GET /admin/qa-prompts/active -- `data` is `null` when none is active.
pub async fn get_active_qa_prompt(
    State(state): State<AppState>,
    _admin: AdminAuth,
) -> AppResult<impl IntoResponse> {
    let prompt = state.store.find_active_qa_prompt().await?;
    Ok(Json(DataResponse { data: prompt }))
}

/// GET /admin/qa-prompts/{id}
pub async fn get_qa_prompt(
    State(state): State<AppState>,
    _admin: AdminAuth,
    AppPath(id): AppPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let prompt = state
        .store
        .find_qa_prompt(id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "QaPrompt",
            id,
        }))?;
    Ok(Json(DataResponse { data: prompt }))
}

/// POST /admin/qa-prompts
pub async fn create_qa_prompt(
    State(state): State<AppState>,
    _admin: AdminAuth,
    AppJson(body): AppJson<QaPromptDraft>,
) -> AppResult<impl IntoResponse> {
    let content = body.into_content()?;
    let prompt = state.store.create_qa_prompt(&content).await?;

    tracing::info!(
        qa_prompt_id = prompt.id,
        active = prompt.is_active,
        "Q&A prompt created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: prompt })))
}

/// PUT /admin/qa-prompts/{id}
pub async fn update_qa_prompt(
    State(state): State<AppState>,
    _admin: AdminAuth,
    AppPath(id): AppPath<DbId>,
    AppJson(body): AppJson<QaPromptDraft>,
) -> AppResult<impl IntoResponse> {
    let change_note = body.validated_change_note()?;
    let content = body.into_content()?;

    let prompt = state
        .store
        .update_qa_prompt(id, &content, change_note.as_deref())
        .await?;

    tracing::info!(
        qa_prompt_id = id,
        version = prompt.version,
        active = prompt.is_active,
        "Q&A prompt updated"
    );

    Ok(Json(DataResponse { data: prompt }))
}

/// POST /admin/qa-prompts/{id}/activate
pub async fn activate_qa_prompt(
    State(state): State<AppState>,
    _admin: AdminAuth,
    AppPath(id): AppPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let prompt = state.store.activate_qa_prompt(id).await?;
    tracing::info!(qa_prompt_id = id, "Q&A prompt activated");
    Ok(Json(DataResponse { data: prompt }))
}

/// DELETE /admin/qa-prompts/{id} -- the active prompt cannot be deleted.
pub async fn delete_qa_prompt(
    State(state): State<AppState>,
    _admin: AdminAuth,
    AppPath(id): AppPath<DbId>,
) -> AppResult<impl IntoResponse> {
    state.store.delete_qa_prompt(id).await?;
    tracing::info!(qa_prompt_id = id, "Q&A prompt deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /admin/qa-prompts/{id}/history
pub async fn list_qa_prompt_history(
    State(state): State<AppState>,
    _admin: AdminAuth,
    AppPath(id): AppPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let history = state.store.list_qa_prompt_history(id).await?;
    tracing::debug!(count = history.len(), qa_prompt_id = id, "Listed Q&A prompt history");
    Ok(Json(DataResponse { data: history }))
}
