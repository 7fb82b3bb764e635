//! Handlers for a prompt's version history: list, snapshot, inspect, restore.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use trolyphaply_core::error::CoreError;
use trolyphaply_core::revision::Revision;
use trolyphaply_core::types::DbId;

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath};
use crate::handlers::prompts::clean_note;
use crate::middleware::auth::AdminAuth;
use crate::response::DataResponse;
use crate::state::AppState;

/// Optional note for snapshot and restore requests.
#[derive(Debug, Default, Deserialize)]
pub struct VersionNoteRequest {
    pub note: Option<String>,
}

// ---------------------------------------------------------------------------
// GET /admin/prompts/{id}/versions
// ---------------------------------------------------------------------------

/// List a prompt's versions, highest version first.
pub async fn list_versions(
    State(state): State<AppState>,
    _admin: AdminAuth,
    AppPath(prompt_id): AppPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let versions = state.store.list_versions(prompt_id).await?;

    tracing::debug!(count = versions.len(), prompt_id, "Listed prompt versions");

    Ok(Json(DataResponse { data: versions }))
}

// ---------------------------------------------------------------------------
// POST /admin/prompts/{id}/versions
// ---------------------------------------------------------------------------

/// Record the current live state as a new version without changing it.
pub async fn snapshot_current(
    State(state): State<AppState>,
    _admin: AdminAuth,
    AppPath(prompt_id): AppPath<DbId>,
    body: Option<AppJson<VersionNoteRequest>>,
) -> AppResult<impl IntoResponse> {
    let AppJson(body) = body.unwrap_or_default();
    let note = clean_note(body.note)?;

    let outcome = state
        .store
        .commit_revision(prompt_id, &Revision::Snapshot { apply: None, note })
        .await?;

    tracing::info!(
        prompt_id,
        version = outcome.version.version,
        version_id = outcome.version.id,
        "Prompt version saved"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: outcome.version })))
}

// ---------------------------------------------------------------------------
// GET /admin/prompts/{id}/versions/{version_id}
// ---------------------------------------------------------------------------

/// Get one version of a prompt.
pub async fn get_version(
    State(state): State<AppState>,
    _admin: AdminAuth,
    AppPath((prompt_id, version_id)): AppPath<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    let version = state
        .store
        .find_version(prompt_id, version_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "PromptVersion",
            id: version_id,
        }))?;
    Ok(Json(DataResponse { data: version }))
}

// ---------------------------------------------------------------------------
// POST /admin/prompts/{id}/versions/{version_id}/restore
// ---------------------------------------------------------------------------

/// Restore a past version: copy it into a new, higher version and make its
/// content live.
pub async fn restore_version(
    State(state): State<AppState>,
    _admin: AdminAuth,
    AppPath((prompt_id, version_id)): AppPath<(DbId, DbId)>,
    body: Option<AppJson<VersionNoteRequest>>,
) -> AppResult<impl IntoResponse> {
    let AppJson(body) = body.unwrap_or_default();
    let note = clean_note(body.note)?;

    let outcome = state
        .store
        .commit_revision(prompt_id, &Revision::Restore { version_id, note })
        .await?;

    tracing::info!(
        prompt_id,
        from_version_id = version_id,
        new_version = outcome.version.version,
        "Prompt version restored"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: outcome })))
}
