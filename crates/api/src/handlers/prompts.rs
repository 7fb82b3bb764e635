//! Handlers for the prompt library: public browsing and admin CRUD.
//!
//! Edits are full replacements. With `save_version` the pre-edit state is
//! snapshotted into the version history in the same transaction as the
//! update.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use trolyphaply_core::error::CoreError;
use trolyphaply_core::prompt::{validate_version_note, Prompt, PromptDraft, PromptVersion};
use trolyphaply_core::revision::Revision;
use trolyphaply_core::types::DbId;

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::middleware::auth::AdminAuth;
use crate::query::PromptListParams;
use crate::response::{DataResponse, PageResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// API request / response types
// ---------------------------------------------------------------------------

/// Request body for `PUT /admin/prompts/{id}`.
#[derive(Debug, Deserialize)]
pub struct UpdatePromptRequest {
    #[serde(flatten)]
    pub fields: PromptDraft,
    /// Snapshot the pre-edit state before applying the edit.
    #[serde(default)]
    pub save_version: bool,
    pub version_note: Option<String>,
}

/// Result of an edit: the live prompt and, when snapshotted, the new version.
#[derive(Debug, Serialize)]
pub struct EditResult {
    pub prompt: Prompt,
    pub version: Option<PromptVersion>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load a prompt or fail with NotFound.
async fn ensure_prompt_exists(state: &AppState, id: DbId) -> AppResult<Prompt> {
    state
        .store
        .find_prompt(id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Prompt",
            id,
        }))
}

/// Validate an optional note, treating blank as absent.
pub(crate) fn clean_note(note: Option<String>) -> AppResult<Option<String>> {
    let note = note
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());
    if let Some(ref n) = note {
        validate_version_note(n)?;
    }
    Ok(note)
}

async fn list_page(state: &AppState, params: PromptListParams) -> AppResult<PageResponse<Prompt>> {
    let filter = params.into_filter()?;
    let prompts = state.store.list_prompts(&filter).await?;
    let total = state.store.count_prompts(&filter).await?;

    tracing::debug!(count = prompts.len(), total, "Listed prompts");

    Ok(PageResponse {
        data: prompts,
        total,
        limit: filter.limit,
        offset: filter.offset,
    })
}

// ---------------------------------------------------------------------------
// GET /prompts
// ---------------------------------------------------------------------------

/// List public prompts with optional search, category and pagination.
pub async fn list_public(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<PromptListParams>,
) -> AppResult<impl IntoResponse> {
    let params = PromptListParams {
        public: Some(true),
        ..params
    };
    Ok(Json(list_page(&state, params).await?))
}

// ---------------------------------------------------------------------------
// GET /prompts/{id}
// ---------------------------------------------------------------------------

/// Get a public prompt. Private prompts are reported as not found.
pub async fn get_public(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let prompt = ensure_prompt_exists(&state, id).await?;
    if !prompt.content.is_public {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Prompt",
            id,
        }));
    }
    Ok(Json(DataResponse { data: prompt }))
}

// ---------------------------------------------------------------------------
// GET /admin/prompts
// ---------------------------------------------------------------------------

/// List all prompts, optionally filtered by visibility.
pub async fn list_prompts(
    State(state): State<AppState>,
    _admin: AdminAuth,
    AppQuery(params): AppQuery<PromptListParams>,
) -> AppResult<impl IntoResponse> {
    Ok(Json(list_page(&state, params).await?))
}

// ---------------------------------------------------------------------------
// POST /admin/prompts
// ---------------------------------------------------------------------------

/// Create a prompt. No version is recorded until the first snapshot.
pub async fn create_prompt(
    State(state): State<AppState>,
    _admin: AdminAuth,
    AppJson(body): AppJson<PromptDraft>,
) -> AppResult<impl IntoResponse> {
    let content = body.into_new_content()?;
    let prompt = state.store.create_prompt(&content).await?;

    tracing::info!(
        prompt_id = prompt.id,
        category = %prompt.content.category,
        "Prompt created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: prompt })))
}

// ---------------------------------------------------------------------------
// GET /admin/prompts/{id}
// ---------------------------------------------------------------------------

/// Get any prompt, public or private.
pub async fn get_prompt(
    State(state): State<AppState>,
    _admin: AdminAuth,
    AppPath(id): AppPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let prompt = ensure_prompt_exists(&state, id).await?;
    Ok(Json(DataResponse { data: prompt }))
}

// ---------------------------------------------------------------------------
// PUT /admin/prompts/{id}
// ---------------------------------------------------------------------------

/// Replace a prompt's fields, optionally snapshotting the pre-edit state.
pub async fn update_prompt(
    State(state): State<AppState>,
    _admin: AdminAuth,
    AppPath(id): AppPath<DbId>,
    AppJson(body): AppJson<UpdatePromptRequest>,
) -> AppResult<impl IntoResponse> {
    let content = body.fields.into_replacement()?;

    let result = if body.save_version {
        let note = clean_note(body.version_note)?;
        let outcome = state
            .store
            .commit_revision(
                id,
                &Revision::Snapshot {
                    apply: Some(content),
                    note,
                },
            )
            .await?;

        tracing::info!(
            prompt_id = id,
            version = outcome.version.version,
            version_id = outcome.version.id,
            "Prompt updated with snapshot"
        );

        EditResult {
            prompt: outcome.prompt,
            version: Some(outcome.version),
        }
    } else {
        let prompt = state
            .store
            .update_prompt(id, &content)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Prompt",
                id,
            }))?;

        tracing::info!(prompt_id = id, "Prompt updated");

        EditResult {
            prompt,
            version: None,
        }
    };

    Ok(Json(DataResponse { data: result }))
}

// ---------------------------------------------------------------------------
// DELETE /admin/prompts/{id}
// ---------------------------------------------------------------------------

/// Delete a prompt and its whole version history.
pub async fn delete_prompt(
    State(state): State<AppState>,
    _admin: AdminAuth,
    AppPath(id): AppPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let deleted = state.store.delete_prompt(id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Prompt",
            id,
        }));
    }

    tracing::info!(prompt_id = id, "Prompt deleted");

    Ok(StatusCode::NO_CONTENT)
}
