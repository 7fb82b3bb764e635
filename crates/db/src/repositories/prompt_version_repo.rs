//! Repository for the `prompt_versions` table.
//!
//! Versions are immutable snapshots: there is no update method, and rows only
//! disappear through the cascade when their prompt is deleted.

use sqlx::PgExecutor;
use trolyphaply_core::revision::NewVersion;
use trolyphaply_core::types::DbId;

use crate::models::prompt_version::PromptVersionRow;

/// Column list for prompt_versions queries.
const COLUMNS: &str = "id, prompt_id, version, title, body, category, tags, is_public, \
    created_by, created_at";

/// Provides read and create operations for prompt versions.
pub struct PromptVersionRepo;

impl PromptVersionRepo {
    /// Insert a planned snapshot. The version number was computed under the
    /// prompt row lock; `uq_prompt_versions_prompt_id_version` rejects any
    /// duplicate that slips past it.
    pub async fn create<'e, E: PgExecutor<'e>>(
        executor: E,
        input: &NewVersion,
    ) -> Result<PromptVersionRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO prompt_versions
                (prompt_id, version, title, body, category, tags, is_public, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PromptVersionRow>(&query)
            .bind(input.prompt_id)
            .bind(input.version)
            .bind(&input.content.title)
            .bind(&input.content.body)
            .bind(input.content.category.as_str())
            .bind(&input.content.tags)
            .bind(input.content.is_public)
            .bind(&input.created_by)
            .fetch_one(executor)
            .await
    }

    /// Find a version by its primary key, regardless of owner.
    pub async fn find_by_id<'e, E: PgExecutor<'e>>(
        executor: E,
        id: DbId,
    ) -> Result<Option<PromptVersionRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM prompt_versions WHERE id = $1");
        sqlx::query_as::<_, PromptVersionRow>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Find a version only if it belongs to the given prompt.
    pub async fn find_for_prompt<'e, E: PgExecutor<'e>>(
        executor: E,
        prompt_id: DbId,
        id: DbId,
    ) -> Result<Option<PromptVersionRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM prompt_versions WHERE id = $1 AND prompt_id = $2"
        );
        sqlx::query_as::<_, PromptVersionRow>(&query)
            .bind(id)
            .bind(prompt_id)
            .fetch_optional(executor)
            .await
    }

    /// List all versions of a prompt, highest version first.
    pub async fn list_for_prompt<'e, E: PgExecutor<'e>>(
        executor: E,
        prompt_id: DbId,
    ) -> Result<Vec<PromptVersionRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM prompt_versions
             WHERE prompt_id = $1
             ORDER BY version DESC"
        );
        sqlx::query_as::<_, PromptVersionRow>(&query)
            .bind(prompt_id)
            .fetch_all(executor)
            .await
    }

    /// Highest version number recorded for a prompt, `None` if it has none.
    pub async fn max_version<'e, E: PgExecutor<'e>>(
        executor: E,
        prompt_id: DbId,
    ) -> Result<Option<i32>, sqlx::Error> {
        let row: (Option<i32>,) =
            sqlx::query_as("SELECT MAX(version) FROM prompt_versions WHERE prompt_id = $1")
                .bind(prompt_id)
                .fetch_one(executor)
                .await?;
        Ok(row.0)
    }
}
