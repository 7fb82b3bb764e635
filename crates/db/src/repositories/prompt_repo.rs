//! Repository for the `prompts` table.

use sqlx::PgExecutor;
use trolyphaply_core::prompt::{PromptContent, PromptFilter};
use trolyphaply_core::search::like_pattern;
use trolyphaply_core::types::DbId;

use crate::models::prompt::PromptRow;

/// Column list for prompts queries.
const COLUMNS: &str = "id, title, body, category, tags, is_public, created_at, updated_at";

/// Shared WHERE clause for filtered listings and counts.
///
/// `$1` search pattern, `$2` category, `$3` visibility; NULL disables a filter.
const FILTER_CLAUSE: &str = "($1::text IS NULL OR title ILIKE $1 OR body ILIKE $1)
      AND ($2::text IS NULL OR category = $2)
      AND ($3::boolean IS NULL OR is_public = $3)";

/// Provides CRUD operations for live prompts.
pub struct PromptRepo;

impl PromptRepo {
    /// Insert a new prompt, returning the created row.
    pub async fn create<'e, E: PgExecutor<'e>>(
        executor: E,
        input: &PromptContent,
    ) -> Result<PromptRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO prompts (title, body, category, tags, is_public)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PromptRow>(&query)
            .bind(&input.title)
            .bind(&input.body)
            .bind(input.category.as_str())
            .bind(&input.tags)
            .bind(input.is_public)
            .fetch_one(executor)
            .await
    }

    /// Find a prompt by its primary key.
    pub async fn find_by_id<'e, E: PgExecutor<'e>>(
        executor: E,
        id: DbId,
    ) -> Result<Option<PromptRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM prompts WHERE id = $1");
        sqlx::query_as::<_, PromptRow>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Find a prompt and lock its row until the surrounding transaction ends.
    ///
    /// Revisions of the same prompt serialise on this lock, which keeps the
    /// `MAX(version) + 1` computation race-free.
    pub async fn find_for_update<'e, E: PgExecutor<'e>>(
        executor: E,
        id: DbId,
    ) -> Result<Option<PromptRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM prompts WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, PromptRow>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Whether a prompt exists.
    pub async fn exists<'e, E: PgExecutor<'e>>(executor: E, id: DbId) -> Result<bool, sqlx::Error> {
        let row: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM prompts WHERE id = $1)")
            .bind(id)
            .fetch_one(executor)
            .await?;
        Ok(row.0)
    }

    /// List prompts matching the filter, newest first.
    pub async fn list<'e, E: PgExecutor<'e>>(
        executor: E,
        filter: &PromptFilter,
    ) -> Result<Vec<PromptRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM prompts
             WHERE {FILTER_CLAUSE}
             ORDER BY created_at DESC, id DESC
             LIMIT $4 OFFSET $5"
        );
        sqlx::query_as::<_, PromptRow>(&query)
            .bind(filter.search.as_deref().map(like_pattern))
            .bind(filter.category.map(|c| c.as_str()))
            .bind(filter.is_public)
            .bind(filter.limit)
            .bind(filter.offset)
            .fetch_all(executor)
            .await
    }

    /// Count prompts matching the filter (pagination ignored).
    pub async fn count<'e, E: PgExecutor<'e>>(
        executor: E,
        filter: &PromptFilter,
    ) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM prompts WHERE {FILTER_CLAUSE}");
        let row: (i64,) = sqlx::query_as(&query)
            .bind(filter.search.as_deref().map(like_pattern))
            .bind(filter.category.map(|c| c.as_str()))
            .bind(filter.is_public)
            .fetch_one(executor)
            .await?;
        Ok(row.0)
    }

    /// Overwrite every content field and bump `updated_at`.
    /// Returns `None` if the prompt does not exist.
    pub async fn update<'e, E: PgExecutor<'e>>(
        executor: E,
        id: DbId,
        input: &PromptContent,
    ) -> Result<Option<PromptRow>, sqlx::Error> {
        let query = format!(
            "UPDATE prompts SET
                title = $1,
                body = $2,
                category = $3,
                tags = $4,
                is_public = $5,
                updated_at = NOW()
             WHERE id = $6
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PromptRow>(&query)
            .bind(&input.title)
            .bind(&input.body)
            .bind(input.category.as_str())
            .bind(&input.tags)
            .bind(input.is_public)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Delete a prompt; its versions go with it via `ON DELETE CASCADE`.
    /// Returns `true` if a row was removed.
    pub async fn delete<'e, E: PgExecutor<'e>>(executor: E, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM prompts WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
