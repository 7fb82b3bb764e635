//! Repository for the `qa_prompts` table.
//!
//! The single-active invariant is backed by the `uq_qa_prompts_single_active`
//! partial unique index; callers clear other active rows with
//! [`QaPromptRepo::deactivate_others`] in the same transaction before setting
//! a row active.

use sqlx::PgExecutor;
use trolyphaply_core::qa_prompt::QaPromptContent;
use trolyphaply_core::types::DbId;

use crate::models::qa_prompt::QaPromptRow;

/// Advisory lock key that serialises activation changes.
const ACTIVATION_LOCK_KEY: i64 = 0x7161_5f61_6374;

/// Column list for qa_prompts queries.
const COLUMNS: &str = "id, name, description, prompt_text, formatting_instructions, \
    is_active, version, created_at, updated_at";

/// Provides CRUD and activation operations for Q&A prompts.
pub struct QaPromptRepo;

impl QaPromptRepo {
    /// Insert a new prompt at version 1.
    pub async fn create<'e, E: PgExecutor<'e>>(
        executor: E,
        input: &QaPromptContent,
    ) -> Result<QaPromptRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO qa_prompts
                (name, description, prompt_text, formatting_instructions, is_active, version)
             VALUES ($1, $2, $3, $4, $5, 1)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, QaPromptRow>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.prompt_text)
            .bind(&input.formatting_instructions)
            .bind(input.activates())
            .fetch_one(executor)
            .await
    }

    /// Find a prompt by its primary key.
    pub async fn find_by_id<'e, E: PgExecutor<'e>>(
        executor: E,
        id: DbId,
    ) -> Result<Option<QaPromptRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM qa_prompts WHERE id = $1");
        sqlx::query_as::<_, QaPromptRow>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Find a prompt and lock its row for the rest of the transaction.
    pub async fn find_for_update<'e, E: PgExecutor<'e>>(
        executor: E,
        id: DbId,
    ) -> Result<Option<QaPromptRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM qa_prompts WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, QaPromptRow>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Find the active prompt, if any.
    pub async fn find_active<'e, E: PgExecutor<'e>>(
        executor: E,
    ) -> Result<Option<QaPromptRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM qa_prompts WHERE is_active = true");
        sqlx::query_as::<_, QaPromptRow>(&query)
            .fetch_optional(executor)
            .await
    }

    /// List all prompts, newest first.
    pub async fn list<'e, E: PgExecutor<'e>>(executor: E) -> Result<Vec<QaPromptRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM qa_prompts ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, QaPromptRow>(&query)
            .fetch_all(executor)
            .await
    }

    /// Replace every field and set the version computed by the caller.
    /// A missing active flag leaves the stored one unchanged.
    pub async fn update<'e, E: PgExecutor<'e>>(
        executor: E,
        id: DbId,
        input: &QaPromptContent,
        version: i32,
    ) -> Result<Option<QaPromptRow>, sqlx::Error> {
        let query = format!(
            "UPDATE qa_prompts SET
                name = $1,
                description = $2,
                prompt_text = $3,
                formatting_instructions = $4,
                is_active = COALESCE($5, is_active),
                version = $6,
                updated_at = NOW()
             WHERE id = $7
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, QaPromptRow>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.prompt_text)
            .bind(&input.formatting_instructions)
            .bind(input.is_active)
            .bind(version)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Take the transaction-scoped activation lock.
    ///
    /// Held by every write that may set `is_active`, so two concurrent
    /// activations queue instead of tripping the unique index.
    pub async fn lock_activation<'e, E: PgExecutor<'e>>(executor: E) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(ACTIVATION_LOCK_KEY)
            .execute(executor)
            .await?;
        Ok(())
    }

    /// Clear the active flag on every prompt except `keep` (pass `None` to
    /// clear all). Returns the number of rows changed.
    pub async fn deactivate_others<'e, E: PgExecutor<'e>>(
        executor: E,
        keep: Option<DbId>,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE qa_prompts SET is_active = false, updated_at = NOW()
             WHERE is_active = true AND ($1::bigint IS NULL OR id <> $1)",
        )
        .bind(keep)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    /// Set the active flag on one prompt.
    pub async fn set_active<'e, E: PgExecutor<'e>>(
        executor: E,
        id: DbId,
    ) -> Result<Option<QaPromptRow>, sqlx::Error> {
        let query = format!(
            "UPDATE qa_prompts SET is_active = true, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, QaPromptRow>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Delete a prompt; its history goes with it via `ON DELETE CASCADE`.
    pub async fn delete<'e, E: PgExecutor<'e>>(executor: E, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM qa_prompts WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
