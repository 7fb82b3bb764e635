//! Repository for the `qa_prompt_history` table.

use sqlx::PgExecutor;
use trolyphaply_core::qa_prompt::{QaPrompt, CHANGED_BY_ADMIN};
use trolyphaply_core::types::DbId;

use crate::models::qa_prompt::QaPromptHistoryRow;

/// Column list for qa_prompt_history queries.
const COLUMNS: &str = "id, prompt_id, version, prompt_text, formatting_instructions, \
    changed_by, change_description, created_at";

/// Provides read and create operations for Q&A prompt history.
pub struct QaPromptHistoryRepo;

impl QaPromptHistoryRepo {
    /// Record the prompt's current text under its current version.
    pub async fn create<'e, E: PgExecutor<'e>>(
        executor: E,
        prompt: &QaPrompt,
        change_description: Option<&str>,
    ) -> Result<QaPromptHistoryRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO qa_prompt_history
                (prompt_id, version, prompt_text, formatting_instructions,
                 changed_by, change_description)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, QaPromptHistoryRow>(&query)
            .bind(prompt.id)
            .bind(prompt.version)
            .bind(&prompt.prompt_text)
            .bind(&prompt.formatting_instructions)
            .bind(CHANGED_BY_ADMIN)
            .bind(change_description)
            .fetch_one(executor)
            .await
    }

    /// List history for a prompt, highest version first.
    pub async fn list_for_prompt<'e, E: PgExecutor<'e>>(
        executor: E,
        prompt_id: DbId,
    ) -> Result<Vec<QaPromptHistoryRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM qa_prompt_history
             WHERE prompt_id = $1
             ORDER BY version DESC"
        );
        sqlx::query_as::<_, QaPromptHistoryRow>(&query)
            .bind(prompt_id)
            .fetch_all(executor)
            .await
    }
}
