//! Row structs for the `qa_prompts` and `qa_prompt_history` tables.

use sqlx::FromRow;
use trolyphaply_core::qa_prompt::{QaPrompt, QaPromptHistory};
use trolyphaply_core::types::{DbId, Timestamp};

/// A row from the `qa_prompts` table.
#[derive(Debug, Clone, FromRow)]
pub struct QaPromptRow {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub prompt_text: String,
    pub formatting_instructions: Option<String>,
    pub is_active: bool,
    pub version: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<QaPromptRow> for QaPrompt {
    fn from(row: QaPromptRow) -> Self {
        QaPrompt {
            id: row.id,
            name: row.name,
            description: row.description,
            prompt_text: row.prompt_text,
            formatting_instructions: row.formatting_instructions,
            is_active: row.is_active,
            version: row.version,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// A row from the `qa_prompt_history` table.
#[derive(Debug, Clone, FromRow)]
pub struct QaPromptHistoryRow {
    pub id: DbId,
    pub prompt_id: DbId,
    pub version: i32,
    pub prompt_text: String,
    pub formatting_instructions: Option<String>,
    pub changed_by: String,
    pub change_description: Option<String>,
    pub created_at: Timestamp,
}

impl From<QaPromptHistoryRow> for QaPromptHistory {
    fn from(row: QaPromptHistoryRow) -> Self {
        QaPromptHistory {
            id: row.id,
            prompt_id: row.prompt_id,
            version: row.version,
            prompt_text: row.prompt_text,
            formatting_instructions: row.formatting_instructions,
            changed_by: row.changed_by,
            change_description: row.change_description,
            created_at: row.created_at,
        }
    }
}
