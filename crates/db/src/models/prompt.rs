//! Row struct for the `prompts` table.

use sqlx::FromRow;
use trolyphaply_core::prompt::{Category, Prompt, PromptContent};
use trolyphaply_core::types::{DbId, Timestamp};

/// A live prompt row from the `prompts` table.
#[derive(Debug, Clone, FromRow)]
pub struct PromptRow {
    pub id: DbId,
    pub title: String,
    pub body: String,
    #[sqlx(try_from = "String")]
    pub category: Category,
    pub tags: Vec<String>,
    pub is_public: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<PromptRow> for Prompt {
    fn from(row: PromptRow) -> Self {
        Prompt {
            id: row.id,
            content: PromptContent {
                title: row.title,
                body: row.body,
                category: row.category,
                tags: row.tags,
                is_public: row.is_public,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
