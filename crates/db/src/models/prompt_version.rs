//! Row struct for the `prompt_versions` table.

use sqlx::FromRow;
use trolyphaply_core::prompt::{Category, PromptContent, PromptVersion};
use trolyphaply_core::types::{DbId, Timestamp};

/// A snapshot row from the `prompt_versions` table. Rows are never updated.
#[derive(Debug, Clone, FromRow)]
pub struct PromptVersionRow {
    pub id: DbId,
    pub prompt_id: DbId,
    pub version: i32,
    pub title: String,
    pub body: String,
    #[sqlx(try_from = "String")]
    pub category: Category,
    pub tags: Vec<String>,
    pub is_public: bool,
    pub created_by: Option<String>,
    pub created_at: Timestamp,
}

impl From<PromptVersionRow> for PromptVersion {
    fn from(row: PromptVersionRow) -> Self {
        PromptVersion {
            id: row.id,
            prompt_id: row.prompt_id,
            version: row.version,
            content: PromptContent {
                title: row.title,
                body: row.body,
                category: row.category,
                tags: row.tags,
                is_public: row.is_public,
            },
            created_by: row.created_by,
            created_at: row.created_at,
        }
    }
}
