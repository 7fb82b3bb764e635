//! Q&A prompt types and validation.
//!
//! Q&A prompts are system instructions for the public Q&A feature. Exactly
//! one of them may be active at any time; storage backends enforce that by
//! clearing every other active flag in the same transaction that sets one.
//! Each change to the prompt text bumps the prompt's version and appends a
//! history row.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum length for a Q&A prompt name.
pub const MAX_NAME_LENGTH: usize = 200;

/// Maximum length for a Q&A prompt description.
pub const MAX_DESCRIPTION_LENGTH: usize = 1_000;

/// Maximum length for the prompt text.
pub const MAX_PROMPT_TEXT_LENGTH: usize = 20_000;

/// Maximum length for formatting instructions.
pub const MAX_FORMATTING_LENGTH: usize = 5_000;

/// Maximum length for a history change note.
pub const MAX_CHANGE_NOTE_LENGTH: usize = 1_000;

/// `changed_by` value recorded on history rows written through the admin API.
pub const CHANGED_BY_ADMIN: &str = "admin";

/// Change description of the history row written at creation.
pub const INITIAL_VERSION_NOTE: &str = "Initial version";

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

/// A Q&A prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QaPrompt {
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

/// One entry of a Q&A prompt's text history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QaPromptHistory {
    pub id: DbId,
    pub prompt_id: DbId,
    pub version: i32,
    pub prompt_text: String,
    pub formatting_instructions: Option<String>,
    pub changed_by: String,
    pub change_description: Option<String>,
    pub created_at: Timestamp,
}

/// Validated replacement values for a Q&A prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QaPromptContent {
    pub name: String,
    pub description: Option<String>,
    pub prompt_text: String,
    pub formatting_instructions: Option<String>,
    /// `None` keeps the stored flag on update and means inactive on create.
    pub is_active: Option<bool>,
}

impl QaPromptContent {
    /// Whether saving this content makes the prompt the active one.
    pub fn activates(&self) -> bool {
        self.is_active == Some(true)
    }

    /// Active flag after saving over `current`.
    pub fn resolved_active(&self, current: &QaPrompt) -> bool {
        self.is_active.unwrap_or(current.is_active)
    }

    /// Whether saving `self` over `current` changes the versioned text.
    pub fn changes_text_of(&self, current: &QaPrompt) -> bool {
        self.prompt_text != current.prompt_text
            || self.formatting_instructions != current.formatting_instructions
    }
}

/// History row to append alongside a create or update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQaHistory {
    pub version: i32,
    pub change_description: Option<String>,
}

/// Version the prompt will carry after saving `incoming` over `current`,
/// plus the history row to write when the text changed.
pub fn plan_qa_update(
    current: &QaPrompt,
    incoming: &QaPromptContent,
    change_note: Option<&str>,
) -> (i32, Option<NewQaHistory>) {
    if incoming.changes_text_of(current) {
        let version = current.version + 1;
        let history = NewQaHistory {
            version,
            change_description: change_note.map(str::to_string),
        };
        (version, Some(history))
    } else {
        (current.version, None)
    }
}

/// Refuse to delete the active prompt.
pub fn ensure_deletable(prompt: &QaPrompt) -> Result<(), CoreError> {
    if prompt.is_active {
        return Err(CoreError::Conflict(
            "Cannot delete active prompt".to_string(),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Request draft
// ---------------------------------------------------------------------------

/// Q&A prompt fields as submitted by a client.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QaPromptDraft {
    pub name: Option<String>,
    pub description: Option<String>,
    pub prompt_text: Option<String>,
    pub formatting_instructions: Option<String>,
    pub is_active: Option<bool>,
    /// Recorded on the history row when the text changes.
    pub change_note: Option<String>,
}

impl QaPromptDraft {
    /// Trimmed change note, `None` when blank.
    pub fn validated_change_note(&self) -> Result<Option<String>, CoreError> {
        let note = non_blank(self.change_note.clone());
        if let Some(ref n) = note {
            check_length("Change note", n, MAX_CHANGE_NOTE_LENGTH)?;
        }
        Ok(note)
    }

    /// Validate and normalize into replacement content.
    pub fn into_content(self) -> Result<QaPromptContent, CoreError> {
        let name = self.name.as_deref().map(str::trim).unwrap_or_default();
        let prompt_text = self.prompt_text.as_deref().map(str::trim).unwrap_or_default();
        if name.is_empty() || prompt_text.is_empty() {
            return Err(CoreError::Validation(
                "Name and prompt_text are required".to_string(),
            ));
        }
        check_length("Name", name, MAX_NAME_LENGTH)?;
        check_length("Prompt text", prompt_text, MAX_PROMPT_TEXT_LENGTH)?;

        let description = non_blank(self.description);
        if let Some(ref d) = description {
            check_length("Description", d, MAX_DESCRIPTION_LENGTH)?;
        }
        let formatting_instructions = non_blank(self.formatting_instructions);
        if let Some(ref f) = formatting_instructions {
            check_length("Formatting instructions", f, MAX_FORMATTING_LENGTH)?;
        }

        Ok(QaPromptContent {
            name: name.to_string(),
            description,
            prompt_text: prompt_text.to_string(),
            formatting_instructions,
            is_active: self.is_active,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn check_length(field: &str, value: &str, max: usize) -> Result<(), CoreError> {
    let len = value.chars().count();
    if len > max {
        return Err(CoreError::Validation(format!(
            "{field} exceeds maximum length of {max} characters (got {len})"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
