//! Prompt library types and validation.
//!
//! A [`Prompt`] is the live, editable record; a [`PromptVersion`] is an
//! immutable snapshot of a prompt's [`PromptContent`] at some point in time.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum length for a prompt title in characters.
pub const MAX_TITLE_LENGTH: usize = 200;

/// Maximum length for a prompt body in characters.
pub const MAX_BODY_LENGTH: usize = 5_000;

/// Maximum number of tags on a prompt.
pub const MAX_TAGS_COUNT: usize = 20;

/// Maximum length of a single tag in characters.
pub const MAX_TAG_LENGTH: usize = 50;

/// Maximum length for a version note in characters.
pub const MAX_VERSION_NOTE_LENGTH: usize = 1_000;

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// Prompt category, stored as its lowercase value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Writing,
    Analysis,
    Coding,
    Creative,
    Education,
    Business,
    #[default]
    Other,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Writing,
        Category::Analysis,
        Category::Coding,
        Category::Creative,
        Category::Education,
        Category::Business,
        Category::Other,
    ];

    /// Stored value.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Writing => "writing",
            Category::Analysis => "analysis",
            Category::Coding => "coding",
            Category::Creative => "creative",
            Category::Education => "education",
            Category::Business => "business",
            Category::Other => "other",
        }
    }

    /// Display label shown in the admin dashboard.
    pub fn label(self) -> &'static str {
        match self {
            Category::Writing => "Viết lách",
            Category::Analysis => "Phân tích",
            Category::Coding => "Lập trình",
            Category::Creative => "Sáng tạo",
            Category::Education => "Giáo dục",
            Category::Business => "Kinh doanh",
            Category::Other => "Khác",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts the stored value (any case) or the Vietnamese label.
impl FromStr for Category {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(needle) || c.label() == needle)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Unknown category '{needle}'. Expected one of: {}",
                    Category::ALL.map(Category::as_str).join(", ")
                ))
            })
    }
}

impl TryFrom<String> for Category {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// ---------------------------------------------------------------------------
// Content
// ---------------------------------------------------------------------------

/// The versioned fields of a prompt: everything a snapshot copies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptContent {
    pub title: String,
    pub body: String,
    pub category: Category,
    pub tags: Vec<String>,
    pub is_public: bool,
}

impl PromptContent {
    /// Trim text fields, de-duplicate tags and check every limit.
    pub fn normalized(self) -> Result<Self, CoreError> {
        let title = self.title.trim().to_string();
        let body = self.body.trim().to_string();
        validate_title(&title)?;
        validate_body(&body)?;
        let tags = normalize_tags(self.tags)?;
        Ok(Self {
            title,
            body,
            category: self.category,
            tags,
            is_public: self.is_public,
        })
    }
}

/// A live prompt row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prompt {
    pub id: DbId,
    #[serde(flatten)]
    pub content: PromptContent,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// An immutable snapshot of a prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptVersion {
    pub id: DbId,
    pub prompt_id: DbId,
    pub version: i32,
    #[serde(flatten)]
    pub content: PromptContent,
    /// Free-text annotation, not a user identity.
    pub created_by: Option<String>,
    pub created_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Request draft
// ---------------------------------------------------------------------------

/// Prompt fields as submitted by a client, before validation.
///
/// Every field is optional at the wire level so that missing fields surface
/// as validation errors rather than body rejections.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PromptDraft {
    pub title: Option<String>,
    pub body: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub is_public: Option<bool>,
}

impl PromptDraft {
    /// Content for a new prompt. Title and body are required; the category
    /// defaults to `other`, tags to empty and visibility to public.
    pub fn into_new_content(self) -> Result<PromptContent, CoreError> {
        let category = match self.category.as_deref() {
            Some(raw) if !raw.trim().is_empty() => raw.parse()?,
            _ => Category::default(),
        };
        PromptContent {
            title: required(self.title, "title")?,
            body: required(self.body, "body")?,
            category,
            tags: self.tags.unwrap_or_default(),
            is_public: self.is_public.unwrap_or(true),
        }
        .normalized()
    }

    /// Content for a full replacement edit. Every field is required.
    pub fn into_replacement(self) -> Result<PromptContent, CoreError> {
        PromptContent {
            title: required(self.title, "title")?,
            body: required(self.body, "body")?,
            category: required(self.category, "category")?.parse()?,
            tags: required(self.tags, "tags")?,
            is_public: required(self.is_public, "is_public")?,
        }
        .normalized()
    }
}

fn required<T>(value: Option<T>, field: &str) -> Result<T, CoreError> {
    value.ok_or_else(|| CoreError::Validation(format!("Field '{field}' is required")))
}

// ---------------------------------------------------------------------------
// Listing filter
// ---------------------------------------------------------------------------

/// Filter for prompt listings. `limit`/`offset` are already clamped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptFilter {
    pub search: Option<String>,
    pub category: Option<Category>,
    pub is_public: Option<bool>,
    pub limit: i64,
    pub offset: i64,
}

impl Default for PromptFilter {
    fn default() -> Self {
        Self {
            search: None,
            category: None,
            is_public: None,
            limit: crate::search::DEFAULT_LIST_LIMIT,
            offset: 0,
        }
    }
}

impl PromptFilter {
    /// Whether `prompt` passes the search, category and visibility filters
    /// (pagination is applied separately).
    pub fn matches(&self, prompt: &Prompt) -> bool {
        let content = &prompt.content;
        if let Some(category) = self.category {
            if content.category != category {
                return false;
            }
        }
        if let Some(is_public) = self.is_public {
            if content.is_public != is_public {
                return false;
            }
        }
        match &self.search {
            Some(term) => {
                crate::search::matches_search(&content.title, term)
                    || crate::search::matches_search(&content.body, term)
            }
            None => true,
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a (trimmed) title: non-empty and within length limit.
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.is_empty() {
        return Err(CoreError::Validation("Title must not be empty".to_string()));
    }
    let len = title.chars().count();
    if len > MAX_TITLE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Title exceeds maximum length of {MAX_TITLE_LENGTH} characters (got {len})"
        )));
    }
    Ok(())
}

/// Validate a (trimmed) body: non-empty and within length limit.
pub fn validate_body(body: &str) -> Result<(), CoreError> {
    if body.is_empty() {
        return Err(CoreError::Validation("Body must not be empty".to_string()));
    }
    let len = body.chars().count();
    if len > MAX_BODY_LENGTH {
        return Err(CoreError::Validation(format!(
            "Body exceeds maximum length of {MAX_BODY_LENGTH} characters (got {len})"
        )));
    }
    Ok(())
}

/// Trim tags, drop duplicates (first occurrence wins) and check limits.
pub fn normalize_tags(tags: Vec<String>) -> Result<Vec<String>, CoreError> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if tag.is_empty() {
            return Err(CoreError::Validation("Tags must not be empty".to_string()));
        }
        if tag.chars().count() > MAX_TAG_LENGTH {
            return Err(CoreError::Validation(format!(
                "Tag '{tag}' exceeds maximum length of {MAX_TAG_LENGTH} characters"
            )));
        }
        if !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    if out.len() > MAX_TAGS_COUNT {
        return Err(CoreError::Validation(format!(
            "Tag count exceeds maximum of {MAX_TAGS_COUNT} (got {})",
            out.len()
        )));
    }
    Ok(out)
}

/// Validate a version note: length check only.
pub fn validate_version_note(note: &str) -> Result<(), CoreError> {
    let len = note.chars().count();
    if len > MAX_VERSION_NOTE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Version note exceeds maximum length of {MAX_VERSION_NOTE_LENGTH} characters (got {len})"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
