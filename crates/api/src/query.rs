//! Shared query parameter types for API handlers.

use serde::Deserialize;
use trolyphaply_core::error::CoreError;
use trolyphaply_core::prompt::{Category, PromptFilter};
use trolyphaply_core::search::{
    clamp_limit, clamp_offset, normalize_search, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT,
};

/// Listing parameters for prompts
/// (`?search=&category=&public=&limit=&offset=`).
///
/// The public listing ignores `public` and always shows public prompts only.
#[derive(Debug, Default, Deserialize)]
pub struct PromptListParams {
    pub search: Option<String>,
    pub category: Option<String>,
    pub public: Option<bool>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PromptListParams {
    /// Build a clamped filter. An unknown category is a validation error;
    /// an empty one means "any".
    pub fn into_filter(self) -> Result<PromptFilter, CoreError> {
        let category = match self.category.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => Some(raw.parse::<Category>()?),
            _ => None,
        };
        Ok(PromptFilter {
            search: normalize_search(self.search.as_deref()),
            category,
            is_public: self.public,
            limit: clamp_limit(self.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT),
            offset: clamp_offset(self.offset),
        })
    }
}
