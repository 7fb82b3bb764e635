//! Database row structs.
//!
//! Each submodule contains `FromRow` structs matching the table columns and
//! conversions into the domain types from `trolyphaply_core`. Create and
//! update inputs are the core content types themselves.

pub mod prompt;
pub mod prompt_version;
pub mod qa_prompt;
