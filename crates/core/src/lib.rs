//! Domain layer for the TroLyPhapLy prompt service.
//!
//! Holds the prompt and Q&A-prompt domain types, their validation rules,
//! the revision planning logic behind prompt versioning, and the storage
//! traits implemented by the Postgres and in-memory backends.

pub mod error;
pub mod memory;
pub mod prompt;
pub mod qa_prompt;
pub mod revision;
pub mod search;
pub mod store;
pub mod types;
