//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods that
//! accept a sqlx Postgres executor as the first argument, so the same query
//! runs against the pool or inside an open transaction.

pub mod prompt_repo;
pub mod prompt_version_repo;
pub mod qa_prompt_history_repo;
pub mod qa_prompt_repo;

pub use prompt_repo::PromptRepo;
pub use prompt_version_repo::PromptVersionRepo;
pub use qa_prompt_history_repo::QaPromptHistoryRepo;
pub use qa_prompt_repo::QaPromptRepo;
