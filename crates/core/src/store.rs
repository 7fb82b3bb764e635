//! Storage traits for prompts and Q&A prompts.
//!
//! Backends: `trolyphaply_db::PgStore` (PostgreSQL) and
//! [`crate::memory::MemoryStore`]. Every method that writes more than one row
//! must do so atomically; in particular [`PromptStore::commit_revision`]
//! computes the next version number, inserts the snapshot and updates the live
//! row as one unit, serialised against other revisions of the same prompt.

use async_trait::async_trait;

use crate::error::CoreError;
use crate::prompt::{Prompt, PromptContent, PromptFilter, PromptVersion};
use crate::qa_prompt::{QaPrompt, QaPromptContent, QaPromptHistory};
use crate::revision::{Revision, RevisionOutcome};
use crate::types::DbId;

/// Boxed backend error.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error returned by storage backends.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A domain failure detected while holding the transaction (missing
    /// prompt or version, deleting an active prompt).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The persistence layer failed.
    #[error("Storage error: {0}")]
    Backend(#[source] BoxError),
}

impl StoreError {
    pub fn backend<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        StoreError::Backend(Box::new(err))
    }

    pub fn not_found(entity: &'static str, id: DbId) -> Self {
        StoreError::Core(CoreError::NotFound { entity, id })
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Live prompts and their version history.
#[async_trait]
pub trait PromptStore: Send + Sync {
    /// Insert a new live prompt. No version is written.
    async fn create_prompt(&self, content: &PromptContent) -> StoreResult<Prompt>;

    async fn find_prompt(&self, id: DbId) -> StoreResult<Option<Prompt>>;

    /// Prompts matching `filter`, newest first, paginated.
    async fn list_prompts(&self, filter: &PromptFilter) -> StoreResult<Vec<Prompt>>;

    /// Number of prompts matching `filter`, ignoring pagination.
    async fn count_prompts(&self, filter: &PromptFilter) -> StoreResult<i64>;

    /// Overwrite the live fields without touching history.
    /// Returns `None` if the prompt does not exist.
    async fn update_prompt(&self, id: DbId, content: &PromptContent)
        -> StoreResult<Option<Prompt>>;

    /// Delete a prompt and all of its versions. Returns `false` if absent.
    async fn delete_prompt(&self, id: DbId) -> StoreResult<bool>;

    /// Versions of a prompt, highest version first.
    /// Fails with NotFound if the prompt does not exist.
    async fn list_versions(&self, prompt_id: DbId) -> StoreResult<Vec<PromptVersion>>;

    /// A version, only if it belongs to `prompt_id`.
    async fn find_version(
        &self,
        prompt_id: DbId,
        version_id: DbId,
    ) -> StoreResult<Option<PromptVersion>>;

    /// Atomically append a version and apply the live update it plans.
    async fn commit_revision(
        &self,
        prompt_id: DbId,
        revision: &Revision,
    ) -> StoreResult<RevisionOutcome>;
}

/// Q&A prompts with the single-active invariant.
#[async_trait]
pub trait QaPromptStore: Send + Sync {
    /// All Q&A prompts, newest first.
    async fn list_qa_prompts(&self) -> StoreResult<Vec<QaPrompt>>;

    async fn find_qa_prompt(&self, id: DbId) -> StoreResult<Option<QaPrompt>>;

    async fn find_active_qa_prompt(&self) -> StoreResult<Option<QaPrompt>>;

    /// Insert at version 1 with an initial history row. When the new prompt
    /// is active every other prompt is deactivated.
    async fn create_qa_prompt(&self, content: &QaPromptContent) -> StoreResult<QaPrompt>;

    /// Replace every field, bumping the version and appending history when
    /// the text changes. NotFound if absent.
    async fn update_qa_prompt(
        &self,
        id: DbId,
        content: &QaPromptContent,
        change_note: Option<&str>,
    ) -> StoreResult<QaPrompt>;

    /// Make `id` the only active prompt. NotFound if absent.
    async fn activate_qa_prompt(&self, id: DbId) -> StoreResult<QaPrompt>;

    /// Delete an inactive prompt and its history.
    /// NotFound if absent, Conflict if active.
    async fn delete_qa_prompt(&self, id: DbId) -> StoreResult<()>;

    /// History rows, highest version first. NotFound if the prompt is absent.
    async fn list_qa_prompt_history(&self, id: DbId) -> StoreResult<Vec<QaPromptHistory>>;
}

/// Everything the HTTP layer needs from a backend.
#[async_trait]
pub trait Store: PromptStore + QaPromptStore {
    /// Cheap liveness probe.
    async fn health_check(&self) -> StoreResult<()>;
}
