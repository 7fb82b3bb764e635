//! [`PgStore`]: the PostgreSQL implementation of the storage traits.
//!
//! Multi-row writes run inside one transaction. Revisions lock the live prompt
//! row with `FOR UPDATE` before reading the maximum version number; Q&A
//! activation changes take a transaction-scoped advisory lock.

use async_trait::async_trait;
use trolyphaply_core::prompt::{Prompt, PromptContent, PromptFilter, PromptVersion};
use trolyphaply_core::qa_prompt::{
    ensure_deletable, plan_qa_update, QaPrompt, QaPromptContent, QaPromptHistory,
    INITIAL_VERSION_NOTE,
};
use trolyphaply_core::revision::{plan_revision, Revision, RevisionOutcome};
use trolyphaply_core::store::{PromptStore, QaPromptStore, Store, StoreError, StoreResult};
use trolyphaply_core::types::DbId;

use crate::repositories::{PromptRepo, PromptVersionRepo, QaPromptHistoryRepo, QaPromptRepo};
use crate::DbPool;

/// Storage backed by a PostgreSQL connection pool.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl PromptStore for PgStore {
    async fn create_prompt(&self, content: &PromptContent) -> StoreResult<Prompt> {
        let row = PromptRepo::create(&self.pool, content)
            .await
            .map_err(StoreError::backend)?;
        tracing::debug!(prompt_id = row.id, "Prompt created");
        Ok(row.into())
    }

    async fn find_prompt(&self, id: DbId) -> StoreResult<Option<Prompt>> {
        let row = PromptRepo::find_by_id(&self.pool, id)
            .await
            .map_err(StoreError::backend)?;
        Ok(row.map(Into::into))
    }

    async fn list_prompts(&self, filter: &PromptFilter) -> StoreResult<Vec<Prompt>> {
        let rows = PromptRepo::list(&self.pool, filter)
            .await
            .map_err(StoreError::backend)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count_prompts(&self, filter: &PromptFilter) -> StoreResult<i64> {
        PromptRepo::count(&self.pool, filter)
            .await
            .map_err(StoreError::backend)
    }

    async fn update_prompt(
        &self,
        id: DbId,
        content: &PromptContent,
    ) -> StoreResult<Option<Prompt>> {
        let row = PromptRepo::update(&self.pool, id, content)
            .await
            .map_err(StoreError::backend)?;
        Ok(row.map(Into::into))
    }

    async fn delete_prompt(&self, id: DbId) -> StoreResult<bool> {
        let deleted = PromptRepo::delete(&self.pool, id)
            .await
            .map_err(StoreError::backend)?;
        if deleted {
            tracing::debug!(prompt_id = id, "Prompt deleted with its versions");
        }
        Ok(deleted)
    }

    async fn list_versions(&self, prompt_id: DbId) -> StoreResult<Vec<PromptVersion>> {
        if !PromptRepo::exists(&self.pool, prompt_id)
            .await
            .map_err(StoreError::backend)?
        {
            return Err(StoreError::not_found("Prompt", prompt_id));
        }
        let rows = PromptVersionRepo::list_for_prompt(&self.pool, prompt_id)
            .await
            .map_err(StoreError::backend)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_version(
        &self,
        prompt_id: DbId,
        version_id: DbId,
    ) -> StoreResult<Option<PromptVersion>> {
        let row = PromptVersionRepo::find_for_prompt(&self.pool, prompt_id, version_id)
            .await
            .map_err(StoreError::backend)?;
        Ok(row.map(Into::into))
    }

    async fn commit_revision(
        &self,
        prompt_id: DbId,
        revision: &Revision,
    ) -> StoreResult<RevisionOutcome> {
        let mut tx = self.pool.begin().await.map_err(StoreError::backend)?;

        let live: Prompt = PromptRepo::find_for_update(&mut *tx, prompt_id)
            .await
            .map_err(StoreError::backend)?
            .ok_or_else(|| StoreError::not_found("Prompt", prompt_id))?
            .into();

        let target: Option<PromptVersion> = match revision.restore_target() {
            Some(version_id) => PromptVersionRepo::find_by_id(&mut *tx, version_id)
                .await
                .map_err(StoreError::backend)?
                .map(Into::into),
            None => None,
        };

        let current_max = PromptVersionRepo::max_version(&mut *tx, prompt_id)
            .await
            .map_err(StoreError::backend)?;

        let plan = plan_revision(&live, target.as_ref(), current_max, revision)?;

        let version: PromptVersion = PromptVersionRepo::create(&mut *tx, &plan.snapshot)
            .await
            .map_err(StoreError::backend)?
            .into();

        let prompt = match plan.apply {
            Some(ref content) => PromptRepo::update(&mut *tx, prompt_id, content)
                .await
                .map_err(StoreError::backend)?
                .ok_or_else(|| StoreError::not_found("Prompt", prompt_id))?
                .into(),
            None => live,
        };

        tx.commit().await.map_err(StoreError::backend)?;

        tracing::debug!(
            prompt_id,
            version = version.version,
            version_id = version.id,
            "Prompt revision committed",
        );
        Ok(RevisionOutcome { prompt, version })
    }
}

#[async_trait]
impl QaPromptStore for PgStore {
    async fn list_qa_prompts(&self) -> StoreResult<Vec<QaPrompt>> {
        let rows = QaPromptRepo::list(&self.pool)
            .await
            .map_err(StoreError::backend)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_qa_prompt(&self, id: DbId) -> StoreResult<Option<QaPrompt>> {
        let row = QaPromptRepo::find_by_id(&self.pool, id)
            .await
            .map_err(StoreError::backend)?;
        Ok(row.map(Into::into))
    }

    async fn find_active_qa_prompt(&self) -> StoreResult<Option<QaPrompt>> {
        let row = QaPromptRepo::find_active(&self.pool)
            .await
            .map_err(StoreError::backend)?;
        Ok(row.map(Into::into))
    }

    async fn create_qa_prompt(&self, content: &QaPromptContent) -> StoreResult<QaPrompt> {
        let mut tx = self.pool.begin().await.map_err(StoreError::backend)?;

        if content.activates() {
            QaPromptRepo::lock_activation(&mut *tx)
                .await
                .map_err(StoreError::backend)?;
            QaPromptRepo::deactivate_others(&mut *tx, None)
                .await
                .map_err(StoreError::backend)?;
        }

        let prompt: QaPrompt = QaPromptRepo::create(&mut *tx, content)
            .await
            .map_err(StoreError::backend)?
            .into();
        QaPromptHistoryRepo::create(&mut *tx, &prompt, Some(INITIAL_VERSION_NOTE))
            .await
            .map_err(StoreError::backend)?;

        tx.commit().await.map_err(StoreError::backend)?;

        tracing::debug!(qa_prompt_id = prompt.id, active = prompt.is_active, "Q&A prompt created");
        Ok(prompt)
    }

    async fn update_qa_prompt(
        &self,
        id: DbId,
        content: &QaPromptContent,
        change_note: Option<&str>,
    ) -> StoreResult<QaPrompt> {
        let mut tx = self.pool.begin().await.map_err(StoreError::backend)?;

        if content.activates() {
            QaPromptRepo::lock_activation(&mut *tx)
                .await
                .map_err(StoreError::backend)?;
        }

        let current: QaPrompt = QaPromptRepo::find_for_update(&mut *tx, id)
            .await
            .map_err(StoreError::backend)?
            .ok_or_else(|| StoreError::not_found("QaPrompt", id))?
            .into();

        let (version, history) = plan_qa_update(&current, content, change_note);

        if content.activates() {
            QaPromptRepo::deactivate_others(&mut *tx, Some(id))
                .await
                .map_err(StoreError::backend)?;
        }

        let updated: QaPrompt = QaPromptRepo::update(&mut *tx, id, content, version)
            .await
            .map_err(StoreError::backend)?
            .ok_or_else(|| StoreError::not_found("QaPrompt", id))?
            .into();

        if let Some(history) = history {
            QaPromptHistoryRepo::create(&mut *tx, &updated, history.change_description.as_deref())
                .await
                .map_err(StoreError::backend)?;
        }

        tx.commit().await.map_err(StoreError::backend)?;

        tracing::debug!(qa_prompt_id = id, version = updated.version, "Q&A prompt updated");
        Ok(updated)
    }

    async fn activate_qa_prompt(&self, id: DbId) -> StoreResult<QaPrompt> {
        let mut tx = self.pool.begin().await.map_err(StoreError::backend)?;

        QaPromptRepo::lock_activation(&mut *tx)
            .await
            .map_err(StoreError::backend)?;

        // Check existence before touching the current active prompt.
        QaPromptRepo::find_for_update(&mut *tx, id)
            .await
            .map_err(StoreError::backend)?
            .ok_or_else(|| StoreError::not_found("QaPrompt", id))?;

        QaPromptRepo::deactivate_others(&mut *tx, Some(id))
            .await
            .map_err(StoreError::backend)?;
        let prompt: QaPrompt = QaPromptRepo::set_active(&mut *tx, id)
            .await
            .map_err(StoreError::backend)?
            .ok_or_else(|| StoreError::not_found("QaPrompt", id))?
            .into();

        tx.commit().await.map_err(StoreError::backend)?;

        tracing::info!(qa_prompt_id = id, "Q&A prompt activated");
        Ok(prompt)
    }

    async fn delete_qa_prompt(&self, id: DbId) -> StoreResult<()> {
        let mut tx = self.pool.begin().await.map_err(StoreError::backend)?;

        let prompt: QaPrompt = QaPromptRepo::find_for_update(&mut *tx, id)
            .await
            .map_err(StoreError::backend)?
            .ok_or_else(|| StoreError::not_found("QaPrompt", id))?
            .into();
        ensure_deletable(&prompt)?;

        QaPromptRepo::delete(&mut *tx, id)
            .await
            .map_err(StoreError::backend)?;

        tx.commit().await.map_err(StoreError::backend)?;

        tracing::debug!(qa_prompt_id = id, "Q&A prompt deleted");
        Ok(())
    }

    async fn list_qa_prompt_history(&self, id: DbId) -> StoreResult<Vec<QaPromptHistory>> {
        if QaPromptRepo::find_by_id(&self.pool, id)
            .await
            .map_err(StoreError::backend)?
            .is_none()
        {
            return Err(StoreError::not_found("QaPrompt", id));
        }
        let rows = QaPromptHistoryRepo::list_for_prompt(&self.pool, id)
            .await
            .map_err(StoreError::backend)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl Store for PgStore {
    async fn health_check(&self) -> StoreResult<()> {
        crate::health_check(&self.pool)
            .await
            .map_err(StoreError::backend)
    }
}
