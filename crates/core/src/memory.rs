//! In-memory [`Store`] backend.
//!
//! Used by the test suites and for running the API without PostgreSQL. Every
//! operation holds a single mutex for its whole duration, which gives the
//! same atomicity the Postgres backend gets from transactions.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::prompt::{Prompt, PromptContent, PromptFilter, PromptVersion};
use crate::qa_prompt::{
    self, QaPrompt, QaPromptContent, QaPromptHistory, CHANGED_BY_ADMIN, INITIAL_VERSION_NOTE,
};
use crate::revision::{plan_revision, Revision, RevisionOutcome};
use crate::store::{PromptStore, QaPromptStore, Store, StoreError, StoreResult};
use crate::types::DbId;

#[derive(Default)]
struct State {
    last_id: DbId,
    prompts: BTreeMap<DbId, Prompt>,
    versions: Vec<PromptVersion>,
    qa_prompts: BTreeMap<DbId, QaPrompt>,
    qa_history: Vec<QaPromptHistory>,
}

impl State {
    fn next_id(&mut self) -> DbId {
        self.last_id += 1;
        self.last_id
    }

    fn max_version(&self, prompt_id: DbId) -> Option<i32> {
        self.versions
            .iter()
            .filter(|v| v.prompt_id == prompt_id)
            .map(|v| v.version)
            .max()
    }

    fn push_qa_history(&mut self, prompt: &QaPrompt, change_description: Option<String>) {
        let id = self.next_id();
        self.qa_history.push(QaPromptHistory {
            id,
            prompt_id: prompt.id,
            version: prompt.version,
            prompt_text: prompt.prompt_text.clone(),
            formatting_instructions: prompt.formatting_instructions.clone(),
            changed_by: CHANGED_BY_ADMIN.to_string(),
            change_description,
            created_at: Utc::now(),
        });
    }

    fn deactivate_others(&mut self, keep: DbId) {
        for prompt in self.qa_prompts.values_mut() {
            if prompt.id != keep && prompt.is_active {
                prompt.is_active = false;
            }
        }
    }
}

/// A [`Store`] that keeps everything in process memory.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PromptStore for MemoryStore {
    async fn create_prompt(&self, content: &PromptContent) -> StoreResult<Prompt> {
        let mut state = self.state.lock().await;
        let now = Utc::now();
        let prompt = Prompt {
            id: state.next_id(),
            content: content.clone(),
            created_at: now,
            updated_at: now,
        };
        state.prompts.insert(prompt.id, prompt.clone());
        Ok(prompt)
    }

    async fn find_prompt(&self, id: DbId) -> StoreResult<Option<Prompt>> {
        Ok(self.state.lock().await.prompts.get(&id).cloned())
    }

    async fn list_prompts(&self, filter: &PromptFilter) -> StoreResult<Vec<Prompt>> {
        let state = self.state.lock().await;
        // Ids are assigned in creation order, so reverse id order is newest first.
        Ok(state
            .prompts
            .values()
            .rev()
            .filter(|p| filter.matches(p))
            .skip(filter.offset as usize)
            .take(filter.limit as usize)
            .cloned()
            .collect())
    }

    async fn count_prompts(&self, filter: &PromptFilter) -> StoreResult<i64> {
        let state = self.state.lock().await;
        Ok(state.prompts.values().filter(|p| filter.matches(p)).count() as i64)
    }

    async fn update_prompt(
        &self,
        id: DbId,
        content: &PromptContent,
    ) -> StoreResult<Option<Prompt>> {
        let mut state = self.state.lock().await;
        Ok(state.prompts.get_mut(&id).map(|prompt| {
            prompt.content = content.clone();
            prompt.updated_at = Utc::now();
            prompt.clone()
        }))
    }

    async fn delete_prompt(&self, id: DbId) -> StoreResult<bool> {
        let mut state = self.state.lock().await;
        if state.prompts.remove(&id).is_none() {
            return Ok(false);
        }
        state.versions.retain(|v| v.prompt_id != id);
        Ok(true)
    }

    async fn list_versions(&self, prompt_id: DbId) -> StoreResult<Vec<PromptVersion>> {
        let state = self.state.lock().await;
        if !state.prompts.contains_key(&prompt_id) {
            return Err(StoreError::not_found("Prompt", prompt_id));
        }
        let mut versions: Vec<PromptVersion> = state
            .versions
            .iter()
            .filter(|v| v.prompt_id == prompt_id)
            .cloned()
            .collect();
        versions.sort_by(|a, b| b.version.cmp(&a.version));
        Ok(versions)
    }

    async fn find_version(
        &self,
        prompt_id: DbId,
        version_id: DbId,
    ) -> StoreResult<Option<PromptVersion>> {
        let state = self.state.lock().await;
        Ok(state
            .versions
            .iter()
            .find(|v| v.id == version_id && v.prompt_id == prompt_id)
            .cloned())
    }

    async fn commit_revision(
        &self,
        prompt_id: DbId,
        revision: &Revision,
    ) -> StoreResult<RevisionOutcome> {
        let mut state = self.state.lock().await;

        let live = state
            .prompts
            .get(&prompt_id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("Prompt", prompt_id))?;
        let target = revision
            .restore_target()
            .and_then(|id| state.versions.iter().find(|v| v.id == id).cloned());
        let plan = plan_revision(&live, target.as_ref(), state.max_version(prompt_id), revision)?;

        let now = Utc::now();
        let version = PromptVersion {
            id: state.next_id(),
            prompt_id,
            version: plan.snapshot.version,
            content: plan.snapshot.content,
            created_by: Some(plan.snapshot.created_by),
            created_at: now,
        };
        state.versions.push(version.clone());

        let mut prompt = live;
        if let Some(content) = plan.apply {
            prompt.content = content;
            prompt.updated_at = now;
            state.prompts.insert(prompt_id, prompt.clone());
        }

        Ok(RevisionOutcome { prompt, version })
    }
}

#[async_trait]
impl QaPromptStore for MemoryStore {
    async fn list_qa_prompts(&self) -> StoreResult<Vec<QaPrompt>> {
        let state = self.state.lock().await;
        Ok(state.qa_prompts.values().rev().cloned().collect())
    }

    async fn find_qa_prompt(&self, id: DbId) -> StoreResult<Option<QaPrompt>> {
        Ok(self.state.lock().await.qa_prompts.get(&id).cloned())
    }

    async fn find_active_qa_prompt(&self) -> StoreResult<Option<QaPrompt>> {
        let state = self.state.lock().await;
        Ok(state.qa_prompts.values().find(|p| p.is_active).cloned())
    }

    async fn create_qa_prompt(&self, content: &QaPromptContent) -> StoreResult<QaPrompt> {
        let mut state = self.state.lock().await;
        let now = Utc::now();
        let prompt = QaPrompt {
            id: state.next_id(),
            name: content.name.clone(),
            description: content.description.clone(),
            prompt_text: content.prompt_text.clone(),
            formatting_instructions: content.formatting_instructions.clone(),
            is_active: content.activates(),
            version: 1,
            created_at: now,
            updated_at: now,
        };
        if prompt.is_active {
            state.deactivate_others(prompt.id);
        }
        state.qa_prompts.insert(prompt.id, prompt.clone());
        state.push_qa_history(&prompt, Some(INITIAL_VERSION_NOTE.to_string()));
        Ok(prompt)
    }

    async fn update_qa_prompt(
        &self,
        id: DbId,
        content: &QaPromptContent,
        change_note: Option<&str>,
    ) -> StoreResult<QaPrompt> {
        let mut state = self.state.lock().await;
        let current = state
            .qa_prompts
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("QaPrompt", id))?;

        let (version, history) = qa_prompt::plan_qa_update(&current, content, change_note);
        if content.activates() {
            state.deactivate_others(id);
        }
        let updated = QaPrompt {
            name: content.name.clone(),
            description: content.description.clone(),
            prompt_text: content.prompt_text.clone(),
            formatting_instructions: content.formatting_instructions.clone(),
            is_active: content.resolved_active(&current),
            version,
            updated_at: Utc::now(),
            ..current
        };
        state.qa_prompts.insert(id, updated.clone());
        if let Some(history) = history {
            state.push_qa_history(&updated, history.change_description);
        }
        Ok(updated)
    }

    async fn activate_qa_prompt(&self, id: DbId) -> StoreResult<QaPrompt> {
        let mut state = self.state.lock().await;
        if !state.qa_prompts.contains_key(&id) {
            return Err(StoreError::not_found("QaPrompt", id));
        }
        state.deactivate_others(id);
        let prompt = state
            .qa_prompts
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found("QaPrompt", id))?;
        prompt.is_active = true;
        prompt.updated_at = Utc::now();
        Ok(prompt.clone())
    }

    async fn delete_qa_prompt(&self, id: DbId) -> StoreResult<()> {
        let mut state = self.state.lock().await;
        let prompt = state
            .qa_prompts
            .get(&id)
            .ok_or_else(|| StoreError::not_found("QaPrompt", id))?;
        qa_prompt::ensure_deletable(prompt)?;
        state.qa_prompts.remove(&id);
        state.qa_history.retain(|h| h.prompt_id != id);
        Ok(())
    }

    async fn list_qa_prompt_history(&self, id: DbId) -> StoreResult<Vec<QaPromptHistory>> {
        let state = self.state.lock().await;
        if !state.qa_prompts.contains_key(&id) {
            return Err(StoreError::not_found("QaPrompt", id));
        }
        let mut history: Vec<QaPromptHistory> = state
            .qa_history
            .iter()
            .filter(|h| h.prompt_id == id)
            .cloned()
            .collect();
        history.sort_by(|a, b| b.version.cmp(&a.version));
        Ok(history)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
