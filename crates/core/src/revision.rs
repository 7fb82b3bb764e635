//! Revision planning for versioned prompts.
//!
//! A revision appends one [`PromptVersion`] to a prompt's history and may
//! overwrite the live row. Storage backends load the live prompt, the restore
//! target and the current maximum version number inside one transaction, call
//! [`plan_revision`], and then write the planned snapshot before the planned
//! live update.
//!
//! Two revision kinds exist:
//!
//! - [`Revision::Snapshot`] captures the live state *before* any change,
//!   labelled `"Version {n}"` unless a note is given, then optionally applies
//!   new fields.
//! - [`Revision::Restore`] copies a historical version into a new version,
//!   labelled `"Restored from version {k}"` unless a note is given, then makes
//!   that content live.

use serde::Serialize;

use crate::error::CoreError;
use crate::prompt::{Prompt, PromptContent, PromptVersion};
use crate::types::DbId;

/// A requested history-writing change to a prompt.
#[derive(Debug, Clone, PartialEq)]
pub enum Revision {
    /// Snapshot the live state, then overwrite it with `apply` if present.
    Snapshot {
        apply: Option<PromptContent>,
        note: Option<String>,
    },
    /// Copy version `version_id` into a new version and make it live.
    Restore {
        version_id: DbId,
        note: Option<String>,
    },
}

impl Revision {
    /// The version this revision restores from, if any.
    pub fn restore_target(&self) -> Option<DbId> {
        match self {
            Revision::Restore { version_id, .. } => Some(*version_id),
            Revision::Snapshot { .. } => None,
        }
    }
}

/// The version row a revision will insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewVersion {
    pub prompt_id: DbId,
    pub version: i32,
    pub content: PromptContent,
    pub created_by: String,
}

/// What a storage backend must write, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct RevisionPlan {
    pub snapshot: NewVersion,
    pub apply: Option<PromptContent>,
}

/// Result of a committed revision.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevisionOutcome {
    pub prompt: Prompt,
    pub version: PromptVersion,
}

/// Next version number given the current per-prompt maximum.
pub fn next_version_number(current_max: Option<i32>) -> i32 {
    current_max.unwrap_or(0) + 1
}

/// Compute the snapshot and live update for `revision`.
///
/// `target` must be the version named by a restore (looked up by id, without
/// an ownership filter) so that a version of another prompt is reported as
/// not found for this one.
pub fn plan_revision(
    live: &Prompt,
    target: Option<&PromptVersion>,
    current_max: Option<i32>,
    revision: &Revision,
) -> Result<RevisionPlan, CoreError> {
    let next = next_version_number(current_max);

    match revision {
        Revision::Snapshot { apply, note } => Ok(RevisionPlan {
            snapshot: NewVersion {
                prompt_id: live.id,
                version: next,
                content: live.content.clone(),
                created_by: resolve_note(note.as_deref(), || format!("Version {next}")),
            },
            apply: apply.clone(),
        }),
        Revision::Restore { version_id, note } => {
            let target = target
                .filter(|v| v.id == *version_id && v.prompt_id == live.id)
                .ok_or(CoreError::NotFound {
                    entity: "PromptVersion",
                    id: *version_id,
                })?;
            Ok(RevisionPlan {
                snapshot: NewVersion {
                    prompt_id: live.id,
                    version: next,
                    content: target.content.clone(),
                    created_by: resolve_note(note.as_deref(), || {
                        format!("Restored from version {}", target.version)
                    }),
                },
                apply: Some(target.content.clone()),
            })
        }
    }
}

/// Use the caller's note unless it is blank.
fn resolve_note(note: Option<&str>, default: impl FnOnce() -> String) -> String {
    match note.map(str::trim) {
        Some(n) if !n.is_empty() => n.to_string(),
        _ => default(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
