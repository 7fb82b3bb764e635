//! Integration tests for prompt versioning against a real database.
//!
//! - `commit_revision` snapshots the pre-edit state and numbers versions 1..N
//! - Restore copies the target into a new version and makes it live
//! - Versions of another prompt are not found
//! - Deleting a prompt cascades to its versions
//! - Concurrent revisions get distinct consecutive numbers

use std::sync::Arc;

use assert_matches::assert_matches;
use sqlx::PgPool;
use trolyphaply_core::error::CoreError;
use trolyphaply_core::prompt::{Category, PromptContent, PromptFilter};
use trolyphaply_core::revision::Revision;
use trolyphaply_core::store::{PromptStore, StoreError};
use trolyphaply_db::repositories::{PromptRepo, PromptVersionRepo};
use trolyphaply_db::PgStore;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn content(title: &str) -> PromptContent {
    PromptContent {
        title: title.to_string(),
        body: format!("Nội dung {title}"),
        category: Category::Writing,
        tags: vec!["hợp đồng".into(), "mẫu".into()],
        is_public: true,
    }
}

fn edit(title: &str) -> Revision {
    Revision::Snapshot {
        apply: Some(content(title)),
        note: None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_edits_snapshot_pre_edit_state(pool: PgPool) {
    let store = PgStore::new(pool.clone());
    let prompt = store.create_prompt(&content("A")).await.unwrap();

    let first = store.commit_revision(prompt.id, &edit("B")).await.unwrap();
    assert_eq!(first.version.version, 1);
    assert_eq!(first.version.content.title, "A");
    assert_eq!(first.version.created_by.as_deref(), Some("Version 1"));
    assert_eq!(first.prompt.content.title, "B");

    let second = store.commit_revision(prompt.id, &edit("C")).await.unwrap();
    assert_eq!(second.version.version, 2);
    assert_eq!(second.version.content.title, "B");

    let versions = store.list_versions(prompt.id).await.unwrap();
    let numbers: Vec<i32> = versions.iter().map(|v| v.version).collect();
    assert_eq!(numbers, vec![2, 1]);

    let live = PromptRepo::find_by_id(&pool, prompt.id).await.unwrap().unwrap();
    assert_eq!(live.title, "C");
    assert_eq!(live.tags, vec!["hợp đồng".to_string(), "mẫu".to_string()]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_restore_creates_new_version(pool: PgPool) {
    let store = PgStore::new(pool);
    let prompt = store.create_prompt(&content("A")).await.unwrap();
    let v1 = store.commit_revision(prompt.id, &edit("B")).await.unwrap().version;
    store.commit_revision(prompt.id, &edit("C")).await.unwrap();

    let restored = store
        .commit_revision(
            prompt.id,
            &Revision::Restore {
                version_id: v1.id,
                note: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(restored.version.version, 3);
    assert_eq!(restored.version.content.title, "A");
    assert_eq!(
        restored.version.created_by.as_deref(),
        Some("Restored from version 1")
    );
    assert_eq!(restored.prompt.content.title, "A");
    assert_eq!(store.list_versions(prompt.id).await.unwrap().len(), 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_restore_foreign_version_not_found(pool: PgPool) {
    let store = PgStore::new(pool.clone());
    let a = store.create_prompt(&content("A")).await.unwrap();
    let b = store.create_prompt(&content("B")).await.unwrap();
    let b_version = store.commit_revision(b.id, &edit("B2")).await.unwrap().version;

    let result = store
        .commit_revision(
            a.id,
            &Revision::Restore {
                version_id: b_version.id,
                note: None,
            },
        )
        .await;
    assert_matches!(
        result,
        Err(StoreError::Core(CoreError::NotFound {
            entity: "PromptVersion",
            ..
        }))
    );

    // The failed restore wrote nothing.
    assert_eq!(PromptVersionRepo::max_version(&pool, a.id).await.unwrap(), None);
    assert!(store.find_version(a.id, b_version.id).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_cascades_versions(pool: PgPool) {
    let store = PgStore::new(pool.clone());
    let prompt = store.create_prompt(&content("A")).await.unwrap();
    store.commit_revision(prompt.id, &edit("B")).await.unwrap();

    assert!(store.delete_prompt(prompt.id).await.unwrap());
    assert!(!store.delete_prompt(prompt.id).await.unwrap());

    let remaining = PromptVersionRepo::list_for_prompt(&pool, prompt.id)
        .await
        .unwrap();
    assert!(remaining.is_empty());
    assert_matches!(
        store.list_versions(prompt.id).await,
        Err(StoreError::Core(CoreError::NotFound { entity: "Prompt", .. }))
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_concurrent_revisions_number_consecutively(pool: PgPool) {
    let store = Arc::new(PgStore::new(pool));
    let prompt_id = store.create_prompt(&content("A")).await.unwrap().id;

    let mut handles = Vec::new();
    for i in 0..8 {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            store
                .commit_revision(prompt_id, &edit(&format!("T{i}")))
                .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let mut numbers: Vec<i32> = store
        .list_versions(prompt_id)
        .await
        .unwrap()
        .iter()
        .map(|v| v.version)
        .collect();
    numbers.sort_unstable();
    assert_eq!(numbers, (1..=8).collect::<Vec<_>>());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_filters_and_counts(pool: PgPool) {
    let store = PgStore::new(pool);
    store.create_prompt(&content("Soạn hợp đồng thuê nhà")).await.unwrap();
    let mut private = content("Phân tích 50% bản án");
    private.is_public = false;
    private.category = Category::Analysis;
    store.create_prompt(&private).await.unwrap();

    let public = PromptFilter {
        is_public: Some(true),
        limit: 50,
        ..Default::default()
    };
    assert_eq!(store.count_prompts(&public).await.unwrap(), 1);

    let percent = PromptFilter {
        search: Some("50%".into()),
        limit: 50,
        ..Default::default()
    };
    let found = store.list_prompts(&percent).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].content.category, Category::Analysis);

    let paged = PromptFilter {
        limit: 1,
        offset: 1,
        ..Default::default()
    };
    let page = store.list_prompts(&paged).await.unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].content.title, "Soạn hợp đồng thuê nhà");
    assert_eq!(store.count_prompts(&paged).await.unwrap(), 2);
}
