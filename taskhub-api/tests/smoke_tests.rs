//! End-to-end smoke tests for the TaskHub API data layer
//!
//! These tests require a running PostgreSQL instance (TASKHUB_DB_* env
//! vars) with schema.sql applied, and are gated behind the `db-tests`
//! feature:
//!
//! ```sh
//! cargo test -p taskhub-api --features db-tests
//! ```

#![cfg(feature = "db-tests")]

use taskhub_api::types::{CreateTaskRequest, UpdateTaskRequest};
use taskhub_api::{build_snapshot, ApiResult, DbClient, DbConfig};
use taskhub_core::TaskStatus;
use uuid::Uuid;

fn test_db() -> ApiResult<DbClient> {
    let config = DbConfig::from_env();
    DbClient::from_config(&config)
}

fn task_request(title: &str, status: Option<TaskStatus>) -> CreateTaskRequest {
    CreateTaskRequest {
        title: title.to_string(),
        description: Some("integration test".to_string()),
        status,
    }
}

#[tokio::test]
async fn smoke_test_task_crud_chain() -> ApiResult<()> {
    let db = test_db()?;
    let account = db.account_create("task-crud@test.local").await?;

    let task = db
        .task_create(&task_request("smoke-task", None), account.account_id)
        .await?;
    assert_eq!(task.status, TaskStatus::Pending);
    assert!(task.active);

    let fetched = db.task_get(task.task_id, account.account_id).await?;
    assert_eq!(fetched.map(|t| t.task_id), Some(task.task_id));

    let listed = db.task_list(account.account_id).await?;
    assert!(listed.iter().any(|t| t.task_id == task.task_id));

    // Update keeps created_at and bumps updated_at.
    let update = UpdateTaskRequest {
        title: None,
        description: None,
        status: Some(TaskStatus::InProgress),
    };
    let updated = db
        .task_update(task.task_id, account.account_id, &update)
        .await?
        .ok_or_else(|| taskhub_api::ApiError::task_not_found(task.task_id))?;
    assert_eq!(updated.status, TaskStatus::InProgress);
    assert_eq!(updated.created_at, task.created_at);
    assert!(updated.updated_at > task.updated_at);

    // Soft delete hides the task from reads but keeps the row.
    assert!(db.task_delete(task.task_id, account.account_id).await?);
    assert!(db.task_get(task.task_id, account.account_id).await?.is_none());

    // Second delete is a no-op.
    assert!(!db.task_delete(task.task_id, account.account_id).await?);

    Ok(())
}

#[tokio::test]
async fn smoke_test_comment_crud_chain() -> ApiResult<()> {
    let db = test_db()?;
    let account = db.account_create("comment-crud@test.local").await?;
    let task = db
        .task_create(&task_request("commented", None), account.account_id)
        .await?;

    let first = db
        .comment_create(task.task_id, account.account_id, "first")
        .await?;
    let second = db
        .comment_create(task.task_id, account.account_id, "second")
        .await?;

    // Most recent first.
    let listed = db.comment_list(task.task_id, account.account_id).await?;
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].comment_id, second.comment_id);
    assert_eq!(listed[1].comment_id, first.comment_id);

    // Update keeps the id and created_at, bumps updated_at.
    let updated = db
        .comment_update(first.comment_id, task.task_id, account.account_id, "edited")
        .await?
        .ok_or_else(|| taskhub_api::ApiError::comment_not_found(first.comment_id))?;
    assert_eq!(updated.comment_id, first.comment_id);
    assert_eq!(updated.content, "edited");
    assert_eq!(updated.created_at, first.created_at);
    assert!(updated.updated_at >= first.updated_at);

    // Updating with a mismatched task id matches nothing.
    let miss = db
        .comment_update(first.comment_id, Uuid::new_v4(), account.account_id, "nope")
        .await?;
    assert!(miss.is_none());

    // Delete is idempotent.
    assert!(
        db.comment_delete(first.comment_id, task.task_id, account.account_id)
            .await?
    );
    assert!(
        !db.comment_delete(first.comment_id, task.task_id, account.account_id)
            .await?
    );

    Ok(())
}

#[tokio::test]
async fn smoke_test_snapshot_reflects_tasks() -> ApiResult<()> {
    let db = test_db()?;
    let account = db.account_create("snapshot@test.local").await?;

    for i in 0..3 {
        db.task_create(
            &task_request(&format!("pending-{}", i), Some(TaskStatus::Pending)),
            account.account_id,
        )
        .await?;
    }
    db.task_create(
        &task_request("finished", Some(TaskStatus::Done)),
        account.account_id,
    )
    .await?;

    let snapshot = build_snapshot(&db, account.account_id).await;

    assert_eq!(snapshot.task_count, 4);
    assert_eq!(snapshot.status_summary.get("pending"), Some(&3));
    assert_eq!(snapshot.status_summary.get("done"), Some(&1));
    assert_eq!(snapshot.tasks.len(), 4);
    assert_eq!(
        snapshot.account_info.email.as_deref(),
        Some("snapshot@test.local")
    );

    // Soft-deleted tasks drop out of the snapshot.
    let listed = db.task_list(account.account_id).await?;
    db.task_delete(listed[0].task_id, account.account_id).await?;
    let after = build_snapshot(&db, account.account_id).await;
    assert_eq!(after.task_count, 3);

    Ok(())
}
