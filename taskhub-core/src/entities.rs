//! Core entity structures

use crate::{AccountId, CommentId, TaskId, TaskStatus, Timestamp};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account - owner of tasks and comments.
///
/// Credentials and session handling live outside this slice; only the
/// identity and email are consumed here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Account {
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "uuid"))]
    pub account_id: AccountId,
    pub email: String,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub created_at: Timestamp,
}

/// Task - unit of work owned by an account.
///
/// Soft-deleted via the `active` flag; deleted tasks stay in storage but
/// are excluded from listings and from the chatbot context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Task {
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "uuid"))]
    pub task_id: TaskId,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "uuid"))]
    pub account_id: AccountId,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub created_at: Timestamp,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub updated_at: Timestamp,
    pub active: bool,
}

impl Task {
    /// Create a new active task with a fresh id; created_at == updated_at.
    pub fn new(account_id: AccountId, title: String, description: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            task_id: Uuid::new_v4(),
            account_id,
            title,
            description,
            status: TaskStatus::Pending,
            created_at: now,
            updated_at: now,
            active: true,
        }
    }
}

/// Projection of a task used in the chatbot context snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct TaskBrief {
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
}

impl From<&Task> for TaskBrief {
    fn from(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.status,
        }
    }
}

/// Comment - free-text note attached to a task.
///
/// Ordering is by creation time, descending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Comment {
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "uuid"))]
    pub comment_id: CommentId,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "uuid"))]
    pub task_id: TaskId,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "uuid"))]
    pub account_id: AccountId,
    pub content: String,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub created_at: Timestamp,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub updated_at: Timestamp,
}

impl Comment {
    /// Create a new comment with a fresh id; created_at == updated_at.
    pub fn new(task_id: TaskId, account_id: AccountId, content: String) -> Self {
        let now = Utc::now();
        Self {
            comment_id: Uuid::new_v4(),
            task_id,
            account_id,
            content,
            created_at: now,
            updated_at: now,
        }
    }
}
