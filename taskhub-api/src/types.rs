//! API Request/Response Types
//!
//! Wire-level DTOs for the REST surface, plus the chatbot's request-scoped
//! context snapshot and result envelope.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use taskhub_core::{AccountId, TaskBrief, TaskStatus};

// ============================================================================
// TASK REQUESTS
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CreateTaskRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<TaskStatus>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UpdateTaskRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<TaskStatus>,
}

// ============================================================================
// COMMENT REQUESTS
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CreateCommentRequest {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UpdateCommentRequest {
    #[serde(default)]
    pub content: Option<String>,
}

// ============================================================================
// CHATBOT TYPES
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ChatbotQueryRequest {
    #[serde(default)]
    pub query: Option<String>,
}

/// Classification of a chatbot response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum ResponseKind {
    AiResponse,
    TaskCount,
    TaskList,
    Help,
    Default,
    Error,
}

/// Result envelope returned by the chatbot for every processed query.
///
/// Internal processing errors are embedded here with `success = false`
/// and still travel over HTTP 200 (see routes/chatbot.rs).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ChatbotResult {
    pub success: bool,
    pub response: String,
    #[cfg_attr(feature = "openapi", schema(value_type = Object))]
    pub data: serde_json::Value,
    #[serde(rename = "type")]
    pub kind: ResponseKind,
}

impl ChatbotResult {
    /// Successful result of the given kind.
    pub fn ok(kind: ResponseKind, response: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            success: true,
            response: response.into(),
            data,
            kind,
        }
    }

    /// Error result carrying the error text as the response.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            response: message.into(),
            data: serde_json::json!({}),
            kind: ResponseKind::Error,
        }
    }
}

/// Account fields exposed to the chatbot context.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AccountInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Ephemeral, request-scoped summary of an account's tasks used to ground
/// chatbot responses. Never persisted.
///
/// Invariant: `task_count` equals the sum of `status_summary` values, and
/// `tasks` holds at most 10 entries ordered most-recent-first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ContextSnapshot {
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "uuid"))]
    pub account_id: AccountId,
    pub tasks: Vec<TaskBrief>,
    pub task_count: i64,
    pub status_summary: BTreeMap<String, i64>,
    pub account_info: AccountInfo,
}

impl ContextSnapshot {
    /// Empty snapshot for an account; the degraded fallback shape.
    pub fn empty(account_id: AccountId) -> Self {
        Self {
            account_id,
            tasks: Vec::new(),
            task_count: 0,
            status_summary: BTreeMap::new(),
            account_info: AccountInfo::default(),
        }
    }
}
