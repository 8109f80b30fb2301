//! Comment REST API Routes
//!
//! Axum route handlers for comment CRUD, nested under
//! /accounts/{account_id}/tasks/{task_id}/comments.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    auth::AuthContext,
    db::DbClient,
    error::{ApiError, ApiResult},
    middleware::check_account_access,
    types::{CreateCommentRequest, UpdateCommentRequest},
    validation::ValidateNonEmpty,
};

// ============================================================================
// SHARED STATE
// ============================================================================

/// Shared application state for comment routes.
#[derive(Clone)]
pub struct CommentState {
    pub db: DbClient,
}

impl CommentState {
    pub fn new(db: DbClient) -> Self {
        Self { db }
    }
}

// ============================================================================
// ROUTE HANDLERS
// ============================================================================

/// POST /accounts/{account_id}/tasks/{task_id}/comments - Create a comment
#[utoipa::path(
    post,
    path = "/accounts/{account_id}/tasks/{task_id}/comments",
    tag = "Comments",
    request_body = CreateCommentRequest,
    responses(
        (status = 201, description = "Comment created successfully", body = taskhub_core::Comment),
        (status = 400, description = "Missing content", body = ApiError),
        (status = 401, description = "Unauthorized", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_comment(
    State(state): State<Arc<CommentState>>,
    Extension(ctx): Extension<AuthContext>,
    Path((account_id, task_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<CreateCommentRequest>,
) -> ApiResult<impl IntoResponse> {
    check_account_access(&ctx, account_id)?;
    req.content.validate_non_empty("content")?;

    let content = req.content.unwrap_or_default();
    let comment = state.db.comment_create(task_id, account_id, &content).await?;

    Ok((StatusCode::CREATED, Json(comment)))
}

/// GET /accounts/{account_id}/tasks/{task_id}/comments - List comments
#[utoipa::path(
    get,
    path = "/accounts/{account_id}/tasks/{task_id}/comments",
    tag = "Comments",
    responses(
        (status = 200, description = "Comments, most recent first", body = Vec<taskhub_core::Comment>),
        (status = 401, description = "Unauthorized", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_comments(
    State(state): State<Arc<CommentState>>,
    Extension(ctx): Extension<AuthContext>,
    Path((account_id, task_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<impl IntoResponse> {
    check_account_access(&ctx, account_id)?;

    let comments = state.db.comment_list(task_id, account_id).await?;
    Ok(Json(comments))
}

/// PATCH /accounts/{account_id}/tasks/{task_id}/comments/{comment_id} - Update a comment
#[utoipa::path(
    patch,
    path = "/accounts/{account_id}/tasks/{task_id}/comments/{comment_id}",
    tag = "Comments",
    request_body = UpdateCommentRequest,
    responses(
        (status = 200, description = "Updated comment", body = taskhub_core::Comment),
        (status = 400, description = "Missing content", body = ApiError),
        (status = 404, description = "Comment not found", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_comment(
    State(state): State<Arc<CommentState>>,
    Extension(ctx): Extension<AuthContext>,
    Path((account_id, task_id, comment_id)): Path<(Uuid, Uuid, Uuid)>,
    Json(req): Json<UpdateCommentRequest>,
) -> ApiResult<impl IntoResponse> {
    check_account_access(&ctx, account_id)?;
    req.content.validate_non_empty("content")?;

    let content = req.content.unwrap_or_default();
    let comment = state
        .db
        .comment_update(comment_id, task_id, account_id, &content)
        .await?
        .ok_or_else(|| ApiError::comment_not_found(comment_id))?;

    Ok(Json(comment))
}

/// DELETE /accounts/{account_id}/tasks/{task_id}/comments/{comment_id} - Delete a comment
///
/// Idempotent: deleting a non-existent comment still returns 204.
#[utoipa::path(
    delete,
    path = "/accounts/{account_id}/tasks/{task_id}/comments/{comment_id}",
    tag = "Comments",
    responses(
        (status = 204, description = "Comment deleted (or already absent)"),
        (status = 401, description = "Unauthorized", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_comment(
    State(state): State<Arc<CommentState>>,
    Extension(ctx): Extension<AuthContext>,
    Path((account_id, task_id, comment_id)): Path<(Uuid, Uuid, Uuid)>,
) -> ApiResult<impl IntoResponse> {
    check_account_access(&ctx, account_id)?;

    state
        .db
        .comment_delete(comment_id, task_id, account_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// ROUTER SETUP
// ============================================================================

/// Create the comment routes router, mounted under
/// /accounts/:account_id/tasks/:task_id/comments.
pub fn create_router(db: DbClient) -> axum::Router {
    let state = Arc::new(CommentState::new(db));

    axum::Router::new()
        .route("/", axum::routing::post(create_comment))
        .route("/", axum::routing::get(list_comments))
        .route("/:comment_id", axum::routing::patch(update_comment))
        .route("/:comment_id", axum::routing::delete(delete_comment))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_comment_request_validation() {
        let req = CreateCommentRequest { content: None };
        assert!(req.content.validate_non_empty("content").is_err());

        let req = CreateCommentRequest {
            content: Some("  ".to_string()),
        };
        assert!(req.content.validate_non_empty("content").is_err());

        let req = CreateCommentRequest {
            content: Some("looks good".to_string()),
        };
        assert!(req.content.validate_non_empty("content").is_ok());
    }

    #[test]
    fn test_update_comment_request_deserialization() {
        let req: UpdateCommentRequest = serde_json::from_str("{}").unwrap();
        assert!(req.content.is_none());

        let req: UpdateCommentRequest =
            serde_json::from_str(r#"{"content": "revised"}"#).unwrap();
        assert_eq!(req.content.as_deref(), Some("revised"));
    }
}
