//! Task REST API Routes
//!
//! Axum route handlers for task CRUD, nested under
//! /accounts/{account_id}/tasks. Deletion is a soft delete via the
//! `active` flag.

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
    types::{CreateTaskRequest, UpdateTaskRequest},
    validation::ValidateNonEmpty,
};

// ============================================================================
// SHARED STATE
// ============================================================================

/// Shared application state for task routes.
#[derive(Clone)]
pub struct TaskState {
    pub db: DbClient,
}

impl TaskState {
    pub fn new(db: DbClient) -> Self {
        Self { db }
    }
}

// ============================================================================
// ROUTE HANDLERS
// ============================================================================

/// POST /accounts/{account_id}/tasks - Create a task
#[utoipa::path(
    post,
    path = "/accounts/{account_id}/tasks",
    tag = "Tasks",
    request_body = CreateTaskRequest,
    responses(
        (status = 201, description = "Task created successfully", body = taskhub_core::Task),
        (status = 400, description = "Missing title", body = ApiError),
        (status = 401, description = "Unauthorized", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_task(
    State(state): State<Arc<TaskState>>,
    Extension(ctx): Extension<AuthContext>,
    Path(account_id): Path<Uuid>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<impl IntoResponse> {
    check_account_access(&ctx, account_id)?;
    req.title.validate_non_empty("title")?;

    let task = state.db.task_create(&req, account_id).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// GET /accounts/{account_id}/tasks - List active tasks, most recent first
#[utoipa::path(
    get,
    path = "/accounts/{account_id}/tasks",
    tag = "Tasks",
    responses(
        (status = 200, description = "Active tasks", body = Vec<taskhub_core::Task>),
        (status = 401, description = "Unauthorized", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_tasks(
    State(state): State<Arc<TaskState>>,
    Extension(ctx): Extension<AuthContext>,
    Path(account_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    check_account_access(&ctx, account_id)?;

    let tasks = state.db.task_list(account_id).await?;
    Ok(Json(tasks))
}

/// GET /accounts/{account_id}/tasks/{task_id} - Get a single task
#[utoipa::path(
    get,
    path = "/accounts/{account_id}/tasks/{task_id}",
    tag = "Tasks",
    responses(
        (status = 200, description = "Task", body = taskhub_core::Task),
        (status = 404, description = "Task not found", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_task(
    State(state): State<Arc<TaskState>>,
    Extension(ctx): Extension<AuthContext>,
    Path((account_id, task_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<impl IntoResponse> {
    check_account_access(&ctx, account_id)?;

    let task = state
        .db
        .task_get(task_id, account_id)
        .await?
        .ok_or_else(|| ApiError::task_not_found(task_id))?;

    Ok(Json(task))
}

/// PATCH /accounts/{account_id}/tasks/{task_id} - Update a task
#[utoipa::path(
    patch,
    path = "/accounts/{account_id}/tasks/{task_id}",
    tag = "Tasks",
    request_body = UpdateTaskRequest,
    responses(
        (status = 200, description = "Updated task", body = taskhub_core::Task),
        (status = 404, description = "Task not found", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_task(
    State(state): State<Arc<TaskState>>,
    Extension(ctx): Extension<AuthContext>,
    Path((account_id, task_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<impl IntoResponse> {
    check_account_access(&ctx, account_id)?;

    if let Some(title) = &req.title {
        title.validate_non_empty("title")?;
    }

    let task = state
        .db
        .task_update(task_id, account_id, &req)
        .await?
        .ok_or_else(|| ApiError::task_not_found(task_id))?;

    Ok(Json(task))
}

/// DELETE /accounts/{account_id}/tasks/{task_id} - Soft-delete a task
///
/// Idempotent: deleting an already-deleted task still returns 204.
#[utoipa::path(
    delete,
    path = "/accounts/{account_id}/tasks/{task_id}",
    tag = "Tasks",
    responses(
        (status = 204, description = "Task deleted (or already absent)"),
        (status = 401, description = "Unauthorized", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_task(
    State(state): State<Arc<TaskState>>,
    Extension(ctx): Extension<AuthContext>,
    Path((account_id, task_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<impl IntoResponse> {
    check_account_access(&ctx, account_id)?;

    state.db.task_delete(task_id, account_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// ROUTER SETUP
// ============================================================================

/// Create the task routes router, mounted under /accounts/:account_id/tasks.
pub fn create_router(db: DbClient) -> axum::Router {
    let state = Arc::new(TaskState::new(db));

    axum::Router::new()
        .route("/", axum::routing::post(create_task))
        .route("/", axum::routing::get(list_tasks))
        .route("/:task_id", axum::routing::get(get_task))
        .route("/:task_id", axum::routing::patch(update_task))
        .route("/:task_id", axum::routing::delete(delete_task))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskhub_core::TaskStatus;

    #[test]
    fn test_create_task_request_validation() {
        let req = CreateTaskRequest {
            title: "".to_string(),
            description: None,
            status: None,
        };
        assert!(req.title.validate_non_empty("title").is_err());
    }

    #[test]
    fn test_create_task_request_status_parsing() {
        let req: CreateTaskRequest =
            serde_json::from_str(r#"{"title": "a", "status": "in_progress"}"#).unwrap();
        assert_eq!(req.status, Some(TaskStatus::InProgress));
    }

    #[test]
    fn test_update_task_request_defaults() {
        let req: UpdateTaskRequest = serde_json::from_str("{}").unwrap();
        assert!(req.title.is_none() && req.description.is_none() && req.status.is_none());
    }
}
