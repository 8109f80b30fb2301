//! Chatbot REST API Routes
//!
//! POST /chatbot/query. Internal processing errors are embedded in a
//! success=false envelope returned with HTTP 200 so the chat UI always
//! receives well-formed JSON; only a missing/empty query is a 400. This
//! mirrors observed behavior and is deliberately inconsistent with the
//! comment/task endpoints, which use standard status codes.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde_json::json;
use std::sync::Arc;
use taskhub_llm::ChatProvider;

use crate::{
    auth::AuthContext,
    chatbot::{build_snapshot, dispatch},
    config::ChatbotConfig,
    db::DbClient,
    types::{ChatbotQueryRequest, ChatbotResult},
};

// ============================================================================
// SHARED STATE
// ============================================================================

/// Shared application state for chatbot routes.
#[derive(Clone)]
pub struct ChatbotState {
    pub db: DbClient,
    pub config: Arc<ChatbotConfig>,
    pub llm: Option<Arc<dyn ChatProvider>>,
}

impl ChatbotState {
    pub fn new(
        db: DbClient,
        config: Arc<ChatbotConfig>,
        llm: Option<Arc<dyn ChatProvider>>,
    ) -> Self {
        Self { db, config, llm }
    }
}

// ============================================================================
// ROUTE HANDLERS
// ============================================================================

fn bad_request(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "success": false,
            "response": message,
            "data": {},
        })),
    )
        .into_response()
}

/// POST /chatbot/query - Process a natural-language query
#[utoipa::path(
    post,
    path = "/chatbot/query",
    tag = "Chatbot",
    request_body = ChatbotQueryRequest,
    responses(
        (status = 200, description = "Processed query (including internally-handled errors)", body = ChatbotResult),
        (status = 400, description = "Missing or empty query"),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn query(
    State(state): State<Arc<ChatbotState>>,
    Extension(ctx): Extension<AuthContext>,
    body: Result<Json<ChatbotQueryRequest>, JsonRejection>,
) -> Response {
    // An absent or malformed body gets the same envelope as a missing
    // query field, not axum's plain-text rejection.
    let req = match body {
        Ok(Json(req)) => req,
        Err(_) => return bad_request("Please provide a query in your request."),
    };

    let query = match req.query.as_deref() {
        None => return bad_request("Please provide a query in your request."),
        Some(raw) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return bad_request("Query cannot be empty.");
            }
            trimmed.to_string()
        }
    };

    // Aggregation never fails; dispatch errors become a success=false
    // envelope, still carried over HTTP 200.
    let snapshot = build_snapshot(&state.db, ctx.account_id).await;

    let result = match dispatch(&query, &snapshot, state.llm.as_ref(), &state.config).await {
        Ok(result) => result,
        Err(e) => {
            tracing::error!(account_id = %ctx.account_id, error = %e, "Chatbot query failed");
            ChatbotResult::error(format!("Error processing query: {}", e.message))
        }
    };

    (StatusCode::OK, Json(result)).into_response()
}

// ============================================================================
// ROUTER SETUP
// ============================================================================

/// Create the chatbot routes router, mounted under /chatbot.
pub fn create_router(
    db: DbClient,
    config: Arc<ChatbotConfig>,
    llm: Option<Arc<dyn ChatProvider>>,
) -> axum::Router {
    let state = Arc::new(ChatbotState::new(db, config, llm));

    axum::Router::new()
        .route("/query", axum::routing::post(query))
        .with_state(state)
}
