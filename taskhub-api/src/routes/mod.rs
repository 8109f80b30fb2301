//! REST API Routes Module
//!
//! Route handlers organized by resource:
//! - Task CRUD under /accounts/:account_id/tasks
//! - Comment CRUD under /accounts/:account_id/tasks/:task_id/comments
//! - Chatbot query endpoint at /chatbot/query
//! - Health check endpoints (Kubernetes-compatible)
//! - OpenAPI spec at /openapi.json
//! - CORS support for browser-based clients

pub mod chatbot;
pub mod comment;
pub mod health;
pub mod task;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use taskhub_llm::ChatProvider;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::auth::AuthConfig;
use crate::config::{ApiConfig, ChatbotConfig};
use crate::db::DbClient;
use crate::middleware::{auth_middleware, AuthMiddlewareState};
use crate::openapi::ApiDoc;

// Re-export route creation functions for convenience
pub use chatbot::create_router as chatbot_router;
pub use comment::create_router as comment_router;
pub use health::create_router as health_router;
pub use task::create_router as task_router;

// ============================================================================
// OPENAPI ENDPOINTS
// ============================================================================

/// Handler for /openapi.json endpoint.
async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

// ============================================================================
// ROUTER SETUP
// ============================================================================

/// Create the complete API router.
///
/// - Task and comment CRUD plus the chatbot endpoint are protected by
///   JWT auth middleware.
/// - Health checks and the OpenAPI spec are public.
///
/// # Middleware Order (outer to inner)
/// 1. CORS (outermost) - handles preflight requests
/// 2. Trace - request/response logging
/// 3. Auth (innermost, protected routes only) - validates credentials
pub fn create_api_router(
    db: DbClient,
    api_config: &ApiConfig,
    auth_config: AuthConfig,
    chatbot_config: Arc<ChatbotConfig>,
    llm: Option<Arc<dyn ChatProvider>>,
) -> Router {
    let auth_state = AuthMiddlewareState::new(auth_config);

    // Capability snapshot for the readiness report, taken before the
    // config moves into the chatbot router.
    let chatbot_health = if chatbot_config.llm_enabled {
        health::ChatbotHealth::llm(chatbot_config.model.clone())
    } else {
        health::ChatbotHealth::keyword_only()
    };

    // Comment routes live under their parent task path. The task router
    // keeps its own "/" and "/:task_id" routes alongside the nest.
    let task_routes = task::create_router(db.clone())
        .nest("/:task_id/comments", comment::create_router(db.clone()));

    let protected = Router::new()
        .nest("/accounts/:account_id/tasks", task_routes)
        .nest(
            "/chatbot",
            chatbot::create_router(db.clone(), chatbot_config, llm),
        )
        .layer(from_fn_with_state(auth_state, auth_middleware));

    let router = Router::new()
        .merge(protected)
        // Health checks (no auth required)
        .nest("/health", health::create_router(db, chatbot_health))
        // OpenAPI spec
        .route("/openapi.json", get(openapi_json));

    let cors = build_cors_layer(api_config);

    router
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

// ============================================================================
// CORS LAYER
// ============================================================================

/// Build the CORS layer from ApiConfig.
///
/// In development mode (empty origins), allows all origins.
/// In production mode, only allows configured origins.
fn build_cors_layer(config: &ApiConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(config.cors_max_age_secs));

    if config.cors_origins.is_empty() {
        tracing::info!("CORS: Development mode - allowing all origins");
        cors.allow_origin(Any).allow_headers(Any)
    } else {
        tracing::info!(
            "CORS: Production mode - allowing origins: {:?}",
            config.cors_origins
        );
        let origins: Vec<HeaderValue> = config
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors.allow_origin(origins)
    }
}
