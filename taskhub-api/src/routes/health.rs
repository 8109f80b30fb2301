//! Health Check Endpoints
//!
//! Kubernetes-compatible probes plus a readiness report that names the
//! pieces an operator cares about: database connectivity, pool size,
//! and whether the chatbot is running with an LLM or keyword-only.
//!
//! No authentication required for health endpoints.

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

use crate::db::DbClient;

// ============================================================================
// TYPES
// ============================================================================

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct HealthResponse {
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HealthDetails>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct HealthDetails {
    pub database: DatabaseHealth,
    pub chatbot: ChatbotHealth,
    pub version: String,
    pub uptime_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DatabaseHealth {
    pub status: HealthStatus,
    /// Connections currently held by the pool.
    pub pool_size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Chatbot capability. Reported so operators can tell a keyword-only
/// deployment apart from one backed by an LLM without reading env vars.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ChatbotHealth {
    pub llm_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl ChatbotHealth {
    pub fn keyword_only() -> Self {
        Self {
            llm_enabled: false,
            model: None,
        }
    }

    pub fn llm(model: impl Into<String>) -> Self {
        Self {
            llm_enabled: true,
            model: Some(model.into()),
        }
    }
}

// ============================================================================
// STATE
// ============================================================================

#[derive(Clone)]
pub struct HealthState {
    pub db: DbClient,
    pub chatbot: ChatbotHealth,
    pub start_time: Instant,
}

impl HealthState {
    pub fn new(db: DbClient, chatbot: ChatbotHealth) -> Self {
        Self {
            db,
            chatbot,
            start_time: Instant::now(),
        }
    }
}

// ============================================================================
// HANDLERS
// ============================================================================

/// GET /health/ping - Simple pong response
#[utoipa::path(
    get,
    path = "/health/ping",
    tag = "Health",
    responses(
        (status = 200, description = "Service is responding", body = String),
    ),
)]
pub async fn ping() -> impl IntoResponse {
    (StatusCode::OK, "pong")
}

/// GET /health/live - Process liveness check
#[utoipa::path(
    get,
    path = "/health/live",
    tag = "Health",
    responses(
        (status = 200, description = "Process is alive", body = HealthResponse),
    ),
)]
pub async fn liveness() -> impl IntoResponse {
    let response = HealthResponse {
        status: HealthStatus::Healthy,
        message: Some("Process is alive".to_string()),
        details: None,
    };
    (StatusCode::OK, Json(response))
}

/// GET /health/ready - Readiness check (database connectivity)
#[utoipa::path(
    get,
    path = "/health/ready",
    tag = "Health",
    responses(
        (status = 200, description = "Service is ready", body = HealthResponse),
        (status = 503, description = "Service is not ready", body = HealthResponse),
    ),
)]
pub async fn readiness(State(state): State<Arc<HealthState>>) -> impl IntoResponse {
    let database = database_health(&state.db).await;
    let overall = database.status;

    let response = HealthResponse {
        status: overall,
        message: None,
        details: Some(HealthDetails {
            database,
            chatbot: state.chatbot.clone(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: state.start_time.elapsed().as_secs(),
        }),
    };

    let status_code = match overall {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(response))
}

async fn database_health(db: &DbClient) -> DatabaseHealth {
    let start = Instant::now();

    // A round trip validates pool connectivity, not just pool
    // construction.
    match db.ping().await {
        Ok(()) => DatabaseHealth {
            status: HealthStatus::Healthy,
            pool_size: db.pool_size(),
            latency_ms: Some(start.elapsed().as_millis() as u64),
            error: None,
        },
        Err(e) => DatabaseHealth {
            status: HealthStatus::Unhealthy,
            pool_size: db.pool_size(),
            latency_ms: None,
            error: Some(format!("Database check failed: {}", e.message)),
        },
    }
}

// ============================================================================
// ROUTER
// ============================================================================

/// Create health check router (no auth required)
pub fn create_router(db: DbClient, chatbot: ChatbotHealth) -> Router {
    let state = Arc::new(HealthState::new(db, chatbot));

    Router::new()
        .route("/ping", get(ping))
        .route("/live", get(liveness))
        .route("/ready", get(readiness))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_response_serialization() {
        let response = HealthResponse {
            status: HealthStatus::Healthy,
            message: Some("All systems operational".to_string()),
            details: None,
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"status\":\"healthy\""));
    }

    #[test]
    fn test_database_health_with_error() {
        let database = DatabaseHealth {
            status: HealthStatus::Unhealthy,
            pool_size: 0,
            latency_ms: None,
            error: Some("Connection refused".to_string()),
        };

        let json = serde_json::to_string(&database).unwrap();
        assert!(json.contains("\"status\":\"unhealthy\""));
        assert!(json.contains("\"pool_size\":0"));
        assert!(json.contains("Connection refused"));
    }

    #[test]
    fn test_chatbot_health_reports_capability() {
        let json = serde_json::to_string(&ChatbotHealth::keyword_only()).unwrap();
        assert!(json.contains("\"llm_enabled\":false"));
        assert!(!json.contains("model"));

        let json = serde_json::to_string(&ChatbotHealth::llm("llama-3.3-70b-versatile")).unwrap();
        assert!(json.contains("\"llm_enabled\":true"));
        assert!(json.contains("llama-3.3-70b-versatile"));
    }

    #[tokio::test]
    async fn test_readiness_reports_chatbot_and_pool() {
        use axum::body::Body;
        use axum::http::Request;
        use tower::ServiceExt;

        // Lazy pool, unreachable database: readiness must still answer
        // with a full details block.
        let db = DbClient::from_config(&crate::db::DbConfig::default()).unwrap();
        let router = create_router(db, ChatbotHealth::llm("llama-3.3-70b-versatile"));

        let response = router
            .oneshot(Request::builder().uri("/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        let details = &body["details"];
        assert_eq!(details["chatbot"]["llm_enabled"], true);
        assert_eq!(details["chatbot"]["model"], "llama-3.3-70b-versatile");
        assert!(details["database"]["pool_size"].is_number());
    }
}
