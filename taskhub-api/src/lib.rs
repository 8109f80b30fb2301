//! TaskHub API - REST API Layer
//!
//! This crate provides the HTTP layer for TaskHub: task and comment CRUD
//! scoped to authenticated accounts, plus a chatbot endpoint that answers
//! natural-language questions about an account's tasks. The chatbot builds
//! a context snapshot from PostgreSQL and either forwards it to an LLM
//! provider or falls back to keyword-based intent matching.

pub mod auth;
pub mod chatbot;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod types;
pub mod validation;

// Re-export commonly used types
pub use auth::{
    authenticate, generate_jwt_token, validate_jwt_token, AuthConfig, AuthContext, Claims,
};
pub use chatbot::{build_snapshot, classify, dispatch};
pub use config::{ApiConfig, ChatbotConfig};
pub use db::{DbClient, DbConfig};
pub use error::{ApiError, ApiResult, ErrorCode};
pub use middleware::{auth_middleware, check_account_access, AuthMiddlewareState};
pub use openapi::ApiDoc;
pub use routes::create_api_router;
pub use types::*;
