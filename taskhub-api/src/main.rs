//! TaskHub API Server Entry Point
//!
//! Bootstraps configuration, connects the PostgreSQL pool, wires the
//! optional LLM provider, and starts the Axum HTTP server.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use taskhub_api::{
    create_api_router, ApiConfig, ApiError, ApiResult, AuthConfig, ChatbotConfig, DbClient,
    DbConfig,
};
use taskhub_llm::{providers::GroqChatProvider, ChatProvider};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> ApiResult<()> {
    init_tracing()?;

    let db_config = DbConfig::from_env();
    let db = DbClient::from_config(&db_config)?;

    let api_config = ApiConfig::from_env();
    let auth_config = AuthConfig::from_env();
    let chatbot_config = Arc::new(ChatbotConfig::from_env());

    let llm: Option<Arc<dyn ChatProvider>> = if chatbot_config.llm_enabled {
        let provider =
            GroqChatProvider::new(chatbot_config.api_key.clone(), chatbot_config.model.clone());
        tracing::info!(model = %chatbot_config.model, "LLM provider enabled");
        Some(Arc::new(provider))
    } else {
        tracing::info!("No LLM API key configured, chatbot will use keyword fallback only");
        None
    };

    let app: Router = create_api_router(db, &api_config, auth_config, chatbot_config, llm);

    let addr = resolve_bind_addr()?;
    tracing::info!(%addr, "Starting TaskHub API server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to bind {}: {}", addr, e)))?;

    let server = axum::serve(listener, app);
    tokio::select! {
        result = server => {
            result.map_err(|e| ApiError::internal_error(format!("Server error: {}", e)))?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}

fn init_tracing() -> ApiResult<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("taskhub_api=debug,tower_http=debug,info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .map_err(|e| ApiError::internal_error(format!("Failed to init subscriber: {}", e)))
}

fn resolve_bind_addr() -> ApiResult<SocketAddr> {
    let host = std::env::var("TASKHUB_API_BIND").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port_str = std::env::var("PORT")
        .ok()
        .or_else(|| std::env::var("TASKHUB_API_PORT").ok())
        .unwrap_or_else(|| "3000".to_string());
    let port = port_str
        .parse::<u16>()
        .map_err(|_| ApiError::invalid_input(format!("Invalid port value: {}", port_str)))?;

    let addr = format!("{}:{}", host, port);
    addr.parse::<SocketAddr>()
        .map_err(|e| ApiError::invalid_input(format!("Invalid bind address {}: {}", addr, e)))
}
