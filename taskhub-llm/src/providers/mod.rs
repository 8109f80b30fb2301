//! LLM provider implementations
//!
//! Concrete implementations of the ChatProvider trait. Groq exposes an
//! OpenAI-compatible chat/completions API, so its wire types mirror that
//! schema.

use taskhub_core::{CoreError, LlmError};

pub mod groq;

pub use groq::{GroqChatProvider, GroqClient};

/// Build a RequestFailed error for the given provider.
pub fn request_failed(provider: &str, status: i32, message: impl Into<String>) -> CoreError {
    CoreError::Llm(LlmError::RequestFailed {
        provider: provider.to_string(),
        status,
        message: message.into(),
    })
}

/// Build a RateLimited error for the given provider.
pub fn rate_limited(provider: &str, retry_after_ms: i64) -> CoreError {
    CoreError::Llm(LlmError::RateLimited {
        provider: provider.to_string(),
        retry_after_ms,
    })
}

/// Build an InvalidResponse error for the given provider.
pub fn invalid_response(provider: &str, reason: impl Into<String>) -> CoreError {
    CoreError::Llm(LlmError::InvalidResponse {
        provider: provider.to_string(),
        reason: reason.into(),
    })
}
