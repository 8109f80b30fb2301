//! Taskhub LLM - Chat Provider Abstraction
//!
//! Provider-agnostic trait for chat completions. The chatbot dispatcher
//! talks to this trait only; concrete providers live under `providers/`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use taskhub_core::CoreResult;

pub mod providers;

pub use providers::groq::{GroqChatProvider, GroqClient};

// ============================================================================
// CHAT PROVIDER TRAIT
// ============================================================================

/// A single message in a chat conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// "system", "user" or "assistant"
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Sampling configuration for a chat completion request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Maximum tokens in the completion output
    pub max_tokens: i32,
    /// Sampling temperature
    pub temperature: f32,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            max_tokens: 500,
            temperature: 0.7,
        }
    }
}

/// Trait for chat completion providers.
/// Implementations must be thread-safe (Send + Sync).
///
/// # Example
/// ```ignore
/// let provider = GroqChatProvider::with_default_model(api_key);
/// let reply = provider
///     .complete(&[ChatMessage::user("hello")], &ChatConfig::default())
///     .await?;
/// ```
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Run a chat completion over the given messages.
    ///
    /// # Returns
    /// * `Ok(String)` - The assistant's reply text
    /// * `Err(CoreError::Llm)` - If the request fails
    async fn complete(&self, messages: &[ChatMessage], config: &ChatConfig) -> CoreResult<String>;

    /// Model identifier this provider completes with.
    fn model_id(&self) -> &str;
}

// ============================================================================
// MOCK PROVIDER (for tests)
// ============================================================================

/// Mock chat provider for testing.
/// Returns a canned reply, or a fixed error when constructed as failing.
#[derive(Debug, Clone)]
pub struct MockChatProvider {
    reply: String,
    fail: bool,
}

impl MockChatProvider {
    /// Create a mock provider that replies with the given text.
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            fail: false,
        }
    }

    /// Create a mock provider whose every completion fails.
    pub fn failing() -> Self {
        Self {
            reply: String::new(),
            fail: true,
        }
    }
}

#[async_trait]
impl ChatProvider for MockChatProvider {
    async fn complete(&self, _messages: &[ChatMessage], _config: &ChatConfig) -> CoreResult<String> {
        if self.fail {
            return Err(providers::request_failed("mock", 500, "mock failure"));
        }
        Ok(self.reply.clone())
    }

    fn model_id(&self) -> &str {
        "mock-model"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskhub_core::CoreError;

    #[tokio::test]
    async fn test_mock_provider_replies() {
        let provider = MockChatProvider::new("hello back");
        let reply = provider
            .complete(&[ChatMessage::user("hello")], &ChatConfig::default())
            .await
            .unwrap();
        assert_eq!(reply, "hello back");
    }

    #[tokio::test]
    async fn test_mock_provider_failure() {
        let provider = MockChatProvider::failing();
        let err = provider
            .complete(&[ChatMessage::user("hello")], &ChatConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Llm(_)));
    }

    #[test]
    fn test_message_constructors() {
        assert_eq!(ChatMessage::system("s").role, "system");
        assert_eq!(ChatMessage::user("u").role, "user");
    }

    #[test]
    fn test_default_config() {
        let config = ChatConfig::default();
        assert_eq!(config.max_tokens, 500);
        assert!((config.temperature - 0.7).abs() < f32::EPSILON);
    }
}
