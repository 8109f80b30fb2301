//! Groq chat provider implementation

use super::client::GroqClient;
use super::types::{CompletionRequest, Message};
use crate::providers::invalid_response;
use crate::{ChatConfig, ChatMessage, ChatProvider};
use async_trait::async_trait;
use taskhub_core::CoreResult;

/// Groq chat provider using Llama models.
pub struct GroqChatProvider {
    client: GroqClient,
    model: String,
}

impl GroqChatProvider {
    /// Create a new Groq chat provider.
    ///
    /// # Arguments
    /// * `api_key` - Groq API key
    /// * `model` - Model name (e.g., "llama-3.3-70b-versatile")
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: GroqClient::new(api_key, 60),
            model: model.into(),
        }
    }

    /// Create provider with the default llama-3.3-70b-versatile model.
    pub fn with_default_model(api_key: impl Into<String>) -> Self {
        Self::new(api_key, "llama-3.3-70b-versatile")
    }
}

#[async_trait]
impl ChatProvider for GroqChatProvider {
    async fn complete(&self, messages: &[ChatMessage], config: &ChatConfig) -> CoreResult<String> {
        let request = CompletionRequest {
            model: self.model.clone(),
            messages: messages
                .iter()
                .map(|m| Message {
                    role: m.role.clone(),
                    content: m.content.clone(),
                })
                .collect(),
            max_tokens: Some(config.max_tokens),
            temperature: Some(config.temperature),
        };

        let response = self.client.chat(&request).await?;

        response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| invalid_response("groq", "No completion in response"))
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}

impl std::fmt::Debug for GroqChatProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroqChatProvider")
            .field("model", &self.model)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_model() {
        let provider = GroqChatProvider::with_default_model("key");
        assert_eq!(provider.model_id(), "llama-3.3-70b-versatile");
    }

    #[test]
    fn test_debug_redacts_key() {
        let client = GroqClient::new("secret-key", 60);
        let debug = format!("{:?}", client);
        assert!(!debug.contains("secret-key"));
        assert!(debug.contains("[REDACTED]"));
    }
}
