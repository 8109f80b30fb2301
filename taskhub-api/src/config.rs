//! API Configuration Module
//!
//! Configuration for CORS and the chatbot's LLM capability. Everything is
//! loaded from environment variables with sensible defaults for
//! development.

// ============================================================================
// API CONFIGURATION
// ============================================================================

/// API configuration for CORS and server binding.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Allowed CORS origins (comma-separated in env var).
    /// Empty means allow all origins (dev mode).
    pub cors_origins: Vec<String>,

    /// Max age for CORS preflight cache in seconds.
    pub cors_max_age_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            // CORS defaults: permissive for development
            cors_origins: Vec::new(), // Empty = allow all
            cors_max_age_secs: 86400, // 24 hours
        }
    }
}

impl ApiConfig {
    /// Create ApiConfig from environment variables.
    ///
    /// Environment variables:
    /// - `TASKHUB_CORS_ORIGINS`: Comma-separated allowed origins (empty = allow all)
    /// - `TASKHUB_CORS_MAX_AGE_SECS`: Preflight cache duration (default: 86400)
    pub fn from_env() -> Self {
        let cors_origins = std::env::var("TASKHUB_CORS_ORIGINS")
            .ok()
            .map(|s| {
                s.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let cors_max_age_secs = std::env::var("TASKHUB_CORS_MAX_AGE_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(86400);

        Self {
            cors_origins,
            cors_max_age_secs,
        }
    }
}

// ============================================================================
// CHATBOT CONFIGURATION
// ============================================================================

/// Chatbot LLM capability, resolved once at startup.
///
/// `llm_enabled` is decided here and injected into the dispatcher; the
/// dispatcher never probes the environment at request time.
#[derive(Debug, Clone)]
pub struct ChatbotConfig {
    /// Whether the external LLM path is available.
    pub llm_enabled: bool,

    /// Groq API key (empty when disabled).
    pub api_key: String,

    /// Model name forwarded to the provider.
    pub model: String,
}

impl ChatbotConfig {
    /// Create ChatbotConfig from environment variables.
    ///
    /// Environment variables:
    /// - `GROQ_API_KEY`: API key; presence of a non-empty value enables the LLM path
    /// - `TASKHUB_CHATBOT_MODEL`: Model name (default: "llama-3.3-70b-versatile")
    pub fn from_env() -> Self {
        let api_key = std::env::var("GROQ_API_KEY").unwrap_or_default();
        let llm_enabled = !api_key.trim().is_empty();

        let model = std::env::var("TASKHUB_CHATBOT_MODEL")
            .unwrap_or_else(|_| "llama-3.3-70b-versatile".to_string());

        Self {
            llm_enabled,
            api_key,
            model,
        }
    }

    /// A disabled configuration (keyword fallback only).
    pub fn disabled() -> Self {
        Self {
            llm_enabled: false,
            api_key: String::new(),
            model: "llama-3.3-70b-versatile".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_api_config() {
        let config = ApiConfig::default();
        assert!(config.cors_origins.is_empty());
        assert_eq!(config.cors_max_age_secs, 86400);
    }

    #[test]
    fn test_disabled_chatbot_config() {
        let config = ChatbotConfig::disabled();
        assert!(!config.llm_enabled);
        assert!(config.api_key.is_empty());
    }
}
