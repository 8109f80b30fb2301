//! Groq HTTP transport
//!
//! Thin wrapper over reqwest for the chat completions endpoint, with
//! client-side pacing so bursts of chatbot traffic stay under the free
//! tier's requests-per-minute cap.

use super::types::{ApiError, CompletionRequest, CompletionResponse};
use crate::providers::{invalid_response, rate_limited, request_failed};
use reqwest::{Client, StatusCode};
use std::time::{Duration, Instant};
use taskhub_core::CoreResult;
use tokio::sync::Mutex;

const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// HTTP client for the Groq chat completions API.
pub struct GroqClient {
    http: Client,
    api_key: String,
    base_url: String,
    min_interval: Duration,
    // Completion time of the most recent request; requests serialize on
    // this lock so the interval holds across concurrent callers.
    last_sent: Mutex<Option<Instant>>,
}

impl GroqClient {
    /// Create a client paced to at most `requests_per_minute` calls.
    pub fn new(api_key: impl Into<String>, requests_per_minute: u32) -> Self {
        let rpm = requests_per_minute.max(1) as u64;

        Self {
            http: Client::new(),
            api_key: api_key.into(),
            base_url: GROQ_BASE_URL.to_string(),
            min_interval: Duration::from_millis(60_000 / rpm),
            last_sent: Mutex::new(None),
        }
    }

    /// Point the client at a different server. Used by tests.
    #[cfg(test)]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Send a chat completion request.
    pub async fn chat(&self, request: &CompletionRequest) -> CoreResult<CompletionResponse> {
        self.pace().await;

        let url = format!("{}/chat/completions", self.base_url);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| request_failed("groq", 0, format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            return response
                .json()
                .await
                .map_err(|e| invalid_response("groq", format!("Failed to parse response: {}", e)));
        }

        let retry_after_ms = parse_retry_after_ms(response.headers()).unwrap_or(0);
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        // Groq wraps errors in an OpenAI-style envelope; fall back to
        // the raw body when it does not parse.
        let message = serde_json::from_str::<ApiError>(&body)
            .map(|api_error| api_error.error.message)
            .unwrap_or(body);

        Err(match status {
            StatusCode::TOO_MANY_REQUESTS => rate_limited("groq", retry_after_ms),
            _ => request_failed("groq", status.as_u16() as i32, message),
        })
    }

    async fn pace(&self) {
        let mut last_sent = self.last_sent.lock().await;
        if let Some(last) = *last_sent {
            let elapsed = last.elapsed();
            if elapsed < self.min_interval {
                tokio::time::sleep(self.min_interval - elapsed).await;
            }
        }
        *last_sent = Some(Instant::now());
    }
}

fn parse_retry_after_ms(headers: &reqwest::header::HeaderMap) -> Option<i64> {
    headers
        .get("retry-after")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<f64>().ok())
        .map(|seconds| (seconds * 1000.0) as i64)
}

impl std::fmt::Debug for GroqClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroqClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("min_interval", &self.min_interval)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderMap, HeaderValue};

    #[test]
    fn test_retry_after_seconds_to_ms() {
        let mut headers = HeaderMap::new();
        headers.insert("retry-after", HeaderValue::from_static("2.5"));
        assert_eq!(parse_retry_after_ms(&headers), Some(2500));
    }

    #[test]
    fn test_retry_after_missing_or_junk() {
        assert_eq!(parse_retry_after_ms(&HeaderMap::new()), None);

        let mut headers = HeaderMap::new();
        headers.insert("retry-after", HeaderValue::from_static("soon"));
        assert_eq!(parse_retry_after_ms(&headers), None);
    }

    #[test]
    fn test_min_interval_from_rpm() {
        let client = GroqClient::new("key", 120);
        assert_eq!(client.min_interval, Duration::from_millis(500));

        // Zero is clamped rather than dividing by it.
        let client = GroqClient::new("key", 0);
        assert_eq!(client.min_interval, Duration::from_millis(60_000));
    }

    #[tokio::test]
    async fn test_chat_error_on_unreachable_server() {
        let client = GroqClient::new("key", 60).with_base_url("http://127.0.0.1:1");
        let request = CompletionRequest {
            model: "llama-3.3-70b-versatile".to_string(),
            messages: vec![],
            max_tokens: None,
            temperature: None,
        };
        let err = client.chat(&request).await.unwrap_err();
        assert!(err.to_string().contains("groq"));
    }
}
