//! Groq provider (OpenAI-compatible chat completions)

mod chat;
mod client;
mod types;

pub use chat::GroqChatProvider;
pub use client::GroqClient;
