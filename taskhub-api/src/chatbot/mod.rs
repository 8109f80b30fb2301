//! Chatbot core: context assembly and response dispatch
//!
//! `context` builds the request-scoped snapshot of an account's tasks;
//! `dispatcher` turns a free-text query plus that snapshot into a
//! ChatbotResult, via the LLM provider when configured or the keyword
//! fallback otherwise.

pub mod context;
pub mod dispatcher;

pub use context::build_snapshot;
pub use dispatcher::{classify, dispatch};
