//! Chatbot Dispatcher
//!
//! Given a free-text query and a context snapshot, produce a
//! ChatbotResult. When an LLM provider is configured the query is
//! forwarded with the snapshot embedded in the system prompt; on any
//! provider failure (or when disabled) the query falls through to a
//! deterministic keyword classifier.
//!
//! The keyword path is an ordered list of (keywords, handler) pairs
//! evaluated in fixed precedence order; first match wins. New intents are
//! added by extending the table, not the control flow.

use crate::config::ChatbotConfig;
use crate::error::ApiResult;
use crate::types::{ChatbotResult, ContextSnapshot, ResponseKind};
use serde_json::json;
use std::sync::Arc;
use taskhub_llm::{ChatConfig, ChatMessage, ChatProvider};

/// Number of tasks shown in the fallback task list.
const LIST_LIMIT: usize = 5;

/// Description truncation length in the system prompt.
const PROMPT_DESCRIPTION_CHARS: usize = 50;

/// Fixed reply when a task list is requested but no tasks exist.
pub const EMPTY_STATE_MESSAGE: &str =
    "You don't have any tasks yet. Would you like to create one?";

/// Fixed capability description for "help" queries.
const HELP_MESSAGE: &str = "**I can help you with:**\n\n\
**Task management:**\n\
- \"How many tasks do I have?\"\n\
- \"Show me my tasks\"\n\
- \"What's my task status?\"\n\n\
**General questions:**\n\
- Ask me anything about your tasks\n\n\
**Tip:** Just ask in natural language and I'll do my best to help!";

/// Fixed reply when no intent matches.
const DEFAULT_MESSAGE: &str = "I'm here to help! You can ask me about your tasks, \
account info, or type 'help' to see what I can do. \
(AI-powered responses are available when the Groq API is configured)";

// ============================================================================
// DISPATCH
// ============================================================================

/// Dispatch a query against a snapshot.
///
/// Stateless: every invocation is independent. Errors surface as
/// `ApiResult::Err` and are mapped to a `success=false` envelope at the
/// HTTP boundary.
pub async fn dispatch(
    query: &str,
    snapshot: &ContextSnapshot,
    llm: Option<&Arc<dyn ChatProvider>>,
    config: &ChatbotConfig,
) -> ApiResult<ChatbotResult> {
    if config.llm_enabled {
        if let Some(provider) = llm {
            match forward_to_llm(query, snapshot, provider.as_ref()).await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    // No retry of the external call; fall back to keywords.
                    tracing::warn!(error = %e, "LLM call failed, using keyword fallback");
                }
            }
        }
    }

    classify(query, snapshot)
}

// ============================================================================
// LLM PATH
// ============================================================================

async fn forward_to_llm(
    query: &str,
    snapshot: &ContextSnapshot,
    provider: &dyn ChatProvider,
) -> ApiResult<ChatbotResult> {
    let messages = [
        ChatMessage::system(build_system_prompt(snapshot)),
        ChatMessage::user(query),
    ];

    let config = ChatConfig {
        max_tokens: 500,
        temperature: 0.7,
    };

    let reply = provider.complete(&messages, &config).await?;

    Ok(ChatbotResult::ok(
        ResponseKind::AiResponse,
        reply,
        json!({
            "context_used": true,
            "task_count": snapshot.task_count,
            "model": provider.model_id(),
        }),
    ))
}

/// Build the system prompt embedding the snapshot.
fn build_system_prompt(snapshot: &ContextSnapshot) -> String {
    let email = snapshot.account_info.email.as_deref().unwrap_or("N/A");
    let status_summary = snapshot
        .status_summary
        .iter()
        .map(|(status, count)| format!("{}: {}", status, count))
        .collect::<Vec<_>>()
        .join(", ");

    let mut prompt = format!(
        "You are an intelligent task management assistant with access to \
         the user's task data.\n\n\
         User context:\n\
         - Total tasks: {}\n\
         - Task status summary: {{{}}}\n\
         - Account email: {}\n\n\
         Recent tasks (up to 10):\n",
        snapshot.task_count, status_summary, email
    );

    for (idx, task) in snapshot.tasks.iter().take(10).enumerate() {
        prompt.push_str(&format!("\n{}. {} - Status: {}", idx + 1, task.title, task.status));
        if let Some(description) = task.description.as_deref().filter(|d| !d.is_empty()) {
            prompt.push_str(&format!(
                " ({}...)",
                truncate_chars(description, PROMPT_DESCRIPTION_CHARS)
            ));
        }
    }

    prompt.push_str(
        "\n\nInstructions:\n\
         - Answer the user's questions about their tasks and account\n\
         - Be helpful, friendly, and concise\n\
         - Use the provided context data to give accurate answers\n\
         - If asked about tasks, reference the actual task data above\n\
         - Format responses with markdown (use ** for bold)\n\
         - Keep responses under 200 words unless more detail is needed\n",
    );

    prompt
}

fn truncate_chars(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

// ============================================================================
// KEYWORD FALLBACK
// ============================================================================

type IntentHandler = fn(&ContextSnapshot) -> ApiResult<ChatbotResult>;

/// One keyword intent: any listed keyword appearing as a case-insensitive
/// substring selects the handler.
struct Intent {
    keywords: &'static [&'static str],
    handler: IntentHandler,
}

/// Intents in precedence order; first match wins.
const INTENTS: &[Intent] = &[
    Intent {
        keywords: &["how many", "count", "total"],
        handler: task_count_response,
    },
    Intent {
        keywords: &["show", "list", "tasks"],
        handler: task_list_response,
    },
    Intent {
        keywords: &["help"],
        handler: help_response,
    },
];

/// Classify a query against the intent table.
pub fn classify(query: &str, snapshot: &ContextSnapshot) -> ApiResult<ChatbotResult> {
    let query_lower = query.to_lowercase();

    for intent in INTENTS {
        if intent.keywords.iter().any(|k| query_lower.contains(k)) {
            return (intent.handler)(snapshot);
        }
    }

    default_response(snapshot)
}

fn snapshot_data(snapshot: &ContextSnapshot) -> ApiResult<serde_json::Value> {
    Ok(serde_json::to_value(snapshot)?)
}

fn task_count_response(snapshot: &ContextSnapshot) -> ApiResult<ChatbotResult> {
    let breakdown = snapshot
        .status_summary
        .iter()
        .map(|(status, count)| format!("**{}**: {}", status, count))
        .collect::<Vec<_>>()
        .join(", ");

    let response = format!(
        "You have **{}** tasks in total.\n\nStatus breakdown: {}",
        snapshot.task_count, breakdown
    );

    Ok(ChatbotResult::ok(
        ResponseKind::TaskCount,
        response,
        snapshot_data(snapshot)?,
    ))
}

fn task_list_response(snapshot: &ContextSnapshot) -> ApiResult<ChatbotResult> {
    if snapshot.tasks.is_empty() {
        return Ok(ChatbotResult::ok(
            ResponseKind::TaskList,
            EMPTY_STATE_MESSAGE,
            snapshot_data(snapshot)?,
        ));
    }

    let mut response = String::from("Here are your recent tasks:\n\n");
    for (idx, task) in snapshot.tasks.iter().take(LIST_LIMIT).enumerate() {
        response.push_str(&format!("{}. **{}** - {}\n", idx + 1, task.title, task.status));
    }

    Ok(ChatbotResult::ok(
        ResponseKind::TaskList,
        response,
        snapshot_data(snapshot)?,
    ))
}

fn help_response(_snapshot: &ContextSnapshot) -> ApiResult<ChatbotResult> {
    Ok(ChatbotResult::ok(ResponseKind::Help, HELP_MESSAGE, json!({})))
}

fn default_response(snapshot: &ContextSnapshot) -> ApiResult<ChatbotResult> {
    Ok(ChatbotResult::ok(
        ResponseKind::Default,
        DEFAULT_MESSAGE,
        snapshot_data(snapshot)?,
    ))
}
