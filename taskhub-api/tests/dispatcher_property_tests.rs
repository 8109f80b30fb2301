//! Property-Based Tests for the Chatbot Keyword Dispatcher
//!
//! **Property 1: Total Classification**
//!
//! For any query string and any context snapshot, keyword classification
//! SHALL produce a successful result whose kind is one of task_count,
//! task_list, help, or default.
//!
//! **Property 2: Precedence**
//!
//! IF a query contains a count keyword THEN the result kind SHALL be
//! task_count regardless of which other keywords appear.
//!
//! **Property 3: Fallback Parity**
//!
//! For any query, dispatching with a failing LLM provider SHALL produce
//! the same classification as the keyword path alone.

use std::collections::BTreeMap;
use std::sync::Arc;

use proptest::prelude::*;
use taskhub_api::types::{ContextSnapshot, ResponseKind};
use taskhub_api::{classify, dispatch, ChatbotConfig};
use taskhub_core::{TaskBrief, TaskStatus};
use taskhub_llm::{ChatProvider, MockChatProvider};
use uuid::Uuid;

// ============================================================================
// PROPERTY TEST STRATEGIES
// ============================================================================

const COUNT_KEYWORDS: &[&str] = &["how many", "count", "total"];
const LIST_KEYWORDS: &[&str] = &["show", "list", "tasks"];

fn status_strategy() -> impl Strategy<Value = TaskStatus> {
    prop_oneof![
        Just(TaskStatus::Pending),
        Just(TaskStatus::InProgress),
        Just(TaskStatus::Done),
    ]
}

fn brief_strategy() -> impl Strategy<Value = TaskBrief> {
    ("[a-z]{1,12}", proptest::option::of("[a-z ]{0,80}"), status_strategy()).prop_map(
        |(title, description, status)| TaskBrief {
            title,
            description,
            status,
        },
    )
}

/// Snapshot with a consistent task_count (sum of the histogram).
fn snapshot_strategy() -> impl Strategy<Value = ContextSnapshot> {
    (
        proptest::collection::btree_map("pending|in_progress|done", 0i64..50, 0..3),
        proptest::collection::vec(brief_strategy(), 0..10),
    )
        .prop_map(|(status_summary, tasks)| {
            let status_summary: BTreeMap<String, i64> = status_summary;
            ContextSnapshot {
                account_id: Uuid::new_v4(),
                task_count: status_summary.values().sum(),
                tasks,
                status_summary,
                account_info: Default::default(),
            }
        })
}

/// Free text that avoids accidental keyword hits.
fn neutral_text() -> impl Strategy<Value = String> {
    "[bdfgjkmpqvxz ]{0,30}"
}

/// Embed a keyword in surrounding neutral text, with random case.
fn query_containing(keywords: &'static [&'static str]) -> impl Strategy<Value = String> {
    (
        neutral_text(),
        proptest::sample::select(keywords),
        neutral_text(),
        any::<bool>(),
    )
        .prop_map(|(prefix, keyword, suffix, upper)| {
            let keyword = if upper {
                keyword.to_uppercase()
            } else {
                keyword.to_string()
            };
            format!("{}{}{}", prefix, keyword, suffix)
        })
}

fn failing_provider() -> Arc<dyn ChatProvider> {
    Arc::new(MockChatProvider::failing())
}

fn enabled_config() -> ChatbotConfig {
    let mut config = ChatbotConfig::disabled();
    config.llm_enabled = true;
    config
}

// ============================================================================
// PROPERTY 1: TOTAL CLASSIFICATION
// ============================================================================

proptest! {
    #[test]
    fn classification_is_total(
        query in ".{0,60}",
        snapshot in snapshot_strategy(),
    ) {
        let result = classify(&query, &snapshot).unwrap();

        prop_assert!(result.success);
        prop_assert!(matches!(
            result.kind,
            ResponseKind::TaskCount
                | ResponseKind::TaskList
                | ResponseKind::Help
                | ResponseKind::Default
        ));
        prop_assert!(!result.response.is_empty());
    }

    #[test]
    fn classified_result_serializes_with_wire_fields(
        query in ".{0,60}",
        snapshot in snapshot_strategy(),
    ) {
        let result = classify(&query, &snapshot).unwrap();
        let json = serde_json::to_value(&result).unwrap();

        prop_assert!(json.get("success").is_some());
        prop_assert!(json.get("response").is_some());
        prop_assert!(json.get("data").is_some());
        prop_assert!(json.get("type").is_some());
        prop_assert!(json.get("kind").is_none());
    }
}

// ============================================================================
// PROPERTY 2: PRECEDENCE
// ============================================================================

proptest! {
    #[test]
    fn count_keywords_always_win(
        query in query_containing(COUNT_KEYWORDS),
        extra in proptest::sample::select(LIST_KEYWORDS),
        snapshot in snapshot_strategy(),
    ) {
        // Even with a list keyword appended, count takes precedence.
        let combined = format!("{} {}", query, extra);
        let result = classify(&combined, &snapshot).unwrap();

        prop_assert_eq!(result.kind, ResponseKind::TaskCount);
        prop_assert!(result.response.contains(&snapshot.task_count.to_string()));
    }

    #[test]
    fn list_keywords_without_count_yield_task_list(
        query in query_containing(LIST_KEYWORDS),
        snapshot in snapshot_strategy(),
    ) {
        let result = classify(&query, &snapshot).unwrap();
        prop_assert_eq!(result.kind, ResponseKind::TaskList);
    }

    #[test]
    fn task_list_shows_at_most_five(
        query in query_containing(LIST_KEYWORDS),
        snapshot in snapshot_strategy(),
    ) {
        let result = classify(&query, &snapshot).unwrap();
        let numbered = result
            .response
            .lines()
            .filter(|line| line.chars().next().is_some_and(|c| c.is_ascii_digit()))
            .count();

        prop_assert!(numbered <= 5);
        prop_assert_eq!(numbered, snapshot.tasks.len().min(5));
    }

    #[test]
    fn neutral_queries_fall_through_to_default(
        query in neutral_text(),
        snapshot in snapshot_strategy(),
    ) {
        let result = classify(&query, &snapshot).unwrap();

        prop_assert_eq!(result.kind, ResponseKind::Default);
        // The default response carries the full snapshot for the UI.
        prop_assert_eq!(result.data, serde_json::to_value(&snapshot).unwrap());
    }
}

// ============================================================================
// PROPERTY 3: FALLBACK PARITY
// ============================================================================

proptest! {
    #[test]
    fn failing_provider_matches_keyword_path(
        query in ".{0,60}",
        snapshot in snapshot_strategy(),
    ) {
        let keyword_only = classify(&query, &snapshot).unwrap();

        let rt = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();
        let provider = failing_provider();
        let config = enabled_config();
        let dispatched = rt
            .block_on(dispatch(&query, &snapshot, Some(&provider), &config))
            .unwrap();

        prop_assert_eq!(dispatched.kind, keyword_only.kind);
        prop_assert_eq!(dispatched.response, keyword_only.response);
    }
}
