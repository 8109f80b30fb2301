//! Task Context Aggregator
//!
//! Builds the ephemeral ContextSnapshot grounding chatbot responses.
//! Every data-access failure is logged and downgraded to empty fields:
//! the chatbot must always be able to respond, even with degraded
//! context, so this module never returns an error.

use crate::db::DbClient;
use crate::types::ContextSnapshot;
use taskhub_core::AccountId;

/// Number of recent tasks included in a snapshot.
pub const SNAPSHOT_TASK_LIMIT: i64 = 10;

/// Build a best-effort context snapshot for an account.
///
/// `task_count` is derived as the sum of the status histogram values, not
/// a separate query, so the count/histogram invariant holds by
/// construction.
pub async fn build_snapshot(db: &DbClient, account_id: AccountId) -> ContextSnapshot {
    let mut snapshot = ContextSnapshot::empty(account_id);

    match db.task_status_histogram(account_id).await {
        Ok(histogram) => {
            snapshot.task_count = histogram.values().sum();
            snapshot.status_summary = histogram;
        }
        Err(e) => {
            tracing::warn!(%account_id, error = %e, "Failed to load task status histogram");
        }
    }

    match db.task_recent(account_id, SNAPSHOT_TASK_LIMIT).await {
        Ok(tasks) => snapshot.tasks = tasks,
        Err(e) => {
            tracing::warn!(%account_id, error = %e, "Failed to load recent tasks");
        }
    }

    match db.account_email(account_id).await {
        Ok(email) => snapshot.account_info.email = email,
        Err(e) => {
            tracing::warn!(%account_id, error = %e, "Failed to load account info");
        }
    }

    snapshot
}
