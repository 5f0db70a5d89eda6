//! Asynchronous update tracking.
//!
//! Every mutating document or settings call is enqueued server-side and
//! acknowledged with an update id; the update is applied at some later
//! point. This module holds the update record types and the transition
//! logic behind [`Index::wait_for_pending_update`](crate::Index::wait_for_pending_update),
//! which bridges the fire-and-forget enqueue to a bounded blocking wait.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default deadline for a pending-update wait.
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_millis(5000);

/// Default interval between two status polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Status of an asynchronous update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateState {
    /// Queued, not yet picked up.
    Enqueued,
    /// Currently being applied.
    Processing,
    /// Applied successfully.
    Processed,
    /// Aborted with an error.
    Failed,
}

impl UpdateState {
    /// Returns true if the update is still in progress.
    pub fn is_pending(&self) -> bool {
        matches!(self, UpdateState::Enqueued | UpdateState::Processing)
    }

    /// Returns true if no further transition can occur.
    pub fn is_terminal(&self) -> bool {
        !self.is_pending()
    }

    /// Returns true if the update was aborted with an error.
    pub fn is_failure(&self) -> bool {
        matches!(self, UpdateState::Failed)
    }
}

/// Kind of operation an update performs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateType {
    /// Operation name, e.g. `DocumentsAddition`.
    pub name: String,

    /// Number of affected documents, when the operation has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<u64>,
}

/// Server-side record of an asynchronous update.
///
/// Created on every mutating call; observed by the client through the
/// update routes. `processed` and `failed` are terminal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatus {
    /// Update identifier, monotonically increasing per index.
    pub update_id: u64,

    /// Current status.
    pub status: UpdateState,

    /// Operation kind.
    #[serde(rename = "type")]
    pub update_type: UpdateType,

    /// Processing time in seconds, present once processed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,

    /// When the update was enqueued.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enqueued_at: Option<DateTime<Utc>>,

    /// When processing finished, terminal states only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processed_at: Option<DateTime<Utc>>,

    /// Failure message, present when the status is `failed`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Machine-readable failure code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,

    /// Failure type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,

    /// Documentation link for the failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_link: Option<String>,
}

/// Decision taken after one observation of a pending update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PollDecision {
    /// The update reached a terminal state; hand the record to the caller.
    Return,
    /// The deadline passed while the update was still pending.
    GiveUp,
    /// Still pending; sleep one interval and poll again.
    Retry,
}

/// Transition function of the polling loop.
///
/// A terminal state wins over an expired deadline: the record is returned
/// even when the final poll lands after the timeout.
pub(crate) fn poll_decision(
    state: UpdateState,
    elapsed: Duration,
    timeout: Duration,
) -> PollDecision {
    if state.is_terminal() {
        PollDecision::Return
    } else if elapsed >= timeout {
        PollDecision::GiveUp
    } else {
        PollDecision::Retry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn test_state_predicates() {
        assert!(UpdateState::Enqueued.is_pending());
        assert!(UpdateState::Processing.is_pending());
        assert!(!UpdateState::Processed.is_pending());
        assert!(!UpdateState::Failed.is_pending());

        assert!(UpdateState::Processed.is_terminal());
        assert!(UpdateState::Failed.is_terminal());

        assert!(UpdateState::Failed.is_failure());
        assert!(!UpdateState::Processed.is_failure());
    }

    #[test]
    fn test_state_wire_names() {
        let state: UpdateState = serde_json::from_str("\"enqueued\"").unwrap();
        assert_eq!(state, UpdateState::Enqueued);
        let state: UpdateState = serde_json::from_str("\"processed\"").unwrap();
        assert_eq!(state, UpdateState::Processed);
        assert_eq!(
            serde_json::to_string(&UpdateState::Processing).unwrap(),
            "\"processing\""
        );
    }

    #[test]
    fn test_poll_decision_terminal_returns() {
        assert_eq!(
            poll_decision(UpdateState::Processed, 0 * MS, 100 * MS),
            PollDecision::Return
        );
        assert_eq!(
            poll_decision(UpdateState::Failed, 0 * MS, 100 * MS),
            PollDecision::Return
        );
        // A terminal state observed after the deadline is still a result.
        assert_eq!(
            poll_decision(UpdateState::Processed, 200 * MS, 100 * MS),
            PollDecision::Return
        );
    }

    #[test]
    fn test_poll_decision_pending_retries_until_deadline() {
        assert_eq!(
            poll_decision(UpdateState::Enqueued, 99 * MS, 100 * MS),
            PollDecision::Retry
        );
        assert_eq!(
            poll_decision(UpdateState::Processing, 100 * MS, 100 * MS),
            PollDecision::GiveUp
        );
        assert_eq!(
            poll_decision(UpdateState::Enqueued, 101 * MS, 100 * MS),
            PollDecision::GiveUp
        );
    }

    #[test]
    fn test_update_status_parses_processed_record() {
        let body = r#"{
            "status": "processed",
            "updateId": 1,
            "type": { "name": "DocumentsAddition", "number": 19 },
            "duration": 0.076980613,
            "enqueuedAt": "2020-05-30T03:27:57.462943453Z",
            "processedAt": "2020-05-30T03:27:57.652591324Z"
        }"#;

        let status: UpdateStatus = serde_json::from_str(body).unwrap();
        assert_eq!(status.update_id, 1);
        assert_eq!(status.status, UpdateState::Processed);
        assert_eq!(status.update_type.name, "DocumentsAddition");
        assert_eq!(status.update_type.number, Some(19));
        assert!(status.duration.unwrap() > 0.0);
        assert!(status.processed_at.is_some());
        assert!(status.error.is_none());
    }

    #[test]
    fn test_update_status_parses_failed_record() {
        let body = r#"{
            "status": "failed",
            "updateId": 3,
            "type": { "name": "DocumentsAddition", "number": 1 },
            "error": "document id is missing",
            "errorCode": "missing_document_id",
            "errorType": "invalid_request_error",
            "errorLink": "https://docs.meilisearch.com/errors#missing_document_id",
            "duration": 0.0,
            "enqueuedAt": "2020-05-30T03:27:57.462943453Z",
            "processedAt": "2020-05-30T03:27:57.466223453Z"
        }"#;

        let status: UpdateStatus = serde_json::from_str(body).unwrap();
        assert_eq!(status.status, UpdateState::Failed);
        assert!(status.status.is_failure());
        assert_eq!(status.error.as_deref(), Some("document id is missing"));
        assert_eq!(status.error_code.as_deref(), Some("missing_document_id"));
    }
}
