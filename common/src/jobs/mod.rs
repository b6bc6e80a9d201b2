//! States of the gateway's background tasks.
//!
//! Validation and execution of a bulk import each run as a Celery task on the
//! gateway. The client only ever sees the task's state name, reported by the
//! `status` endpoints, and drives its polling loop (see [`polling`]) from it.

use serde::{Deserialize, Serialize};
use std::fmt;

pub mod polling;

/// State of a background task as reported by the gateway.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Queued, or unknown to the result backend yet.
    Pending,
    /// Picked up by a worker.
    Started,
    /// Failed once and scheduled again by the worker.
    Retry,
    /// Finished; the report endpoints are ready.
    Success,
    /// Finished with an error.
    Failure,
    /// Cancelled on the gateway side.
    Revoked,
    /// Any state name this client does not know; treated as still running.
    #[serde(other)]
    Unknown,
}

impl TaskStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TaskStatus::Success | TaskStatus::Failure | TaskStatus::Revoked
        )
    }

    pub fn is_success(&self) -> bool {
        matches!(self, TaskStatus::Success)
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, TaskStatus::Failure | TaskStatus::Revoked)
    }

    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "Waiting",
            TaskStatus::Started => "Running",
            TaskStatus::Retry => "Retrying",
            TaskStatus::Success => "Completed",
            TaskStatus::Failure => "Failed",
            TaskStatus::Revoked => "Cancelled",
            TaskStatus::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("\"PENDING\"", TaskStatus::Pending, false)]
    #[case("\"STARTED\"", TaskStatus::Started, false)]
    #[case("\"RETRY\"", TaskStatus::Retry, false)]
    #[case("\"SUCCESS\"", TaskStatus::Success, true)]
    #[case("\"FAILURE\"", TaskStatus::Failure, true)]
    #[case("\"REVOKED\"", TaskStatus::Revoked, true)]
    #[case("\"RECEIVED\"", TaskStatus::Unknown, false)]
    fn decodes_celery_state_names(
        #[case] raw: &str,
        #[case] expected: TaskStatus,
        #[case] terminal: bool,
    ) {
        let status: TaskStatus = serde_json::from_str(raw).unwrap();
        assert_eq!(status, expected);
        assert_eq!(status.is_terminal(), terminal);
    }
}
