//! Payloads of the `/api/bulk` endpoints.
//!
//! The bulk import runs as two background tasks on the gateway: a validation
//! task started by the upload and an execution task started after the operator
//! confirms. Both are queried through [`BulkBody`] status responses; their
//! reports come back as [`ValidateSummary`] and [`ResultSummary`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::jobs::TaskStatus;
use crate::model::user::UserDetail;

/// Response of the upload, status and execute endpoints. Which fields are
/// present depends on the endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp_file_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
}

/// Outcome of one file row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowStatus {
    Create,
    Update,
    Delete,
    Skip,
    Error,
}

impl RowStatus {
    /// In filter-index order.
    pub const ALL: [RowStatus; 5] = [
        RowStatus::Create,
        RowStatus::Update,
        RowStatus::Delete,
        RowStatus::Skip,
        RowStatus::Error,
    ];

    /// Value of the `f` query parameter selecting this outcome.
    pub fn filter_index(self) -> u8 {
        match self {
            RowStatus::Create => 0,
            RowStatus::Update => 1,
            RowStatus::Delete => 2,
            RowStatus::Skip => 3,
            RowStatus::Error => 4,
        }
    }

    pub fn from_filter_index(index: u8) -> Option<Self> {
        Self::ALL.get(usize::from(index)).copied()
    }

    pub fn label(self) -> &'static str {
        match self {
            RowStatus::Create => "Create",
            RowStatus::Update => "Update",
            RowStatus::Delete => "Delete",
            RowStatus::Skip => "Skip",
            RowStatus::Error => "Error",
        }
    }
}

/// Per-row result of validation or execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResult {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub eppn: Vec<String>,
    #[serde(default)]
    pub email: Vec<String>,
    pub user_name: String,
    #[serde(default)]
    pub groups: Vec<String>,
    pub status: RowStatus,
    #[serde(default)]
    pub code: Option<String>,
}

/// Row counts per outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistorySummary {
    #[serde(default)]
    pub create: u64,
    #[serde(default)]
    pub update: u64,
    #[serde(default)]
    pub delete: u64,
    #[serde(default)]
    pub skip: u64,
    #[serde(default)]
    pub error: u64,
}

impl HistorySummary {
    pub fn count(&self, status: RowStatus) -> u64 {
        match status {
            RowStatus::Create => self.create,
            RowStatus::Update => self.update,
            RowStatus::Delete => self.delete,
            RowStatus::Skip => self.skip,
            RowStatus::Error => self.error,
        }
    }

    pub fn total(&self) -> u64 {
        RowStatus::ALL.iter().map(|s| self.count(*s)).sum()
    }

    /// Number of rows matched by a status filter; an empty filter matches all.
    pub fn total_for(&self, filter: &[RowStatus]) -> u64 {
        if filter.is_empty() {
            return self.total();
        }
        let mut statuses = filter.to_vec();
        statuses.sort();
        statuses.dedup();
        statuses.iter().map(|s| self.count(*s)).sum()
    }
}

/// Report of a finished validation task. `offset` echoes the requested page
/// number, not a row offset; the displayed range comes from the requested
/// [`Paging`](crate::pagination::Paging).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateSummary {
    #[serde(default)]
    pub results: Vec<CheckResult>,
    pub summary: HistorySummary,
    #[serde(default)]
    pub missing_user: Vec<UserDetail>,
    #[serde(default)]
    pub offset: u64,
    #[serde(default)]
    pub page_size: u64,
}

impl ValidateSummary {
    pub fn error_count(&self) -> u64 {
        self.summary.error
    }
}

/// Report of an execution task, available while it runs and after it ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultSummary {
    #[serde(default, alias = "items")]
    pub results: Vec<CheckResult>,
    pub summary: HistorySummary,
    pub file_id: Uuid,
    pub file_name: String,
    pub operator: String,
    pub start_timestamp: DateTime<Utc>,
    #[serde(default)]
    pub end_timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub offset: u64,
    #[serde(default)]
    pub page_size: u64,
    #[serde(default)]
    pub total: Option<u64>,
}

impl ResultSummary {
    pub fn is_finished(&self) -> bool {
        self.end_timestamp.is_some()
    }

    /// Rows matched by `filter`, preferring the server-reported total.
    pub fn filtered_total(&self, filter: &[RowStatus]) -> u64 {
        self.total
            .unwrap_or_else(|| self.summary.total_for(filter))
    }
}

/// Response of `GET /api/bulk/missing-user-get/{task_id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingUsers {
    #[serde(default)]
    pub delete_users: Vec<UserDetail>,
}

/// Body of `POST /api/bulk/execute`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteRequest {
    pub task_id: String,
    pub temp_file_id: Uuid,
    pub repository_id: String,
    pub delete_users: Vec<UserDetail>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, Some(RowStatus::Create))]
    #[case(2, Some(RowStatus::Delete))]
    #[case(4, Some(RowStatus::Error))]
    #[case(5, None)]
    fn filter_index_maps_to_status(#[case] index: u8, #[case] expected: Option<RowStatus>) {
        assert_eq!(RowStatus::from_filter_index(index), expected);
        if let Some(status) = expected {
            assert_eq!(status.filter_index(), index);
        }
    }

    #[test]
    fn summary_totals_respect_filter() {
        let summary = HistorySummary {
            create: 3,
            update: 2,
            delete: 1,
            skip: 4,
            error: 0,
        };

        assert_eq!(summary.total(), 10);
        assert_eq!(summary.total_for(&[]), 10);
        assert_eq!(summary.total_for(&[RowStatus::Create, RowStatus::Skip]), 7);
        assert_eq!(summary.total_for(&[RowStatus::Update, RowStatus::Update]), 2);
    }

    #[test]
    fn validate_summary_decodes_gateway_payload() {
        let body = r#"{
            "results": [
                {"id": null, "eppn": ["new@idp.example"], "email": ["new@example.org"],
                 "userName": "New User", "groups": ["g1"], "status": "create", "code": null},
                {"id": "u2", "eppn": [], "email": [], "userName": "Broken",
                 "groups": [], "status": "error", "code": "E_EPPN_DUPLICATE"}
            ],
            "summary": {"create": 1, "update": 0, "delete": 0, "skip": 0, "error": 1},
            "missingUser": [{"id": "u9", "userName": "Gone"}],
            "offset": 1,
            "pageSize": 20
        }"#;

        let summary: ValidateSummary = serde_json::from_str(body).unwrap();

        assert_eq!(summary.results.len(), 2);
        assert_eq!(summary.results[1].code.as_deref(), Some("E_EPPN_DUPLICATE"));
        assert_eq!(summary.error_count(), 1);
        assert_eq!(summary.missing_user[0].id, "u9");
    }

    #[test]
    fn result_summary_accepts_items_alias_and_open_end() {
        let body = r#"{
            "items": [],
            "summary": {"create": 0, "update": 5, "delete": 2, "skip": 0, "error": 0},
            "fileId": "0190b8a4-6a43-7b1c-9a55-3c2a1f4d8e10",
            "fileName": "users.csv",
            "operator": "Operator",
            "startTimestamp": "2025-06-01T10:00:00Z",
            "offset": 1,
            "pageSize": 10
        }"#;

        let result: ResultSummary = serde_json::from_str(body).unwrap();

        assert!(!result.is_finished());
        assert_eq!(result.filtered_total(&[RowStatus::Delete]), 2);
        assert_eq!(result.filtered_total(&[]), 7);
    }

    #[test]
    fn execute_request_serializes_camel_case() {
        let request = ExecuteRequest {
            task_id: "task-1".to_string(),
            temp_file_id: Uuid::nil(),
            repository_id: "repo_1".to_string(),
            delete_users: vec![UserDetail {
                id: "u1".to_string(),
                user_name: "Someone".to_string(),
                ..UserDetail::default()
            }],
        };

        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["taskId"], "task-1");
        assert_eq!(json["repositoryId"], "repo_1");
        assert_eq!(json["deleteUsers"][0]["id"], "u1");
        assert!(json["deleteUsers"][0].get("emails").is_none());
    }
}
