//! Payloads of the `/api/history` endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::model::bulk::HistorySummary;
use crate::model::group::GroupSummary;
use crate::model::repository::RepositorySummary;
use crate::model::search::FilterOption;
use crate::model::user::UserSummary;

/// The two history tables, also the `{tab}` path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryTab {
    Download,
    Upload,
}

impl HistoryTab {
    pub fn path(self) -> &'static str {
        match self {
            HistoryTab::Download => "download",
            HistoryTab::Upload => "upload",
        }
    }
}

impl fmt::Display for HistoryTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// A download event. Parents summarize same-session re-downloads, which are
/// fetched separately as children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadHistory {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub operator: UserSummary,
    pub public: bool,
    #[serde(default)]
    pub parent_id: Option<Uuid>,
    pub file_path: String,
    /// Stored file behind `file_path`, when the gateway reports it.
    #[serde(default)]
    pub file_id: Option<Uuid>,
    #[serde(default)]
    pub repositories: Vec<RepositorySummary>,
    #[serde(default)]
    pub groups: Vec<GroupSummary>,
    #[serde(default)]
    pub users: Vec<UserSummary>,
    #[serde(default)]
    pub children_count: u64,
}

/// Lifecycle of an upload record: `S`ucceeded, `F`ailed or in `P`rogress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UploadStatus {
    #[serde(rename = "S")]
    Succeeded,
    #[serde(rename = "F")]
    Failed,
    #[serde(rename = "P")]
    InProgress,
}

impl UploadStatus {
    pub fn label(self) -> &'static str {
        match self {
            UploadStatus::Succeeded => "Succeeded",
            UploadStatus::Failed => "Failed",
            UploadStatus::InProgress => "In progress",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadHistory {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub end_timestamp: Option<DateTime<Utc>>,
    pub public: bool,
    pub operator: UserSummary,
    pub status: UploadStatus,
    #[serde(default)]
    pub summary: Option<HistorySummary>,
    pub file_path: String,
    /// Stored file behind `file_path`, when the gateway reports it.
    #[serde(default)]
    pub file_id: Option<Uuid>,
    #[serde(default)]
    pub repositories: Vec<RepositorySummary>,
    #[serde(default)]
    pub groups: Vec<GroupSummary>,
    #[serde(default)]
    pub users: Vec<UserSummary>,
}

/// Body and response of `PUT /api/history/{tab}/{id}/public-status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryPublic {
    pub public: bool,
}

/// Response of `GET /api/history/filter-options`.
pub type HistoryFilterOptions = Vec<FilterOption>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_history_decodes_status_letters() {
        let body = r#"{
            "id": "0190b8a4-6a43-7b1c-9a55-3c2a1f4d8e10",
            "timestamp": "2025-06-01T10:00:00Z",
            "endTimestamp": "2025-06-01T10:02:00Z",
            "public": false,
            "operator": {"id": "op1", "userName": "Operator"},
            "status": "F",
            "summary": {"create": 1, "update": 0, "delete": 0, "skip": 0, "error": 1},
            "filePath": "/data/upload/users.csv",
            "repositories": [{"id": "repo_1", "displayName": "Repo"}],
            "groups": [],
            "users": []
        }"#;

        let record: UploadHistory = serde_json::from_str(body).unwrap();

        assert_eq!(record.status, UploadStatus::Failed);
        assert_eq!(record.summary.unwrap().error, 1);
        assert_eq!(record.repositories[0].label(), "Repo");
    }

    #[test]
    fn download_history_defaults_children_count() {
        let body = r#"{
            "id": "0190b8a4-6a43-7b1c-9a55-3c2a1f4d8e11",
            "timestamp": "2025-06-01T10:00:00Z",
            "operator": {"id": "op1"},
            "public": true,
            "filePath": "/data/download/export.csv"
        }"#;

        let record: DownloadHistory = serde_json::from_str(body).unwrap();

        assert_eq!(record.children_count, 0);
        assert!(record.parent_id.is_none());
        assert_eq!(record.operator.label(), "op1");
    }
}
