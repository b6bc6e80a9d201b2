use common::errors::ApiError;
use common::model::history::{DownloadHistory, HistoryFilterOptions, HistoryPublic, HistoryTab, UploadHistory};
use common::model::search::SearchResult;
use common::model::user::UserSummary;
use common::requests::{HistoryQuery, OperatorQuery, ToQuery};
use gloo_net::http::Request;
use uuid::Uuid;

const API_PATH: &str = "/api/history";

pub async fn downloads(query: &HistoryQuery) -> Result<SearchResult<DownloadHistory>, ApiError> {
    super::get_json(&query.with_path(&format!("{API_PATH}/{}", HistoryTab::Download))).await
}

pub async fn uploads(query: &HistoryQuery) -> Result<SearchResult<UploadHistory>, ApiError> {
    super::get_json(&query.with_path(&format!("{API_PATH}/{}", HistoryTab::Upload))).await
}

pub async fn filter_options() -> Result<HistoryFilterOptions, ApiError> {
    super::get_json(&format!("{API_PATH}/filter-options")).await
}

pub async fn operators(
    tab: HistoryTab,
    query: &OperatorQuery,
) -> Result<SearchResult<UserSummary>, ApiError> {
    super::get_json(&query.with_path(&format!("{API_PATH}/{tab}/filter-options/operators"))).await
}

pub async fn set_public(tab: HistoryTab, id: Uuid, body: &HistoryPublic) -> Result<HistoryPublic, ApiError> {
    super::send_json(Request::put(&format!("{API_PATH}/{tab}/{id}/public-status")), body).await
}

pub async fn file_exists(file_id: Uuid) -> Result<bool, ApiError> {
    super::get_json(&format!("{API_PATH}/files/{file_id}/exists")).await
}

pub fn file_url(file_id: Uuid) -> String {
    format!("{API_PATH}/files/{file_id}")
}
