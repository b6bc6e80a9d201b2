use common::errors::ApiError;
use common::model::bulk::{BulkBody, ExecuteRequest, MissingUsers, ResultSummary, ValidateSummary};
use common::requests::{ResultQuery, ToQuery};
use gloo_net::http::Request;
use uuid::Uuid;
use web_sys::{File, FormData};

const API_PATH: &str = "/api/bulk";

/// Uploads the file to validate. The gateway answers with the validation task
/// id and the id of the stored temporary file.
pub async fn upload(file: &File, repository_id: &str) -> Result<BulkBody, ApiError> {
    let form_error = |err: wasm_bindgen::JsValue| ApiError::Network(format!("{err:?}"));
    let form = FormData::new().map_err(form_error)?;
    form.append_with_blob_and_filename("bulk_file", file, &file.name())
        .map_err(form_error)?;
    form.append_with_str("repository_id", repository_id)
        .map_err(form_error)?;
    super::post_form(&format!("{API_PATH}/upload-file"), form).await
}

pub async fn validate_status(task_id: &str) -> Result<BulkBody, ApiError> {
    super::get_json(&format!("{API_PATH}/validate/status/{task_id}")).await
}

pub async fn validate_result(task_id: &str, query: &ResultQuery) -> Result<ValidateSummary, ApiError> {
    super::get_json(&query.with_path(&format!("{API_PATH}/validate/result/{task_id}"))).await
}

pub async fn missing_users(task_id: &str) -> Result<MissingUsers, ApiError> {
    super::get_json(&format!("{API_PATH}/missing-user-get/{task_id}")).await
}

pub async fn execute(request: &ExecuteRequest) -> Result<BulkBody, ApiError> {
    super::send_json(Request::post(&format!("{API_PATH}/execute")), request).await
}

pub async fn execute_status(task_id: &str) -> Result<BulkBody, ApiError> {
    super::get_json(&format!("{API_PATH}/execute/status/{task_id}")).await
}

pub async fn result(history_id: Uuid, query: &ResultQuery) -> Result<ResultSummary, ApiError> {
    super::get_json(&query.with_path(&format!("{API_PATH}/result/{history_id}"))).await
}
