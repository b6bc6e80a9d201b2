//! Repositories, groups and users.

use common::errors::ApiError;
use common::model::group::{DeleteGroupsRequest, GroupDetail, GroupPatchRequest, GroupSummary};
use common::model::repository::{RepositoryDetail, RepositorySummary};
use common::model::search::{FilterOption, SearchResult};
use common::model::user::{UserDetail, UserSummary};
use common::requests::{GroupsQuery, RepositoriesQuery, ToQuery, UsersQuery};
use gloo_net::http::Request;

pub mod repositories {
    use super::*;

    const API_PATH: &str = "/api/repositories";

    pub async fn list(query: &RepositoriesQuery) -> Result<SearchResult<RepositorySummary>, ApiError> {
        crate::api::get_json(&query.with_path(API_PATH)).await
    }

    pub async fn get(id: &str) -> Result<RepositoryDetail, ApiError> {
        crate::api::get_json(&format!("{API_PATH}/{id}")).await
    }

    pub async fn create(detail: &RepositoryDetail) -> Result<RepositoryDetail, ApiError> {
        crate::api::send_json(Request::post(API_PATH), detail).await
    }

    pub async fn update(detail: &RepositoryDetail) -> Result<RepositoryDetail, ApiError> {
        crate::api::send_json(Request::put(&format!("{API_PATH}/{}", detail.id)), detail).await
    }

    pub async fn delete(id: &str) -> Result<(), ApiError> {
        crate::api::delete(&format!("{API_PATH}/{id}")).await
    }
}

pub mod groups {
    use super::*;

    const API_PATH: &str = "/api/groups";

    pub async fn list(query: &GroupsQuery) -> Result<SearchResult<GroupSummary>, ApiError> {
        crate::api::get_json(&query.with_path(API_PATH)).await
    }

    pub async fn get(id: &str) -> Result<GroupDetail, ApiError> {
        crate::api::get_json(&format!("{API_PATH}/{id}")).await
    }

    pub async fn create(detail: &GroupDetail) -> Result<GroupDetail, ApiError> {
        crate::api::send_json(Request::post(API_PATH), detail).await
    }

    pub async fn update(id: &str, detail: &GroupDetail) -> Result<GroupDetail, ApiError> {
        crate::api::send_json(Request::put(&format!("{API_PATH}/{id}")), detail).await
    }

    pub async fn patch_members(id: &str, patch: &GroupPatchRequest) -> Result<GroupDetail, ApiError> {
        crate::api::send_json(Request::patch(&format!("{API_PATH}/{id}")), patch).await
    }

    pub async fn delete(id: &str) -> Result<(), ApiError> {
        crate::api::delete(&format!("{API_PATH}/{id}")).await
    }

    pub async fn delete_many(request: &DeleteGroupsRequest) -> Result<(), ApiError> {
        crate::api::send_json_no_content(Request::post(&format!("{API_PATH}/delete")), request).await
    }

    pub async fn filter_options() -> Result<Vec<FilterOption>, ApiError> {
        crate::api::get_json(&format!("{API_PATH}/filter-options")).await
    }
}

pub mod users {
    use super::*;

    const API_PATH: &str = "/api/users";

    pub async fn list(query: &UsersQuery) -> Result<SearchResult<UserSummary>, ApiError> {
        crate::api::get_json(&query.with_path(API_PATH)).await
    }

    pub async fn get(id: &str) -> Result<UserDetail, ApiError> {
        crate::api::get_json(&format!("{API_PATH}/{id}")).await
    }

    pub async fn create(detail: &UserDetail) -> Result<UserDetail, ApiError> {
        crate::api::send_json(Request::post(API_PATH), detail).await
    }

    pub async fn update(detail: &UserDetail) -> Result<UserDetail, ApiError> {
        crate::api::send_json(Request::put(&format!("{API_PATH}/{}", detail.id)), detail).await
    }

    pub async fn filter_options() -> Result<Vec<FilterOption>, ApiError> {
        crate::api::get_json(&format!("{API_PATH}/filter-options")).await
    }
}
