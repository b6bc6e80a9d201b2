use serde::{Deserialize, Serialize};

/// The operator currently signed in through the federation, as returned by
/// `GET /api/auth/check`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginUser {
    pub id: String,
    pub user_name: String,
    #[serde(default)]
    pub is_system_admin: bool,
}
