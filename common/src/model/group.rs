use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who may see a group's member list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Visibility {
    Public,
    Private,
    Hidden,
}

impl Visibility {
    pub const ALL: [Visibility; 3] = [Visibility::Public, Visibility::Private, Visibility::Hidden];

    /// Numeric code used by the `v` query parameter of the group search.
    pub fn filter_code(self) -> u8 {
        match self {
            Visibility::Public => 0,
            Visibility::Private => 1,
            Visibility::Hidden => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Visibility::Public => "Public",
            Visibility::Private => "Private",
            Visibility::Hidden => "Hidden",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.label() == label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSummary {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member_list_visibility: Option<Visibility>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub users_count: Option<u64>,
}

impl GroupSummary {
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.id)
    }
}

/// Repository a group belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupRepository {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_defined_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member_list_visibility: Option<Visibility>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<GroupRepository>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub users_count: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberOp {
    Add,
    Remove,
}

/// One member operation; the gateway only accepts the `member` path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMemberPatch {
    pub op: MemberOp,
    pub path: String,
    pub value: Vec<String>,
}

impl GroupMemberPatch {
    pub fn members(op: MemberOp, user_ids: Vec<String>) -> Self {
        Self {
            op,
            path: "member".to_string(),
            value: user_ids,
        }
    }
}

/// Body of `PATCH /api/groups/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupPatchRequest {
    pub operations: Vec<GroupMemberPatch>,
}

impl GroupPatchRequest {
    /// One operation adding or removing `user_ids`.
    pub fn members(op: MemberOp, user_ids: Vec<String>) -> Self {
        Self {
            operations: vec![GroupMemberPatch::members(op, user_ids)],
        }
    }
}

/// Body of `POST /api/groups/delete`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteGroupsRequest {
    pub group_ids: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_patch_wraps_operations() {
        let body = GroupPatchRequest::members(MemberOp::Remove, vec!["u1".to_string()]);

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"operations": [{"op": "remove", "path": "member", "value": ["u1"]}]})
        );
    }

    #[test]
    fn visibility_uses_gateway_labels() {
        let group: GroupSummary = serde_json::from_str(
            r#"{"id": "g1", "memberListVisibility": "Hidden", "usersCount": 3}"#,
        )
        .unwrap();

        assert_eq!(group.member_list_visibility, Some(Visibility::Hidden));
        assert_eq!(group.label(), "g1");
        assert_eq!(Visibility::from_label("Private"), Some(Visibility::Private));
    }
}
