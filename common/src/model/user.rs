use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::group::GroupSummary;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eppn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
}

impl UserSummary {
    pub fn label(&self) -> &str {
        self.user_name.as_deref().unwrap_or(&self.id)
    }
}

/// Full user record. Also the shape of missing users in the bulk workflow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetail {
    #[serde(default)]
    pub id: String,
    pub user_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eppn: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emails: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<GroupSummary>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
}

impl UserDetail {
    pub fn first_eppn(&self) -> Option<&str> {
        self.eppn.as_ref()?.first().map(String::as_str)
    }

    pub fn first_email(&self) -> Option<&str> {
        self.emails.as_ref()?.first().map(String::as_str)
    }
}

/// Languages the gateway accepts for `preferredLanguage`; empty means unset.
pub const PREFERRED_LANGUAGES: [&str; 3] = ["", "en", "ja"];

/// Role filter of the user search, sent as the numeric `a` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Authority {
    SystemAdmin,
    RepositoryAdmin,
    CommunityAdmin,
    Contributor,
    GeneralUser,
}

impl Authority {
    pub const ALL: [Authority; 5] = [
        Authority::SystemAdmin,
        Authority::RepositoryAdmin,
        Authority::CommunityAdmin,
        Authority::Contributor,
        Authority::GeneralUser,
    ];

    pub fn code(self) -> u8 {
        match self {
            Authority::SystemAdmin => 0,
            Authority::RepositoryAdmin => 1,
            Authority::CommunityAdmin => 2,
            Authority::Contributor => 3,
            Authority::GeneralUser => 4,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(usize::from(code)).copied()
    }

    pub fn label(self) -> &'static str {
        match self {
            Authority::SystemAdmin => "System administrator",
            Authority::RepositoryAdmin => "Repository administrator",
            Authority::CommunityAdmin => "Community administrator",
            Authority::Contributor => "Contributor",
            Authority::GeneralUser => "General user",
        }
    }
}
