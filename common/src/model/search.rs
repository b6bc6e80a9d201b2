use serde::{Deserialize, Serialize};
use std::fmt;

/// List envelope shared by every search endpoint.
///
/// `offset` is reported as the gateway computes it and is not used for
/// display; tables derive their range from the requested
/// [`Paging`](crate::pagination::Paging).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult<T> {
    pub total: u64,
    pub page_size: u64,
    pub offset: u64,
    #[serde(default = "Vec::new")]
    pub resources: Vec<T>,
}

impl<T> SearchResult<T> {
    pub fn empty(page_size: u64) -> Self {
        Self {
            total: 0,
            page_size,
            offset: 0,
            resources: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterType {
    String,
    Number,
    Date,
}

/// Item values are either numeric codes or string identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Number(i64),
    Text(String),
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::Number(n) => write!(f, "{n}"),
            FilterValue::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterItem {
    pub value: FilterValue,
    pub label: String,
}

/// One filter control as described by a `filter-options` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOption {
    pub key: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: FilterType,
    pub multiple: bool,
    #[serde(default)]
    pub items: Option<Vec<FilterItem>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_options_decode_mixed_item_values() {
        let body = r#"[
            {"key":"a","description":"Role","type":"number","multiple":true,
             "items":[{"value":0,"label":"System admin"},{"value":3,"label":"Contributor"}]},
            {"key":"r","type":"string","multiple":true,
             "items":[{"value":"repo_1","label":"Repository 1"}]},
            {"key":"s","type":"date","multiple":false}
        ]"#;

        let options: Vec<FilterOption> = serde_json::from_str(body).unwrap();

        assert_eq!(options.len(), 3);
        assert_eq!(options[0].kind, FilterType::Number);
        let items = options[0].items.as_ref().unwrap();
        assert_eq!(items[1].value, FilterValue::Number(3));
        assert_eq!(
            options[1].items.as_ref().unwrap()[0].value.to_string(),
            "repo_1"
        );
        assert!(options[2].items.is_none());
    }
}
