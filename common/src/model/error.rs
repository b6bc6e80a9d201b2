use serde::{Deserialize, Serialize};

/// Error envelope returned by the gateway alongside non-2xx statuses.
///
/// Both fields are frequently empty strings, so callers should fall back to a
/// generic message when `message` is blank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

impl ErrorResponse {
    /// Parses an error body, returning `None` for empty or non-JSON bodies.
    pub fn parse(body: &str) -> Option<Self> {
        serde_json::from_str(body).ok()
    }

    /// The message when the gateway provided a non-blank one.
    pub fn message(&self) -> Option<&str> {
        let trimmed = self.message.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }
}
