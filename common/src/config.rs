//! Client configuration published by the host server at `GET /client-config`.
//!
//! Every field has a default so the client keeps working with an older host
//! or when the endpoint is unreachable.

use serde::{Deserialize, Serialize};

/// Path the host server serves the configuration under.
pub const CLIENT_CONFIG_PATH: &str = "/client-config";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientConfig {
    /// Delay between two status requests of a bulk task.
    pub poll_interval_ms: u32,
    /// Status requests allowed before a bulk task is reported as timed out.
    pub max_poll_attempts: u32,
    /// Page sizes offered by list pages.
    pub page_sizes: Vec<u32>,
    pub default_page_size: u32,
    /// Page size used when expanding grouped download events.
    pub child_page_size: u32,
    pub search_debounce_ms: u32,
    /// Largest file the upload step accepts, in bytes.
    pub max_upload_size: u64,
    /// Where the browser is sent when the gateway answers 401.
    pub login_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 3000,
            max_poll_attempts: 100,
            page_sizes: vec![20, 50, 100],
            default_page_size: 20,
            child_page_size: 5,
            search_debounce_ms: 300,
            max_upload_size: 10 * 1024 * 1024,
            login_url: "/api/auth/login".to_string(),
        }
    }
}

impl ClientConfig {
    /// Returns a copy with out-of-range values replaced by usable ones:
    /// zero counts become one, page sizes are sorted and de-duplicated, and
    /// the default page size is always one of the offered sizes.
    pub fn validated(mut self) -> Self {
        let defaults = ClientConfig::default();

        self.max_poll_attempts = self.max_poll_attempts.max(1);
        self.child_page_size = self.child_page_size.max(1);
        self.page_sizes.retain(|size| *size > 0);
        self.page_sizes.sort_unstable();
        self.page_sizes.dedup();
        if self.page_sizes.is_empty() {
            self.page_sizes = defaults.page_sizes;
        }
        if !self.page_sizes.contains(&self.default_page_size) {
            self.default_page_size = self.page_sizes[0];
        }
        if self.login_url.trim().is_empty() {
            self.login_url = defaults.login_url;
        }
        self
    }

    /// `requested` when it is an offered page size, the default otherwise.
    pub fn page_size_or_default(&self, requested: Option<u32>) -> u32 {
        requested
            .filter(|size| self.page_sizes.contains(size))
            .unwrap_or(self.default_page_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"pollIntervalMs": 500, "maxPollAttempts": 7}"#).unwrap();

        assert_eq!(config.poll_interval_ms, 500);
        assert_eq!(config.max_poll_attempts, 7);
        assert_eq!(config.page_sizes, vec![20, 50, 100]);
        assert_eq!(config.login_url, "/api/auth/login");
    }

    #[test]
    fn validated_repairs_inconsistent_values() {
        let config = ClientConfig {
            max_poll_attempts: 0,
            page_sizes: vec![50, 0, 10, 50],
            default_page_size: 20,
            child_page_size: 0,
            login_url: "  ".to_string(),
            ..ClientConfig::default()
        }
        .validated();

        assert_eq!(config.max_poll_attempts, 1);
        assert_eq!(config.page_sizes, vec![10, 50]);
        assert_eq!(config.default_page_size, 10);
        assert_eq!(config.child_page_size, 1);
        assert_eq!(config.login_url, "/api/auth/login");
    }

    #[test]
    fn page_size_must_be_offered() {
        let config = ClientConfig::default();

        assert_eq!(config.page_size_or_default(Some(50)), 50);
        assert_eq!(config.page_size_or_default(Some(33)), 20);
        assert_eq!(config.page_size_or_default(None), 20);
    }
}
