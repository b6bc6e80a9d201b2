//! Where forwarded API calls go.
//!
//! - `UpstreamState`: a clonable description of the gateway (base URL and
//!   request timeout). It is created in `main.rs` from the command line and
//!   shared with every worker as `web::Data`.
//! - `UpstreamState::client`: builds the `awc::Client` of one worker. The
//!   client is not `Send`, so each worker owns its own instance.

use std::time::Duration;
use url::Url;

#[derive(Debug, Clone)]
pub struct UpstreamState {
    /// Gateway base URL. Any path it carries is kept as a prefix.
    base: Url,
    /// Upper bound for one forwarded request, including large uploads.
    timeout: Duration,
}

impl UpstreamState {
    pub fn new(base: Url, timeout: Duration) -> Self {
        Self { base, timeout }
    }

    /// Absolute gateway URL for a request's path and query.
    pub fn target(&self, path_and_query: &str) -> String {
        let base = self.base.as_str().trim_end_matches('/');
        format!("{base}{path_and_query}")
    }

    /// Redirects are passed back to the browser untouched, so the gateway's
    /// login flow keeps working.
    pub fn client(&self) -> awc::Client {
        awc::Client::builder()
            .disable_redirects()
            .timeout(self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("http://gateway:5000", "/api/users?p=2", "http://gateway:5000/api/users?p=2")]
    #[case("http://gateway:5000/", "/api/auth/check", "http://gateway:5000/api/auth/check")]
    #[case("https://idp.example/admin/", "/api/groups", "https://idp.example/admin/api/groups")]
    fn joins_base_and_request_path(#[case] base: &str, #[case] path: &str, #[case] expected: &str) {
        let state = UpstreamState::new(Url::parse(base).unwrap(), Duration::from_secs(1));
        assert_eq!(state.target(path), expected);
    }
}
