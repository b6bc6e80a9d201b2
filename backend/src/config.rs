//! Command line and environment configuration of the host server.

use clap::Parser;
use common::config::ClientConfig;
use std::time::Duration;
use url::Url;

/// Serves the gateway admin client and forwards its API calls to the gateway.
#[derive(Parser, Debug, Clone)]
#[command(name = "gateway-admin-server")]
#[command(version, about, long_about = None)]
pub struct Settings {
    /// Address to listen on
    #[arg(long, env = "GATEWAY_ADMIN_HOST", default_value = "127.0.0.1")]
    pub host: String,

    #[arg(long, env = "GATEWAY_ADMIN_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Base URL of the gateway whose `/api` is forwarded
    #[arg(long, env = "GATEWAY_ADMIN_UPSTREAM", default_value = "http://127.0.0.1:5000")]
    pub upstream: Url,

    /// Seconds to wait for the gateway before answering 502
    #[arg(long, env = "GATEWAY_ADMIN_UPSTREAM_TIMEOUT", default_value_t = 120)]
    pub upstream_timeout_secs: u64,

    /// Delay between two status requests of a bulk task, in milliseconds
    #[arg(long, env = "GATEWAY_ADMIN_POLL_INTERVAL_MS", default_value_t = 3000)]
    pub poll_interval_ms: u32,

    /// Status requests allowed before a bulk task is reported as timed out
    #[arg(long, env = "GATEWAY_ADMIN_MAX_POLL_ATTEMPTS", default_value_t = 100)]
    pub max_poll_attempts: u32,

    /// Default page size of list pages
    #[arg(long, env = "GATEWAY_ADMIN_PAGE_SIZE", default_value_t = 20)]
    pub page_size: u32,

    /// Largest bulk file the client accepts, in bytes
    #[arg(long, env = "GATEWAY_ADMIN_MAX_UPLOAD_SIZE", default_value_t = 10 * 1024 * 1024)]
    pub max_upload_size: u64,

    /// Open the client in the default browser once the server is up
    #[arg(long, env = "GATEWAY_ADMIN_OPEN_BROWSER")]
    pub open_browser: bool,
}

impl Settings {
    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }

    /// The configuration published at `/client-config`.
    pub fn client_config(&self) -> ClientConfig {
        let defaults = ClientConfig::default();
        let mut page_sizes = defaults.page_sizes.clone();
        page_sizes.push(self.page_size);

        ClientConfig {
            poll_interval_ms: self.poll_interval_ms,
            max_poll_attempts: self.max_poll_attempts,
            page_sizes,
            default_page_size: self.page_size,
            max_upload_size: self.max_upload_size,
            ..defaults
        }
        .validated()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_client_defaults() {
        let settings = Settings::try_parse_from(["gateway-admin-server"]).unwrap();

        assert_eq!(settings.url(), "http://127.0.0.1:8080");
        assert_eq!(settings.upstream.as_str(), "http://127.0.0.1:5000/");
        assert_eq!(settings.client_config(), ClientConfig::default());
    }

    #[test]
    fn custom_page_size_is_offered() {
        let settings = Settings::try_parse_from([
            "gateway-admin-server",
            "--page-size",
            "30",
            "--poll-interval-ms",
            "500",
            "--max-poll-attempts",
            "0",
        ])
        .unwrap();
        let config = settings.client_config();

        assert_eq!(config.page_sizes, vec![20, 30, 50, 100]);
        assert_eq!(config.default_page_size, 30);
        assert_eq!(config.poll_interval_ms, 500);
        assert_eq!(config.max_poll_attempts, 1);
    }

    #[test]
    fn rejects_invalid_upstream() {
        assert!(Settings::try_parse_from(["gateway-admin-server", "--upstream", "not a url"]).is_err());
    }
}
