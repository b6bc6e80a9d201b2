use common::config::{ClientConfig, CLIENT_CONFIG_PATH};
use gloo_console::warn;

/// Loads the host's client configuration, falling back to the defaults when
/// the host does not publish one.
pub async fn load() -> ClientConfig {
    match super::get_json::<ClientConfig>(CLIENT_CONFIG_PATH).await {
        Ok(config) => config.validated(),
        Err(err) => {
            warn!(format!("client configuration unavailable, using defaults: {err}"));
            ClientConfig::default()
        }
    }
}
