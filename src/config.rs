//! Backend configuration

use std::time::Duration;

/// Backend address when nothing is configured
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Assistant greeting shown as the first bot message of a session
pub const DEFAULT_GREETING: &str = "Hello! I'm your SmartSea fishing assistant. Ask me about fishing zones, weather conditions, or border warnings.";

/// Configuration for the HTTP backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    /// Base URL of the marine data / chat service
    pub api_url: String,
    /// Per-request timeout; `None` waits for the transport to resolve
    pub request_timeout: Option<Duration>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout: None,
        }
    }
}

impl BackendConfig {
    /// Read `SMARTSEA_API_URL` and `SMARTSEA_HTTP_TIMEOUT_SECS`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let api_url = lookup("SMARTSEA_API_URL")
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let request_timeout = lookup("SMARTSEA_HTTP_TIMEOUT_SECS")
            .and_then(|secs| secs.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        Self {
            api_url,
            request_timeout,
        }
    }
}
