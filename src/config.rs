//! Gateway configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the API gateway.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Application origin (e.g. `https://app.talentgate.io`).
    ///
    /// Same-origin-forced paths always resolve against this, and it is the
    /// fallback base for every relative path when `api_base_url` is unset.
    pub origin: String,

    /// Optional API base URL (e.g. `https://api.talentgate.io`).
    #[serde(default)]
    pub api_base_url: Option<String>,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_timeout() -> u64 {
    30
}

impl GatewayConfig {
    /// Create a configuration for the given application origin.
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            api_base_url: None,
            timeout_secs: default_timeout(),
        }
    }

    /// Set the API base URL.
    pub fn with_api_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.api_base_url = Some(base_url.into());
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}
