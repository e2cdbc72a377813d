use std::time::Duration;

use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// Anthropic Messages API endpoint
pub const DEFAULT_UPSTREAM_URL: &str = "https://api.anthropic.com/v1/messages";

/// Environment variable holding the upstream credential
pub const API_KEY_ENV: &str = "CLAUDE_API_KEY";

/// Upstream chat-completion API configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpstreamConfig {
    /// Credential sent in the `x-api-key` header
    ///
    /// Falls back to `CLAUDE_API_KEY` when omitted.
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// Full URL of the messages endpoint
    #[serde(default = "default_url")]
    pub url: Url,
    /// Value of the `anthropic-version` header
    #[serde(default = "default_api_version")]
    pub api_version: String,
    /// Output token bound attached to every request
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Model used when the caller sends none, or when overrides are disabled
    #[serde(default = "default_model")]
    pub default_model: String,
    /// Temperature used when the caller sends none, or when overrides are disabled
    #[serde(default = "default_temperature")]
    pub default_temperature: f64,
    /// Honor caller-supplied `model` and `temperature`
    #[serde(default = "default_allow_request_overrides")]
    pub allow_request_overrides: bool,
    /// Upstream request timeout (e.g. "120s", "2m")
    #[serde(default = "default_timeout")]
    pub timeout: String,
    /// Retry attempts after a failed upstream call
    ///
    /// Only `0` is accepted.
    #[serde(default)]
    pub max_retries: u32,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            url: default_url(),
            api_version: default_api_version(),
            max_tokens: default_max_tokens(),
            default_model: default_model(),
            default_temperature: default_temperature(),
            allow_request_overrides: default_allow_request_overrides(),
            timeout: default_timeout(),
            max_retries: 0,
        }
    }
}

impl UpstreamConfig {
    /// Parse the configured timeout
    ///
    /// # Errors
    ///
    /// Returns an error if the timeout is not a valid duration string
    pub fn timeout_duration(&self) -> anyhow::Result<Duration> {
        duration_str::parse(&self.timeout).map_err(|e| anyhow::anyhow!("invalid upstream timeout '{}': {e}", self.timeout))
    }
}

fn default_url() -> Url {
    Url::parse(DEFAULT_UPSTREAM_URL).expect("valid default URL")
}

fn default_api_version() -> String {
    "2023-06-01".to_string()
}

const fn default_max_tokens() -> u32 {
    1000
}

fn default_model() -> String {
    "claude-2.1".to_string()
}

const fn default_temperature() -> f64 {
    0.7
}

const fn default_allow_request_overrides() -> bool {
    true
}

fn default_timeout() -> String {
    "120s".to_string()
}
