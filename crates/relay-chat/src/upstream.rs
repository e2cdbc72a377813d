//! Client for the upstream Messages API

use async_trait::async_trait;
use bytes::Bytes;
use http::StatusCode;
use http::header::HeaderValue;
use relay_config::UpstreamConfig;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde_json::Value;
use url::Url;

use crate::error::ChatError;
use crate::types::OutboundChatRequest;

const API_KEY_HEADER: &str = "x-api-key";
const VERSION_HEADER: &str = "anthropic-version";

/// Successful upstream reply, kept as raw bytes so it is relayed unchanged
#[derive(Debug, Clone)]
pub struct UpstreamReply {
    pub status: StatusCode,
    pub body: Bytes,
}

/// Destination for outbound chat requests
#[async_trait]
pub trait Upstream: Send + Sync {
    /// Forward one request
    ///
    /// Non-success statuses come back as `ChatError::Upstream`, and failures
    /// to obtain any response as `ChatError::Transport`.
    async fn send(&self, request: &OutboundChatRequest) -> Result<UpstreamReply, ChatError>;
}

/// Anthropic Messages API upstream
pub struct AnthropicUpstream {
    client: Client,
    url: Url,
    api_key: HeaderValue,
    api_version: HeaderValue,
}

impl AnthropicUpstream {
    /// Create from upstream configuration
    ///
    /// The credential is copied into a header value marked sensitive so
    /// it never shows up in debug output.
    ///
    /// # Errors
    ///
    /// Returns an error if the credential is missing or not a valid header
    /// value, the timeout does not parse, or the HTTP client cannot be built.
    pub fn new(config: &UpstreamConfig) -> anyhow::Result<Self> {
        let key = config
            .api_key
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("upstream api key is not configured"))?;

        let mut api_key = HeaderValue::from_str(key.expose_secret())
            .map_err(|_| anyhow::anyhow!("upstream api key contains characters not allowed in a header"))?;
        api_key.set_sensitive(true);

        let api_version = HeaderValue::from_str(&config.api_version)
            .map_err(|e| anyhow::anyhow!("invalid upstream api_version '{}': {e}", config.api_version))?;

        let client = Client::builder()
            .timeout(config.timeout_duration()?)
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build upstream HTTP client: {e}"))?;

        Ok(Self {
            client,
            url: config.url.clone(),
            api_key,
            api_version,
        })
    }

    /// Endpoint requests are sent to
    pub const fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl Upstream for AnthropicUpstream {
    async fn send(&self, request: &OutboundChatRequest) -> Result<UpstreamReply, ChatError> {
        let response = self
            .client
            .post(self.url.clone())
            .header(API_KEY_HEADER, self.api_key.clone())
            .header(VERSION_HEADER, self.api_version.clone())
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "upstream request failed");
                ChatError::Transport(e.to_string())
            })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| {
            tracing::error!(%status, error = %e, "failed to read upstream response body");
            ChatError::Transport(e.to_string())
        })?;

        if !status.is_success() {
            let details = error_details(&body);
            tracing::warn!(%status, %details, "upstream returned error");
            return Err(ChatError::Upstream { status, details });
        }

        Ok(UpstreamReply { status, body })
    }
}

/// Upstream error body as JSON, or as a string when it is not JSON
fn error_details(body: &[u8]) -> Value {
    serde_json::from_slice(body).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(body).into_owned()))
}
