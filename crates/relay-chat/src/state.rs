use std::sync::Arc;

use relay_config::UpstreamConfig;

use crate::types::OutboundPolicy;
use crate::upstream::{AnthropicUpstream, Upstream};

/// Shared state for chat route handlers
///
/// Read-only after construction; cloned per request.
#[derive(Clone)]
pub struct ChatState {
    inner: Arc<ChatStateInner>,
}

struct ChatStateInner {
    upstream: Box<dyn Upstream>,
    policy: OutboundPolicy,
}

impl ChatState {
    /// Build state backed by the Anthropic upstream described in `config`
    ///
    /// # Errors
    ///
    /// Returns an error if the upstream client cannot be constructed
    pub fn from_config(config: &UpstreamConfig) -> anyhow::Result<Self> {
        let upstream = AnthropicUpstream::new(config)?;

        tracing::info!(
            url = %upstream.url(),
            default_model = %config.default_model,
            allow_request_overrides = config.allow_request_overrides,
            "chat upstream configured"
        );

        Ok(Self::new(upstream, OutboundPolicy::from(config)))
    }

    /// Build state around any upstream implementation
    pub fn new(upstream: impl Upstream + 'static, policy: OutboundPolicy) -> Self {
        Self {
            inner: Arc::new(ChatStateInner {
                upstream: Box::new(upstream),
                policy,
            }),
        }
    }

    pub(crate) fn upstream(&self) -> &dyn Upstream {
        self.inner.upstream.as_ref()
    }

    pub(crate) fn policy(&self) -> &OutboundPolicy {
        &self.inner.policy
    }
}
