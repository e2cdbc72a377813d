use std::net::SocketAddr;

use serde::Deserialize;

use crate::{cors::CorsConfig, endpoint::EndpointConfig};

/// Path of the chat relay endpoint
pub const CHAT_PATH: &str = "/chat";

/// Default inbound body limit (10 MiB)
pub const DEFAULT_BODY_LIMIT: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    pub listen_address: Option<SocketAddr>,
    /// Maximum accepted request body size in bytes
    #[serde(default = "default_body_limit")]
    pub body_limit: usize,
    #[serde(default = "EndpointConfig::health", deserialize_with = "EndpointConfig::deserialize_health")]
    pub health: EndpointConfig,
    #[serde(default = "EndpointConfig::debug", deserialize_with = "EndpointConfig::deserialize_debug")]
    pub debug: EndpointConfig,
    #[serde(default)]
    pub cors: CorsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_address: None,
            body_limit: DEFAULT_BODY_LIMIT,
            health: EndpointConfig::health(),
            debug: EndpointConfig::debug(),
            cors: CorsConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Address to bind, falling back to `0.0.0.0:3000`
    pub fn listen_address_or_default(&self) -> SocketAddr {
        self.listen_address
            .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)))
    }
}

const fn default_body_limit() -> usize {
    DEFAULT_BODY_LIMIT
}
