//! Programmatic configuration builder for integration tests

use std::net::SocketAddr;

use relay_config::{Config, CorsConfig, ServerConfig, UpstreamConfig};
use secrecy::SecretString;

/// Credential every test server is configured with
pub const TEST_API_KEY: &str = "sk-ant-test-key";

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder with minimal defaults
    pub fn new() -> Self {
        Self {
            config: Config {
                server: ServerConfig {
                    listen_address: Some(SocketAddr::from(([127, 0, 0, 1], 0))),
                    ..ServerConfig::default()
                },
                upstream: UpstreamConfig {
                    api_key: Some(SecretString::from(TEST_API_KEY)),
                    ..UpstreamConfig::default()
                },
                ..Config::default()
            },
        }
    }

    /// Point the relay at a mock upstream endpoint
    pub fn with_upstream(mut self, url: &str) -> Self {
        self.config.upstream.url = url.parse().expect("valid URL");
        self
    }

    /// Always send the given model and temperature, ignoring caller values
    pub fn with_fixed_model(mut self, model: &str, temperature: f64) -> Self {
        self.config.upstream.default_model = model.to_owned();
        self.config.upstream.default_temperature = temperature;
        self.config.upstream.allow_request_overrides = false;
        self
    }

    /// Set the upstream timeout
    pub fn with_timeout(mut self, timeout: &str) -> Self {
        self.config.upstream.timeout = timeout.to_owned();
        self
    }

    /// Set the inbound body limit in bytes
    pub fn with_body_limit(mut self, limit: usize) -> Self {
        self.config.server.body_limit = limit;
        self
    }

    /// Set CORS configuration
    pub fn with_cors(mut self, config: CorsConfig) -> Self {
        self.config.server.cors = config;
        self
    }

    /// Disable health endpoint
    pub fn without_health(mut self) -> Self {
        self.config.server.health.enabled = false;
        self
    }

    /// Build the final config
    pub fn build(self) -> Config {
        self.config.validate().expect("test config must be valid");
        self.config
    }
}
