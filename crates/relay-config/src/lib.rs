#![allow(clippy::must_use_candidate)]

pub mod cors;
pub mod endpoint;
mod env;
mod loader;
pub mod server;
pub mod telemetry;
pub mod upstream;

use serde::Deserialize;

pub use cors::*;
pub use endpoint::*;
pub use server::*;
pub use telemetry::*;
pub use upstream::*;

/// Top-level relay configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Listener, endpoint and middleware configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Upstream chat-completion API
    #[serde(default)]
    pub upstream: UpstreamConfig,
    /// Logging configuration
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}
