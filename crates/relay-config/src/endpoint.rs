use serde::{Deserialize, Deserializer};

/// Default path of the health check endpoint
pub const HEALTH_PATH: &str = "/health";

/// Default path of the debug echo endpoint
pub const DEBUG_PATH: &str = "/debug";

/// An optional auxiliary endpoint that can be disabled or moved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    pub enabled: bool,
    pub path: String,
}

impl EndpointConfig {
    /// Enabled health check at [`HEALTH_PATH`]
    pub fn health() -> Self {
        Self::enabled_at(HEALTH_PATH)
    }

    /// Enabled debug echo at [`DEBUG_PATH`]
    pub fn debug() -> Self {
        Self::enabled_at(DEBUG_PATH)
    }

    fn enabled_at(path: &str) -> Self {
        Self {
            enabled: true,
            path: path.to_owned(),
        }
    }

    pub(crate) fn deserialize_health<'de, D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        EndpointTable::deserialize(deserializer).map(|table| table.with_default_path(HEALTH_PATH))
    }

    pub(crate) fn deserialize_debug<'de, D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        EndpointTable::deserialize(deserializer).map(|table| table.with_default_path(DEBUG_PATH))
    }
}

/// Raw `[server.<endpoint>]` table; `path` falls back per endpoint
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct EndpointTable {
    #[serde(default = "default_enabled")]
    enabled: bool,
    path: Option<String>,
}

impl EndpointTable {
    fn with_default_path(self, default: &str) -> EndpointConfig {
        EndpointConfig {
            enabled: self.enabled,
            path: self.path.unwrap_or_else(|| default.to_owned()),
        }
    }
}

const fn default_enabled() -> bool {
    true
}
