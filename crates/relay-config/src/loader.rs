use std::path::Path;

use secrecy::{ExposeSecret, SecretString};

use crate::{API_KEY_ENV, AnyOrArray, CHAT_PATH, Config};

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, fills unset
    /// values from the environment, then deserializes and validates the
    /// result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, environment variable
    /// expansion fails, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        let expanded =
            crate::env::expand_env(&raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let mut config: Self =
            toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.apply_env_fallbacks();
        config.validate()?;

        Ok(config)
    }

    /// Build configuration from defaults and the environment alone
    ///
    /// Used when no config file is present.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails, most commonly because
    /// `CLAUDE_API_KEY` is not set
    pub fn from_env() -> anyhow::Result<Self> {
        let mut config = Self::default();
        config.apply_env_fallbacks();
        config.validate()?;
        Ok(config)
    }

    /// Fill values the file left unset from well-known environment variables
    fn apply_env_fallbacks(&mut self) {
        if self.upstream.api_key.is_none()
            && let Ok(key) = std::env::var(API_KEY_ENV)
        {
            self.upstream.api_key = Some(SecretString::from(key));
        }
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error if the credential is missing, upstream parameters
    /// are out of range, or endpoint paths are malformed or collide
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_upstream()?;
        self.validate_server()?;
        Ok(())
    }

    fn validate_upstream(&self) -> anyhow::Result<()> {
        let upstream = &self.upstream;

        let has_key = upstream
            .api_key
            .as_ref()
            .is_some_and(|key| !key.expose_secret().trim().is_empty());
        if !has_key {
            anyhow::bail!("upstream.api_key is not configured; set it in the config file or export {API_KEY_ENV}");
        }

        if upstream.max_tokens == 0 {
            anyhow::bail!("upstream.max_tokens must be greater than 0");
        }

        if !(0.0..=1.0).contains(&upstream.default_temperature) {
            anyhow::bail!(
                "upstream.default_temperature must be between 0.0 and 1.0, got {}",
                upstream.default_temperature
            );
        }

        if upstream.default_model.trim().is_empty() {
            anyhow::bail!("upstream.default_model must not be empty");
        }

        if upstream.api_version.trim().is_empty() {
            anyhow::bail!("upstream.api_version must not be empty");
        }

        upstream.timeout_duration()?;

        if upstream.max_retries != 0 {
            anyhow::bail!("upstream.max_retries must be 0; retrying upstream calls is not supported");
        }

        Ok(())
    }

    fn validate_server(&self) -> anyhow::Result<()> {
        let server = &self.server;

        if server.body_limit == 0 {
            anyhow::bail!("server.body_limit must be greater than 0");
        }

        let cors = &server.cors;
        if cors.enabled
            && cors.credentials
            && [&cors.origins, &cors.methods, &cors.headers].contains(&&AnyOrArray::Any)
        {
            anyhow::bail!("server.cors.credentials cannot be combined with wildcard origins, methods or headers");
        }

        let mut paths = vec![("chat", CHAT_PATH)];
        if server.health.enabled {
            paths.push(("server.health.path", server.health.path.as_str()));
        }
        if server.debug.enabled {
            paths.push(("server.debug.path", server.debug.path.as_str()));
        }

        for (i, (name, path)) in paths.iter().enumerate() {
            if !path.starts_with('/') {
                anyhow::bail!("{name} must start with '/', got '{path}'");
            }

            if path.split('/').any(is_route_pattern) {
                anyhow::bail!("{name} '{path}' must be a literal path without ':', '*', '{{' or '}}' segments");
            }

            if let Some((other, _)) = paths[..i].iter().find(|(_, p)| p == path) {
                anyhow::bail!("{name} '{path}' collides with {other}");
            }
        }

        Ok(())
    }
}

/// Segments the router would read as captures or wildcards
fn is_route_pattern(segment: &str) -> bool {
    segment.starts_with([':', '*']) || segment.contains(['{', '}'])
}
