//! Agent configuration for the move-proposal client.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Configuration for the move-proposal agent.
///
/// An explicit value passed into construction, never process-global
/// state; two agents with different configs coexist in one process.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Model name served by the endpoint (e.g. "gpt-oss").
    #[serde(default = "default_model")]
    model: String,

    /// Base URL of the Ollama endpoint.
    #[serde(default = "default_base_url")]
    base_url: String,

    /// Per-request deadline in seconds.
    #[serde(default = "default_timeout_seconds")]
    timeout_seconds: u64,
}

fn default_model() -> String {
    "gpt-oss".to_string()
}

fn default_base_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_timeout_seconds() -> u64 {
    60
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            base_url: default_base_url(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl AgentConfig {
    /// Creates a configuration from explicit values.
    #[instrument(fields(model = %model, base_url = %base_url))]
    pub fn new(model: String, base_url: String, timeout_seconds: u64) -> Self {
        Self {
            model,
            base_url,
            timeout_seconds,
        }
    }

    /// Loads configuration from a TOML file.
    ///
    /// Absent fields fall back to their defaults, so a partial file is
    /// valid.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {e}")))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {e}")))?;

        info!(model = %config.model, "Config loaded successfully");
        Ok(config)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_the_local_endpoint() {
        let config = AgentConfig::default();
        assert_eq!(config.model(), "gpt-oss");
        assert_eq!(config.base_url(), "http://localhost:11434");
        assert_eq!(*config.timeout_seconds(), 60);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: AgentConfig =
            toml::from_str("model = \"llama3\"").expect("partial TOML parses");
        assert_eq!(config.model(), "llama3");
        assert_eq!(config.base_url(), "http://localhost:11434");
        assert_eq!(*config.timeout_seconds(), 60);
    }
}
