//! Runtime configuration for the relay and the local front end.

use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Settings loaded from an optional TOML file and overridden by CLI flags.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
pub struct NoughtsConfig {
    /// Interface the relay binds to.
    #[serde(default = "default_host")]
    host: String,

    /// Port the relay listens on.
    #[serde(default = "default_port")]
    port: u16,

    /// Seconds an empty lobby survives before it is dropped.
    #[serde(default = "default_disposal_grace_secs")]
    disposal_grace_secs: u64,

    /// Cosmetic pause before the computer's move is shown, in milliseconds.
    #[serde(default = "default_thinking_delay_ms")]
    thinking_delay_ms: u64,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_disposal_grace_secs() -> u64 {
    60
}

fn default_thinking_delay_ms() -> u64 {
    600
}

impl Default for NoughtsConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            disposal_grace_secs: default_disposal_grace_secs(),
            thinking_delay_ms: default_thinking_delay_ms(),
        }
    }
}

impl NoughtsConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(host = %config.host, port = config.port, "Config loaded successfully");
        Ok(config)
    }

    /// Loads the file if given and present, defaults otherwise.
    #[instrument]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) if path.exists() => Self::from_file(path),
            Some(path) => {
                info!("Config file not found at {}, using defaults", path.display());
                Ok(Self::default())
            }
            None => Ok(Self::default()),
        }
    }

    /// Disposal grace period.
    pub fn disposal_grace(&self) -> Duration {
        Duration::from_secs(self.disposal_grace_secs)
    }

    /// Thinking delay for computer moves.
    pub fn thinking_delay(&self) -> Duration {
        Duration::from_millis(self.thinking_delay_ms)
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
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port = 8080").unwrap();
        let config = NoughtsConfig::from_file(file.path()).unwrap();
        assert_eq!(*config.port(), 8080);
        assert_eq!(config.host(), "127.0.0.1");
        assert_eq!(config.disposal_grace(), Duration::from_secs(60));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = NoughtsConfig::load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config, NoughtsConfig::default());
    }

    #[test]
    fn test_bad_file_reports_location() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port = \"many\"").unwrap();
        let err = NoughtsConfig::from_file(file.path()).unwrap_err();
        assert!(err.message.contains("Failed to parse config"));
        assert!(err.file.ends_with("config.rs"));
    }

    #[test]
    fn test_setters_override() {
        let config = NoughtsConfig::default()
            .with_port(4000)
            .with_thinking_delay_ms(0);
        assert_eq!(*config.port(), 4000);
        assert_eq!(config.thinking_delay(), Duration::ZERO);
    }
}
