//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `storepilot.toml` in the working directory. Every field has a
//! default so the file is optional, except the account email, which has no
//! sensible default and must come from the file or `STOREPILOT_EMAIL`.
//! Environment variables take precedence over file values.

use chrono::Duration;
use serde::Deserialize;

use storepilot_domain::time::Clock;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Upstream API settings.
    pub upstream: UpstreamConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Session clock settings.
    pub clock: ClockConfig,
}

/// Upstream configuration service.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL of the configuration API.
    pub api_base: String,
    /// Account whose per-store settings are fetched.
    pub email: String,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Session clock correction.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// Fixed offset added to the device clock, in seconds. Use this when
    /// the upstream's clock is known to differ from the local one.
    pub offset_seconds: i64,
}

impl Config {
    /// Load configuration from `storepilot.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// merged configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("storepilot.toml")?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    // Override resolution is separated from the process environment so it
    // can be tested without mutating global state.
    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("STOREPILOT_API_BASE") {
            self.upstream.api_base = val;
        }
        if let Some(val) = var("STOREPILOT_EMAIL") {
            self.upstream.email = val;
        }
        if let Some(val) = var("STOREPILOT_CLOCK_OFFSET_SECS") {
            if let Ok(offset) = val.parse() {
                self.clock.offset_seconds = offset;
            }
        }
        if let Some(val) = var("STOREPILOT_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.upstream.api_base.is_empty() {
            return Err(ConfigError::Validation(
                "upstream.api_base must not be empty".to_string(),
            ));
        }
        if self.upstream.email.is_empty() {
            return Err(ConfigError::Validation(
                "upstream.email must be set (file or STOREPILOT_EMAIL)".to_string(),
            ));
        }
        Ok(())
    }

    /// The session clock described by this configuration.
    #[must_use]
    pub fn clock(&self) -> Clock {
        Clock::with_offset(Duration::seconds(self.clock.offset_seconds))
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            api_base: "http://bcra.store/api/rolex".to_string(),
            email: String::new(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "storepilotd=info,storepilot=info".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
