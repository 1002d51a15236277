//! Configuration loading and typed config structures for Chowvote.
//!
//! The configuration lives in `chowvote-config.yaml` in the working
//! directory. This module defines strongly-typed structs that mirror the
//! YAML structure and a loader that reads the file. Every field has a
//! default, so an absent file or a partial file is valid.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value (usually an environment override) is out of range.
    #[error("invalid config value: {0}")]
    Invalid(String),
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ChowvoteConfig {
    /// Listening address.
    #[serde(default)]
    pub server: ListenConfig,

    /// Party rules.
    #[serde(default)]
    pub party: PartyConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ChowvoteConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values for the listen address:
    /// - `CHOWVOTE_HOST` overrides `server.host`
    /// - `CHOWVOTE_PORT` overrides `server.port`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if an override does not parse.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string, then apply environment
    /// overrides.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.server.apply_env_overrides()?;
        Ok(config)
    }
}

/// Listening address for the party server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ListenConfig {
    /// Bind host.
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl ListenConfig {
    /// Override the listen address with environment variables when set.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// Override the listen address from an arbitrary variable lookup.
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("CHOWVOTE_HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("CHOWVOTE_PORT") {
            self.port = port
                .parse()
                .map_err(|e| ConfigError::Invalid(format!("CHOWVOTE_PORT={port}: {e}")))?;
        }
        Ok(())
    }
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Party rules.
///
/// Both guards default to off, which lets any member advance any phase
/// at any time.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PartyConfig {
    /// Reject events that do not fit the party's current phase.
    #[serde(default)]
    pub enforce_phase_order: bool,

    /// Only the host may call `start_adding` and `begin_selection`.
    #[serde(default)]
    pub host_only_transitions: bool,

    /// Evict parties idle for longer than this many seconds (0 = never).
    #[serde(default)]
    pub idle_timeout_secs: u64,

    /// How often the idle sweeper runs, in seconds.
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

impl PartyConfig {
    /// The idle timeout, or `None` when eviction is disabled.
    pub const fn idle_timeout(&self) -> Option<Duration> {
        if self.idle_timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.idle_timeout_secs))
        }
    }

    /// The sweep interval, never shorter than one second.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs.max(1))
    }
}

impl Default for PartyConfig {
    fn default() -> Self {
        Self {
            enforce_phase_order: false,
            host_only_transitions: false,
            idle_timeout_secs: 0,
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins when set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_host() -> String {
    String::from("0.0.0.0")
}

const fn default_port() -> u16 {
    5000
}

const fn default_sweep_interval_secs() -> u64 {
    60
}

fn default_log_level() -> String {
    String::from("info")
}
