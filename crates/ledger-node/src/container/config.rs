//! # Node Configuration
//!
//! Unified configuration for the channels, the gateway, storage and
//! telemetry.
//!
//! Sources, lowest precedence first:
//!
//! 1. Built-in defaults (the three government tiers, all writable)
//! 2. An optional TOML file
//! 3. Environment variables (`GL_DATA_DIR`, `GL_DEFAULT_CURRENCY`,
//!    `GL_WRITABLE_CHANNELS`, plus the telemetry variables)

use gl_02_cross_channel::{ChannelConfig, GatewayConfig};
use ledger_telemetry::TelemetryConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Complete node configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    /// Channels this node talks to.
    pub channels: Vec<ChannelConfig>,
    /// Gateway behavior.
    pub gateway: GatewayConfig,
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Log output.
    pub telemetry: TelemetryConfig,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            channels: ChannelConfig::defaults(),
            gateway: GatewayConfig::default(),
            storage: StorageConfig::default(),
            telemetry: TelemetryConfig::default(),
        }
    }
}

/// Storage configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding one world-state snapshot per channel.
    pub data_dir: PathBuf,
    /// Keep world state in memory only.
    pub in_memory: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            in_memory: false,
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("cannot read config file {path}: {reason}")]
    Read {
        /// File path.
        path: String,
        /// I/O message.
        reason: String,
    },

    /// The configuration file is not valid TOML for [`NodeConfig`].
    #[error("invalid config file: {0}")]
    Parse(String),

    /// No channel configured.
    #[error("at least one channel must be configured")]
    NoChannels,

    /// Two channels share a key.
    #[error("duplicate channel key: {0}")]
    DuplicateChannel(String),

    /// A channel has an empty key or name.
    #[error("channel key and name cannot be empty")]
    UnnamedChannel,

    /// A channel has no MSP id.
    #[error("channel {0} has an empty msp_id")]
    EmptyMspId(String),

    /// `GL_WRITABLE_CHANNELS` names a channel that is not configured.
    #[error("writable channel {0} is not configured")]
    UnknownWritableChannel(String),

    /// Gateway settings are unusable.
    #[error("invalid gateway settings: {0}")]
    Gateway(String),
}

impl NodeConfig {
    /// Defaults, then `path` when given, then the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                })?;
                Self::from_toml_str(&text)?
            }
            None => Self::default(),
        };
        let config = config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML document. Absent sections keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply environment overrides read through `lookup`.
    pub fn apply_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        if let Some(dir) = lookup("GL_DATA_DIR").filter(|v| !v.trim().is_empty()) {
            self.storage.data_dir = PathBuf::from(dir);
        }
        if let Some(currency) = lookup("GL_DEFAULT_CURRENCY").filter(|v| !v.trim().is_empty()) {
            self.gateway.default_currency = currency.trim().to_string();
        }
        if let Some(list) = lookup("GL_WRITABLE_CHANNELS") {
            let writable: HashSet<&str> = list
                .split(',')
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .collect();
            if let Some(unknown) = writable
                .iter()
                .find(|k| !self.channels.iter().any(|c| c.key == **k))
            {
                return Err(ConfigError::UnknownWritableChannel(unknown.to_string()));
            }
            for channel in &mut self.channels {
                channel.writable = writable.contains(channel.key.as_str());
            }
        }
        let in_container =
            lookup("KUBERNETES_SERVICE_HOST").is_some() || lookup("DOCKER_CONTAINER").is_some();
        self.telemetry = TelemetryConfig {
            log_level: lookup("GL_LOG_LEVEL")
                .or_else(|| lookup("RUST_LOG"))
                .unwrap_or(self.telemetry.log_level),
            json_logs: lookup("GL_JSON_LOGS")
                .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
                .unwrap_or(self.telemetry.json_logs || in_container),
            ..self.telemetry
        };
        Ok(self)
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.channels.is_empty() {
            return Err(ConfigError::NoChannels);
        }
        let mut seen = HashSet::new();
        for channel in &self.channels {
            if channel.key.trim().is_empty() || channel.name.trim().is_empty() {
                return Err(ConfigError::UnnamedChannel);
            }
            if !seen.insert(channel.key.as_str()) {
                return Err(ConfigError::DuplicateChannel(channel.key.clone()));
            }
            if channel.msp_id.trim().is_empty() {
                return Err(ConfigError::EmptyMspId(channel.key.clone()));
            }
        }
        self.gateway
            .validate()
            .map_err(|e| ConfigError::Gateway(e.to_string()))
    }
}
