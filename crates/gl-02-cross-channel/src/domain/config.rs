//! # Configuration
//!
//! Channel definitions and gateway tuning.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::errors::CrossChannelError;

/// One ledger channel this node talks to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    /// Short key used by clients (`union`, `state`, `municipal`).
    pub key: String,
    /// Ledger channel name (`union-channel`).
    pub name: String,
    /// Organization this node acts as on the channel.
    pub msp_id: String,
    /// Identity recorded as `createdBy`/`updatedBy`.
    pub user_name: String,
    /// Whether this node may submit mutations.
    pub writable: bool,
}

impl ChannelConfig {
    /// A writable channel named `<key>-channel`.
    pub fn new(key: impl Into<String>, msp_id: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            name: format!("{key}-channel"),
            key,
            msp_id: msp_id.into(),
            user_name: "admin".to_string(),
            writable: true,
        }
    }

    /// The three government tiers.
    pub fn defaults() -> Vec<ChannelConfig> {
        vec![
            ChannelConfig::new("union", "UnionMSP"),
            ChannelConfig::new("state", "StateMSP"),
            ChannelConfig::new("municipal", "MunicipalMSP"),
        ]
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            key: String::new(),
            name: String::new(),
            msp_id: String::new(),
            user_name: "admin".to_string(),
            writable: true,
        }
    }
}

/// Gateway behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Currency used when a request leaves it empty.
    pub default_currency: String,
    /// Deadline of read-only calls.
    #[serde(with = "duration_serde")]
    pub evaluate_timeout: Duration,
    /// Deadline of mutating calls.
    #[serde(with = "duration_serde")]
    pub submit_timeout: Duration,
    /// Attempts at the link-back step before giving up.
    pub link_back_attempts: u32,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            default_currency: shared_types::DEFAULT_CURRENCY.to_string(),
            evaluate_timeout: Duration::from_secs(5),
            submit_timeout: Duration::from_secs(15),
            link_back_attempts: 3,
        }
    }
}

impl GatewayConfig {
    /// Reject unusable settings.
    pub fn validate(&self) -> Result<(), CrossChannelError> {
        if self.default_currency.trim().is_empty() {
            return Err(CrossChannelError::Validation(
                "default_currency cannot be empty".into(),
            ));
        }
        if self.evaluate_timeout.is_zero() || self.submit_timeout.is_zero() {
            return Err(CrossChannelError::Validation("timeouts cannot be 0".into()));
        }
        if self.link_back_attempts == 0 {
            return Err(CrossChannelError::Validation(
                "link_back_attempts cannot be 0".into(),
            ));
        }
        Ok(())
    }
}

/// Durations written as `"15s"`, `"500ms"`, `"2m"` or plain seconds.
pub mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    /// Whole seconds as `"Ns"`, anything else as `"Nms"`.
    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if duration.subsec_millis() == 0 {
            serializer.serialize_str(&format!("{}s", duration.as_secs()))
        } else {
            serializer.serialize_str(&format!("{}ms", duration.as_millis()))
        }
    }

    /// Inverse of [`serialize`].
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_duration(&s).map_err(serde::de::Error::custom)
    }

    /// Parse a duration literal.
    pub fn parse_duration(s: &str) -> Result<Duration, &'static str> {
        let s = s.trim();
        // "ms" before "s"
        if let Some(ms) = s.strip_suffix("ms") {
            ms.trim()
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|_| "invalid milliseconds")
        } else if let Some(secs) = s.strip_suffix('s') {
            secs.trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| "invalid seconds")
        } else if let Some(mins) = s.strip_suffix('m') {
            mins.trim()
                .parse::<u64>()
                .map(|m| Duration::from_secs(m * 60))
                .map_err(|_| "invalid minutes")
        } else {
            s.parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| "invalid duration format")
        }
    }
}
