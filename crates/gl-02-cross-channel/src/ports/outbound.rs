//! # Outbound Ports
//!
//! Traits for external dependencies: ledger channels, identifiers and clocks.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::domain::{ChannelConfig, ChannelError, CrossChannelError};

/// Handle onto one channel's spending contract.
///
/// The boundary is textual: a function name plus positional string
/// arguments in, JSON bytes out.
#[async_trait]
pub trait ContractHandle: Send + Sync {
    /// Run a read-only function.
    async fn evaluate(&self, function: &str, args: &[String]) -> Result<Vec<u8>, ChannelError>;

    /// Run a mutating function. Returns once the write is committed.
    async fn submit(&self, function: &str, args: &[String]) -> Result<Vec<u8>, ChannelError>;
}

/// Opens contract handles.
#[async_trait]
pub trait ChannelConnector: Send + Sync {
    /// Connect to the contract on `channel`.
    async fn connect(&self, channel: &ChannelConfig) -> Result<Arc<dyn ContractHandle>, ChannelError>;
}

/// Channel Connection Registry - outbound port.
///
/// Resolves channel keys to contract handles. A handle, once opened, is
/// reused for every later call on the same key.
#[async_trait]
pub trait ChannelRegistry: Send + Sync {
    /// Handle for `key`. Unknown keys fail `INVALID_CHANNEL`.
    async fn get_contract(&self, key: &str) -> Result<Arc<dyn ContractHandle>, CrossChannelError>;

    /// Configuration of `key`.
    fn channel_config(&self, key: &str) -> Option<ChannelConfig>;

    /// Every configured channel, in configuration order.
    fn channels(&self) -> Vec<ChannelConfig>;
}

/// Source of fresh identifiers.
pub trait IdGenerator: Send + Sync {
    /// A new unique id.
    fn next_id(&self) -> String;
}

/// Random UUID v4 identifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Source of transaction timestamps.
pub trait TimeSource: Send + Sync {
    /// Current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
