//! # Node Container
//!
//! Wires the configured channels into a [`LedgerGateway`].

pub mod config;

pub use config::{ConfigError, NodeConfig, StorageConfig};

use gl_02_cross_channel::{CachedChannelRegistry, InProcessConnector, LedgerGateway};
use tracing::info;

/// Gateway type used by the node.
pub type NodeGateway = LedgerGateway<CachedChannelRegistry<InProcessConnector>>;

/// A configured node.
pub struct LedgerNode {
    config: NodeConfig,
    gateway: NodeGateway,
}

impl LedgerNode {
    /// Wire channels, storage and gateway from `config`.
    pub fn new(config: NodeConfig) -> Self {
        let connector = if config.storage.in_memory {
            InProcessConnector::memory()
        } else {
            InProcessConnector::file(config.storage.data_dir.clone())
        };
        info!(
            channels = config.channels.len(),
            data_dir = %config.storage.data_dir.display(),
            in_memory = config.storage.in_memory,
            "[node] Ledger node configured"
        );
        let registry = CachedChannelRegistry::new(config.channels.clone(), connector);
        let gateway = LedgerGateway::new(registry, config.gateway.clone());
        Self { config, gateway }
    }

    /// The node configuration.
    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    /// The gateway every command runs through.
    pub fn gateway(&self) -> &NodeGateway {
        &self.gateway
    }
}
