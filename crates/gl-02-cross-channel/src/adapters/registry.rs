//! Channel Connection Registry Adapter
//!
//! Implements `ChannelRegistry` over a `ChannelConnector`, caching one
//! handle per channel key.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::domain::{ChannelConfig, CrossChannelError};
use crate::ports::{ChannelConnector, ChannelRegistry, ContractHandle};

/// Registry that connects lazily and keeps every handle it opened.
pub struct CachedChannelRegistry<C: ChannelConnector> {
    /// Configured channels, in order.
    channels: Vec<ChannelConfig>,
    /// Opens handles on first use.
    connector: C,
    /// Opened handles by channel key.
    handles: RwLock<HashMap<String, Arc<dyn ContractHandle>>>,
}

impl<C: ChannelConnector> CachedChannelRegistry<C> {
    /// Registry over `channels`.
    pub fn new(channels: Vec<ChannelConfig>, connector: C) -> Self {
        Self {
            channels,
            connector,
            handles: RwLock::new(HashMap::new()),
        }
    }

    /// Number of handles opened so far.
    pub fn connected(&self) -> usize {
        self.handles.read().len()
    }

    /// The underlying connector.
    pub fn connector(&self) -> &C {
        &self.connector
    }
}

#[async_trait]
impl<C: ChannelConnector> ChannelRegistry for CachedChannelRegistry<C> {
    async fn get_contract(&self, key: &str) -> Result<Arc<dyn ContractHandle>, CrossChannelError> {
        let cached = self.handles.read().get(key).cloned();
        if let Some(handle) = cached {
            return Ok(handle);
        }

        let config = self
            .channel_config(key)
            .ok_or_else(|| CrossChannelError::InvalidChannel(key.to_string()))?;

        debug!(channel = %key, name = %config.name, "[gl-02] Connecting to channel");
        let handle = self.connector.connect(&config).await.map_err(|e| {
            warn!(channel = %key, error = %e, "[gl-02] Channel connection failed");
            CrossChannelError::ChannelUnavailable {
                channel: key.to_string(),
                reason: e.message,
            }
        })?;

        // A concurrent caller may have connected first; keep its handle.
        let mut handles = self.handles.write();
        let entry = handles.entry(key.to_string()).or_insert_with(|| {
            info!(channel = %key, msp_id = %config.msp_id, "[gl-02] Channel connected");
            handle
        });
        Ok(Arc::clone(entry))
    }

    fn channel_config(&self, key: &str) -> Option<ChannelConfig> {
        self.channels.iter().find(|c| c.key == key).cloned()
    }

    fn channels(&self) -> Vec<ChannelConfig> {
        self.channels.clone()
    }
}
