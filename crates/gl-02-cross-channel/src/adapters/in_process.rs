//! In-Process Contract Adapter
//!
//! Runs each channel's spending contract inside this process, behind the same
//! textual boundary a remote ledger peer would expose.

use async_trait::async_trait;
use gl_01_spending_contract::{
    ContractError, ContractRouter, FileWorldState, InMemoryWorldState, SpendingContract,
    TransactionContext, WorldState,
};
use shared_types::ErrorCode;
use std::path::PathBuf;
use std::sync::Arc;

use crate::domain::{ChannelConfig, ChannelError};
use crate::ports::{ChannelConnector, ContractHandle, IdGenerator, SystemTimeSource, TimeSource, UuidGenerator};

/// Where each channel's world state lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageMode {
    /// Lost when the process exits.
    Memory,
    /// One JSON snapshot per channel under the directory.
    File(PathBuf),
}

/// Connector that instantiates a contract per channel.
pub struct InProcessConnector {
    mode: StorageMode,
    time: Arc<dyn TimeSource>,
    tx_ids: Arc<dyn IdGenerator>,
}

impl InProcessConnector {
    /// Connector with the given storage.
    pub fn new(mode: StorageMode) -> Self {
        Self {
            mode,
            time: Arc::new(SystemTimeSource),
            tx_ids: Arc::new(UuidGenerator),
        }
    }

    /// Memory-backed channels.
    pub fn memory() -> Self {
        Self::new(StorageMode::Memory)
    }

    /// File-backed channels under `data_dir`.
    pub fn file(data_dir: impl Into<PathBuf>) -> Self {
        Self::new(StorageMode::File(data_dir.into()))
    }

    /// Stamp transactions from `time` instead of the wall clock.
    pub fn with_time_source(mut self, time: Arc<dyn TimeSource>) -> Self {
        self.time = time;
        self
    }

    /// Storage used for new channels.
    pub fn mode(&self) -> &StorageMode {
        &self.mode
    }

    fn handle<S: WorldState + 'static>(&self, state: S, channel: &ChannelConfig) -> Arc<dyn ContractHandle> {
        Arc::new(InProcessContract {
            router: Arc::new(ContractRouter::new(SpendingContract::new(state))),
            channel: channel.clone(),
            time: Arc::clone(&self.time),
            tx_ids: Arc::clone(&self.tx_ids),
        })
    }
}

#[async_trait]
impl ChannelConnector for InProcessConnector {
    async fn connect(&self, channel: &ChannelConfig) -> Result<Arc<dyn ContractHandle>, ChannelError> {
        match &self.mode {
            StorageMode::Memory => Ok(self.handle(InMemoryWorldState::new(), channel)),
            StorageMode::File(dir) => {
                let state = FileWorldState::open(dir, &channel.name).map_err(ContractError::from)?;
                Ok(self.handle(state, channel))
            }
        }
    }
}

/// Contract handle bound to one channel and one acting organization.
pub struct InProcessContract<S: WorldState> {
    router: Arc<ContractRouter<SpendingContract<S>>>,
    channel: ChannelConfig,
    time: Arc<dyn TimeSource>,
    tx_ids: Arc<dyn IdGenerator>,
}

impl<S: WorldState + 'static> InProcessContract<S> {
    fn context(&self) -> TransactionContext {
        TransactionContext::new(
            self.tx_ids.next_id(),
            self.channel.name.clone(),
            self.channel.user_name.clone(),
            self.channel.msp_id.clone(),
            self.time.now(),
        )
    }

    async fn run(&self, function: &str, args: &[String], read_only: bool) -> Result<Vec<u8>, ChannelError> {
        let router = Arc::clone(&self.router);
        let ctx = self.context();
        let function = function.to_string();
        let args = args.to_vec();
        // World-state backends block on I/O.
        tokio::task::spawn_blocking(move || {
            if read_only {
                router.evaluate(&ctx, &function, &args)
            } else {
                router.submit(&ctx, &function, &args)
            }
        })
        .await
        .map_err(|e| ChannelError::new(ErrorCode::InternalError, format!("contract task failed: {e}")))?
        .map_err(ChannelError::from)
    }
}

#[async_trait]
impl<S: WorldState + 'static> ContractHandle for InProcessContract<S> {
    async fn evaluate(&self, function: &str, args: &[String]) -> Result<Vec<u8>, ChannelError> {
        self.run(function, args, true).await
    }

    async fn submit(&self, function: &str, args: &[String]) -> Result<Vec<u8>, ChannelError> {
        self.run(function, args, false).await
    }
}
