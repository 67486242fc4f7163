//! # Ledger Gateway Service
//!
//! Implements [`DocumentGatewayApi`] and [`CrossChannelApi`] over a
//! [`ChannelRegistry`]. Every ledger call is bounded by a deadline and every
//! result is decoded from JSON here, so callers only see typed values and
//! [`CrossChannelError`].

mod anchor;
mod documents;
mod transfer;

use async_trait::async_trait;
use gl_01_spending_contract::{ContractFunction, Document};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::domain::{
    AcknowledgeTransferRequest, AnchorVerification, CrossChannelError, GatewayConfig,
    InitiateTransferRequest, LinkedDocuments, TransferResult, VerifyAnchorRequest,
};
use crate::ports::{
    ChannelRegistry, ContractHandle, CrossChannelApi, IdGenerator, UuidGenerator,
};

/// Typed, deadline-bounded access to every configured channel.
pub struct LedgerGateway<R: ChannelRegistry> {
    registry: R,
    config: GatewayConfig,
    ids: Arc<dyn IdGenerator>,
}

impl<R: ChannelRegistry> LedgerGateway<R> {
    /// Gateway over `registry`.
    pub fn new(registry: R, config: GatewayConfig) -> Self {
        Self {
            registry,
            config,
            ids: Arc::new(UuidGenerator),
        }
    }

    /// Generate document ids with `ids` instead of random UUIDs.
    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    /// The channel registry.
    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// Gateway settings.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Refuse mutations on channels this node may only read.
    pub fn ensure_writable(&self, channel: &str) -> Result<(), CrossChannelError> {
        match self.registry.channel_config(channel) {
            None => Err(CrossChannelError::InvalidChannel(channel.to_string())),
            Some(config) if !config.writable => {
                Err(CrossChannelError::ReadOnlyChannel(channel.to_string()))
            }
            Some(_) => Ok(()),
        }
    }

    fn currency_or_default(&self, currency: &str) -> String {
        if currency.trim().is_empty() {
            self.config.default_currency.clone()
        } else {
            currency.to_string()
        }
    }

    // =========================================================================
    // LEDGER CALLS
    // =========================================================================

    async fn call(
        &self,
        channel: &str,
        function: ContractFunction,
        args: &[String],
    ) -> Result<Vec<u8>, CrossChannelError> {
        let handle = self.registry.get_contract(channel).await?;
        self.call_on(handle.as_ref(), channel, function, args).await
    }

    /// Run `function` on an already resolved handle.
    ///
    /// Read-only functions are evaluated, everything else is submitted.
    async fn call_on(
        &self,
        handle: &dyn ContractHandle,
        channel: &str,
        function: ContractFunction,
        args: &[String],
    ) -> Result<Vec<u8>, CrossChannelError> {
        let read_only = function.is_read_only();
        let deadline = if read_only {
            self.config.evaluate_timeout
        } else {
            self.config.submit_timeout
        };
        debug!(channel = %channel, function = %function, read_only, "[gl-02] Ledger call");

        let call = if read_only {
            handle.evaluate(function.name(), args)
        } else {
            handle.submit(function.name(), args)
        };
        match tokio::time::timeout(deadline, call).await {
            Err(_) => Err(CrossChannelError::Timeout {
                channel: channel.to_string(),
                function: function.name().to_string(),
                after_ms: millis(deadline),
            }),
            Ok(Err(source)) => Err(CrossChannelError::Contract {
                channel: channel.to_string(),
                function: function.name().to_string(),
                source,
            }),
            Ok(Ok(bytes)) => Ok(bytes),
        }
    }

    async fn fetch_document(&self, channel: &str, id: &str) -> Result<Document, CrossChannelError> {
        let handle = self.registry.get_contract(channel).await?;
        self.fetch_document_on(handle.as_ref(), channel, id).await
    }

    async fn fetch_document_on(
        &self,
        handle: &dyn ContractHandle,
        channel: &str,
        id: &str,
    ) -> Result<Document, CrossChannelError> {
        let bytes = self
            .call_on(handle, channel, ContractFunction::GetDocument, &[id.to_string()])
            .await?;
        decode(&bytes, "document")
    }
}

#[async_trait]
impl<R: ChannelRegistry> CrossChannelApi for LedgerGateway<R> {
    async fn initiate_transfer(
        &self,
        request: InitiateTransferRequest,
    ) -> Result<TransferResult, CrossChannelError> {
        self.initiate(request).await
    }

    async fn acknowledge_transfer(
        &self,
        target_channel: &str,
        request: AcknowledgeTransferRequest,
    ) -> Result<TransferResult, CrossChannelError> {
        self.acknowledge(target_channel, request).await
    }

    async fn verify_anchor(
        &self,
        request: VerifyAnchorRequest,
    ) -> Result<AnchorVerification, CrossChannelError> {
        self.verify(request).await
    }

    async fn get_linked_documents(
        &self,
        channel: &str,
        id: &str,
    ) -> Result<LinkedDocuments, CrossChannelError> {
        self.linked(channel, id).await
    }
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

fn decode<T: DeserializeOwned>(bytes: &[u8], what: &'static str) -> Result<T, CrossChannelError> {
    serde_json::from_slice(bytes).map_err(|e| CrossChannelError::Unmarshal {
        what,
        reason: e.to_string(),
    })
}

fn to_json<T: Serialize + ?Sized>(value: &T, what: &str) -> Result<String, CrossChannelError> {
    serde_json::to_string(value).map_err(|e| CrossChannelError::Marshal(format!("{what}: {e}")))
}
