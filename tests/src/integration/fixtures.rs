//! Shared fixtures for the integration flows.

use async_trait::async_trait;
use gl_02_cross_channel::{
    AcknowledgeTransferRequest, CachedChannelRegistry, ChannelConfig, ChannelConnector,
    ChannelError, ContractHandle, CreateDocumentTypeRequest, DocumentGatewayApi, GatewayConfig,
    InProcessConnector, InitiateTransferRequest, LedgerGateway,
};
use serde_json::Value;
use shared_types::ErrorCode;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub type MemoryGateway = LedgerGateway<CachedChannelRegistry<InProcessConnector>>;
pub type SealedGateway = LedgerGateway<CachedChannelRegistry<SealedSourceConnector>>;

pub const TRANSFER_TYPE: &str = "repasse";

/// Gateway over the three default channels, in memory.
pub fn memory_gateway() -> MemoryGateway {
    let registry = CachedChannelRegistry::new(ChannelConfig::defaults(), InProcessConnector::memory());
    LedgerGateway::new(registry, GatewayConfig::default())
}

/// Register the transfer type on every default channel.
pub async fn register_transfer_type<G: DocumentGatewayApi>(gw: &G) {
    for channel in ["union", "state", "municipal"] {
        gw.create_document_type(
            channel,
            CreateDocumentTypeRequest {
                id: TRANSFER_TYPE.into(),
                name: "Repasse".into(),
                description: "Transferencia entre entes".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    }
}

pub fn object(value: Value) -> serde_json::Map<String, Value> {
    value.as_object().cloned().unwrap_or_default()
}

pub fn initiate(from: &str, to: &str, to_org: &str, amount: f64) -> InitiateTransferRequest {
    InitiateTransferRequest {
        from_channel: from.into(),
        to_channel: to.into(),
        to_org: to_org.into(),
        document_type_id: TRANSFER_TYPE.into(),
        title: "Repasse FPE".into(),
        description: "Fundo de Participacao dos Estados".into(),
        amount,
        currency: "BRL".into(),
        data: object(serde_json::json!({"programa": "FPE", "parcela": 1})),
    }
}

pub fn acknowledge(source_channel: &str, source_doc_id: &str) -> AcknowledgeTransferRequest {
    AcknowledgeTransferRequest {
        source_doc_id: source_doc_id.into(),
        source_channel: source_channel.into(),
        document_type_id: TRANSFER_TYPE.into(),
        title: "Recebimento FPE".into(),
        description: String::new(),
        data: object(serde_json::json!({"conta": "0001"})),
    }
}

/// In-process channels whose source contract refuses every link update.
///
/// Models a source organization that no longer lets the gateway identity
/// write after the transfer was initiated.
pub struct SealedSourceConnector {
    inner: InProcessConnector,
    sealed_channel: String,
    refused: Arc<AtomicUsize>,
}

impl SealedSourceConnector {
    pub fn refused(&self) -> usize {
        self.refused.load(Ordering::SeqCst)
    }
}

struct SealedContract {
    inner: Arc<dyn ContractHandle>,
    refused: Arc<AtomicUsize>,
}

#[async_trait]
impl ContractHandle for SealedContract {
    async fn evaluate(&self, function: &str, args: &[String]) -> Result<Vec<u8>, ChannelError> {
        self.inner.evaluate(function, args).await
    }

    async fn submit(&self, function: &str, args: &[String]) -> Result<Vec<u8>, ChannelError> {
        if function == "UpdateDocumentLink" {
            self.refused.fetch_add(1, Ordering::SeqCst);
            return Err(ChannelError::new(
                ErrorCode::PermissionDenied,
                "only the creating organization may update this document",
            ));
        }
        self.inner.submit(function, args).await
    }
}

#[async_trait]
impl ChannelConnector for SealedSourceConnector {
    async fn connect(&self, channel: &ChannelConfig) -> Result<Arc<dyn ContractHandle>, ChannelError> {
        let inner = self.inner.connect(channel).await?;
        if channel.key != self.sealed_channel {
            return Ok(inner);
        }
        Ok(Arc::new(SealedContract {
            inner,
            refused: self.refused.clone(),
        }))
    }
}

/// Gateway whose `sealed_channel` refuses link-back writes.
pub fn sealed_gateway(sealed_channel: &str) -> SealedGateway {
    let connector = SealedSourceConnector {
        inner: InProcessConnector::memory(),
        sealed_channel: sealed_channel.into(),
        refused: Arc::new(AtomicUsize::new(0)),
    };
    let registry = CachedChannelRegistry::new(ChannelConfig::defaults(), connector);
    LedgerGateway::new(registry, GatewayConfig::default())
}
