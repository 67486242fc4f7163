//! # Inbound Ports
//!
//! What the gateway offers to the node front door.

use async_trait::async_trait;
use gl_01_spending_contract::{Document, DocumentType, HistoryEntry, QueryFilter, QueryResult};

use crate::domain::{
    AcknowledgeTransferRequest, AnchorVerification, ConfigInfo, CreateDocumentRequest,
    CreateDocumentTypeRequest, CrossChannelError, InitiateTransferRequest,
    InvalidateDocumentRequest, LinkedDocuments, TransferResult, VerifyAnchorRequest,
};

/// Per-channel document operations.
#[async_trait]
pub trait DocumentGatewayApi: Send + Sync {
    /// Register a document type on `channel`. Returns its id.
    async fn create_document_type(
        &self,
        channel: &str,
        request: CreateDocumentTypeRequest,
    ) -> Result<String, CrossChannelError>;

    /// Fetch a document type.
    async fn get_document_type(&self, channel: &str, id: &str) -> Result<DocumentType, CrossChannelError>;

    /// List document types, optionally only those owned by `org`.
    async fn list_document_types(
        &self,
        channel: &str,
        org: Option<&str>,
    ) -> Result<Vec<DocumentType>, CrossChannelError>;

    /// Deactivate a document type.
    async fn deactivate_document_type(&self, channel: &str, id: &str) -> Result<(), CrossChannelError>;

    /// Create an unlinked document. Returns the created document.
    async fn create_document(
        &self,
        channel: &str,
        request: CreateDocumentRequest,
    ) -> Result<Document, CrossChannelError>;

    /// Fetch a document.
    async fn get_document(&self, channel: &str, id: &str) -> Result<Document, CrossChannelError>;

    /// Invalidate a document.
    async fn invalidate_document(
        &self,
        channel: &str,
        id: &str,
        request: InvalidateDocumentRequest,
    ) -> Result<(), CrossChannelError>;

    /// Filtered, paginated search.
    async fn query_documents(
        &self,
        channel: &str,
        filter: &QueryFilter,
    ) -> Result<QueryResult, CrossChannelError>;

    /// Every committed version of a document.
    async fn get_document_history(
        &self,
        channel: &str,
        id: &str,
    ) -> Result<Vec<HistoryEntry>, CrossChannelError>;

    /// Channel configuration visible to clients.
    fn config_info(&self) -> ConfigInfo;
}

/// Cross-channel operations.
#[async_trait]
pub trait CrossChannelApi: Send + Sync {
    /// Create the OUTGOING half of a transfer on the sending channel.
    async fn initiate_transfer(
        &self,
        request: InitiateTransferRequest,
    ) -> Result<TransferResult, CrossChannelError>;

    /// Create the INCOMING half on `target_channel` and link the source back.
    ///
    /// A failed link-back is logged and does not fail the call.
    async fn acknowledge_transfer(
        &self,
        target_channel: &str,
        request: AcknowledgeTransferRequest,
    ) -> Result<TransferResult, CrossChannelError>;

    /// Compare both halves of a transfer. Read-only.
    async fn verify_anchor(
        &self,
        request: VerifyAnchorRequest,
    ) -> Result<AnchorVerification, CrossChannelError>;

    /// A document and, when it has one, its counterpart.
    async fn get_linked_documents(
        &self,
        channel: &str,
        id: &str,
    ) -> Result<LinkedDocuments, CrossChannelError>;
}
