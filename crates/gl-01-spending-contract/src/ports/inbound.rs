//! # Inbound Ports (Driving Ports)
//!
//! The operations a channel's ledger program offers. Every call runs inside
//! one transaction described by a [`TransactionContext`]; mutating calls
//! commit atomically or not at all.

use crate::domain::{
    ContractError, Document, DocumentType, HistoryEntry, IdResult, NewDocument, NewDocumentType,
    QueryFilter, QueryResult, TransactionContext,
};

/// Spending contract API.
pub trait SpendingContractApi: Send + Sync {
    // ---- Document Type Registry ----

    /// Register a type owned by the caller's organization.
    ///
    /// Fails `AlreadyExists` when the id is taken.
    fn register_document_type(
        &self,
        ctx: &TransactionContext,
        request: NewDocumentType,
    ) -> Result<IdResult, ContractError>;

    /// Fetch one type.
    fn get_document_type(&self, ctx: &TransactionContext, id: &str) -> Result<DocumentType, ContractError>;

    /// Every type, optionally only those owned by `org_filter`. Never null.
    fn list_document_types(
        &self,
        ctx: &TransactionContext,
        org_filter: Option<&str>,
    ) -> Result<Vec<DocumentType>, ContractError>;

    /// Mark a type inactive. Owner only. Deactivating twice is allowed.
    fn deactivate_document_type(&self, ctx: &TransactionContext, id: &str) -> Result<(), ContractError>;

    // ---- Document Store ----

    /// Create a document in status ACTIVE.
    fn create_document(&self, ctx: &TransactionContext, request: NewDocument) -> Result<IdResult, ContractError>;

    /// Fetch one document.
    fn get_document(&self, ctx: &TransactionContext, id: &str) -> Result<Document, ContractError>;

    /// Move a document to INVALIDATED. Creator only, once.
    fn invalidate_document(
        &self,
        ctx: &TransactionContext,
        id: &str,
        reason: &str,
        correction_doc_id: Option<&str>,
    ) -> Result<(), ContractError>;

    /// Filtered, paginated search.
    fn query_documents(&self, ctx: &TransactionContext, filter: &QueryFilter) -> Result<QueryResult, ContractError>;

    /// Every committed version of a document, oldest first.
    fn get_document_history(&self, ctx: &TransactionContext, id: &str) -> Result<Vec<HistoryEntry>, ContractError>;

    // ---- Link Manager ----

    /// Overwrite the three link target fields. Creator only.
    /// `linkedDirection` is left untouched.
    fn update_document_link(
        &self,
        ctx: &TransactionContext,
        id: &str,
        linked_doc_id: &str,
        linked_channel: &str,
        linked_doc_hash: &str,
    ) -> Result<(), ContractError>;
}
