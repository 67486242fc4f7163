//! Document Store: creation, status machine, query and history.

use tracing::{debug, info};

use super::{decode, Invocation, SpendingContract};
use crate::domain::{
    content_hash, invariant_can_invalidate, invariant_owner, invariant_required_fields_present,
    invariant_type_active, invariant_valid_id, run_query, ContractError, Document,
    DocumentStatus, HistoryEntry, IdResult, KeyKind, NewDocument, QueryFilter, QueryResult,
    TransactionContext,
};
use crate::ports::WorldState;

const WHAT: &str = "document";

impl<S: WorldState> SpendingContract<S> {
    pub(crate) fn create_doc(
        &self,
        ctx: &TransactionContext,
        request: NewDocument,
    ) -> Result<IdResult, ContractError> {
        let id = if request.id.is_empty() {
            ctx.tx_id.clone()
        } else {
            request.id
        };
        invariant_valid_id("id", &id)?;
        if !request.amount.is_finite() {
            return Err(ContractError::invalid_argument("amount", "must be a finite number"));
        }

        let mut tx = self.begin(ctx);
        if tx.exists(KeyKind::Document, &id)? {
            return Err(ContractError::DocumentExists(id));
        }
        let doc_type = tx.load_type(&request.document_type_id)?;
        invariant_type_active(&doc_type)?;
        invariant_required_fields_present(&doc_type, &request.data)?;

        let link = request.link;
        let doc = Document {
            id,
            document_type_id: request.document_type_id,
            organization_id: ctx.msp_id.clone(),
            channel_id: ctx.channel_id.clone(),
            status: DocumentStatus::Active,
            title: request.title,
            description: request.description,
            amount: request.amount,
            currency: request.currency,
            content_hash: content_hash(&request.data),
            data: request.data,
            linked_doc_id: link.linked_doc_id,
            linked_channel: link.linked_channel,
            linked_doc_hash: link.linked_doc_hash,
            linked_direction: link.linked_direction,
            invalidated_by: String::new(),
            invalidated_at: String::new(),
            invalid_reason: String::new(),
            corrected_by_doc: String::new(),
            created_at: ctx.timestamp.clone(),
            created_by: ctx.client_id.clone(),
            updated_at: ctx.timestamp.clone(),
            updated_by: ctx.client_id.clone(),
            history: vec![ctx.tx_id.clone()],
        };
        tx.put_record(KeyKind::Document, &doc.id, &doc, WHAT)?;
        tx.commit()?;

        info!(
            channel = %ctx.channel_id,
            doc_id = %doc.id,
            type_id = %doc.document_type_id,
            direction = %doc.linked_direction,
            "[gl-01] Document created"
        );
        Ok(IdResult { id: doc.id })
    }

    pub(crate) fn get_doc(&self, ctx: &TransactionContext, id: &str) -> Result<Document, ContractError> {
        self.begin(ctx).load_document(id)
    }

    pub(crate) fn invalidate_doc(
        &self,
        ctx: &TransactionContext,
        id: &str,
        reason: &str,
        correction_doc_id: Option<&str>,
    ) -> Result<(), ContractError> {
        let correction = correction_doc_id.filter(|c| !c.is_empty());
        let mut tx = self.begin(ctx);
        let mut doc = tx.load_document(id)?;
        invariant_can_invalidate(&doc)?;
        invariant_owner(&doc.organization_id, &ctx.msp_id, "invalidate a document")?;
        if let Some(correction) = correction {
            if !tx.exists(KeyKind::Document, correction)? {
                return Err(ContractError::CorrectionDocumentNotFound(correction.to_string()));
            }
        }

        doc.status = DocumentStatus::Invalidated;
        doc.invalidated_by = ctx.client_id.clone();
        doc.invalidated_at = ctx.timestamp.clone();
        doc.invalid_reason = reason.to_string();
        doc.corrected_by_doc = correction.unwrap_or_default().to_string();
        doc.touch(ctx);
        tx.put_record(KeyKind::Document, id, &doc, WHAT)?;
        tx.commit()?;

        info!(channel = %ctx.channel_id, doc_id = %id, "[gl-01] Document invalidated");
        Ok(())
    }

    pub(crate) fn query_docs(&self, filter: &QueryFilter) -> Result<QueryResult, ContractError> {
        let docs: Vec<Document> = self.scan_records(KeyKind::Document, WHAT)?;
        let result = run_query(docs, filter)?;
        debug!(total = result.total, more = result.bookmark.is_some(), "[gl-01] Query executed");
        Ok(result)
    }

    pub(crate) fn doc_history(&self, id: &str) -> Result<Vec<HistoryEntry>, ContractError> {
        let modifications = self.state().history_for_key(&KeyKind::Document.key(id))?;
        if modifications.is_empty() {
            return Err(ContractError::DocumentNotFound(id.to_string()));
        }

        // Documents are never deleted; `is_delete` only mirrors the history shape.
        modifications
            .into_iter()
            .map(|modification| -> Result<HistoryEntry, ContractError> {
                Ok(HistoryEntry {
                    document: decode(&modification.value, WHAT)?,
                    tx_id: modification.tx_id,
                    timestamp: modification.timestamp,
                    is_delete: modification.is_delete,
                })
            })
            .collect()
    }
}

impl<'a, S: WorldState> Invocation<'a, S> {
    pub(super) fn load_document(&mut self, id: &str) -> Result<Document, ContractError> {
        self.get_record(KeyKind::Document, id, WHAT)?
            .ok_or_else(|| ContractError::DocumentNotFound(id.to_string()))
    }
}

impl Document {
    /// Stamp a mutation by `ctx`.
    pub(crate) fn touch(&mut self, ctx: &TransactionContext) {
        self.updated_at = ctx.timestamp.clone();
        self.updated_by = ctx.client_id.clone();
        self.history.push(ctx.tx_id.clone());
    }
}
