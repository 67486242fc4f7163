//! Document Type Registry.

use tracing::info;

use super::{SpendingContract, Invocation};
use crate::domain::{
    invariant_owner, invariant_valid_id, ContractError, DocumentType, IdResult, KeyKind,
    NewDocumentType, TransactionContext,
};
use crate::ports::WorldState;

const WHAT: &str = "document type";

impl<S: WorldState> SpendingContract<S> {
    pub(crate) fn register_type(
        &self,
        ctx: &TransactionContext,
        request: NewDocumentType,
    ) -> Result<IdResult, ContractError> {
        invariant_valid_id("id", &request.id)?;
        let mut tx = self.begin(ctx);
        if tx.exists(KeyKind::DocumentType, &request.id)? {
            return Err(ContractError::DocumentTypeExists(request.id));
        }

        let doc_type = DocumentType {
            id: request.id,
            organization_id: ctx.msp_id.clone(),
            name: request.name,
            description: request.description,
            required_fields: request.required_fields,
            optional_fields: request.optional_fields,
            created_at: ctx.timestamp.clone(),
            created_by: ctx.client_id.clone(),
            is_active: true,
        };
        tx.put_record(KeyKind::DocumentType, &doc_type.id, &doc_type, WHAT)?;
        tx.commit()?;

        info!(
            channel = %ctx.channel_id,
            type_id = %doc_type.id,
            org = %doc_type.organization_id,
            "[gl-01] Document type registered"
        );
        Ok(IdResult { id: doc_type.id })
    }

    pub(crate) fn get_type(&self, ctx: &TransactionContext, id: &str) -> Result<DocumentType, ContractError> {
        self.begin(ctx).load_type(id)
    }

    pub(crate) fn list_types(&self, org_filter: Option<&str>) -> Result<Vec<DocumentType>, ContractError> {
        let org_filter = org_filter.filter(|o| !o.is_empty());
        let mut types: Vec<DocumentType> = self.scan_records(KeyKind::DocumentType, WHAT)?;
        if let Some(org) = org_filter {
            types.retain(|t| t.organization_id == org);
        }
        Ok(types)
    }

    pub(crate) fn deactivate_type(&self, ctx: &TransactionContext, id: &str) -> Result<(), ContractError> {
        let mut tx = self.begin(ctx);
        let mut doc_type = tx.load_type(id)?;
        invariant_owner(&doc_type.organization_id, &ctx.msp_id, "deactivate a document type")?;

        doc_type.is_active = false;
        tx.put_record(KeyKind::DocumentType, id, &doc_type, WHAT)?;
        tx.commit()?;

        info!(channel = %ctx.channel_id, type_id = %id, "[gl-01] Document type deactivated");
        Ok(())
    }
}

impl<'a, S: WorldState> Invocation<'a, S> {
    pub(super) fn load_type(&mut self, id: &str) -> Result<DocumentType, ContractError> {
        self.get_record(KeyKind::DocumentType, id, WHAT)?
            .ok_or_else(|| ContractError::DocumentTypeNotFound(id.to_string()))
    }
}
