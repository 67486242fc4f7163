//! Cross-Channel Link Manager.
//!
//! The only path that changes a document's link fields after creation.
//! `linkedDirection` stays as created, and status is never touched.

use tracing::info;

use super::SpendingContract;
use crate::domain::{invariant_owner, ContractError, KeyKind, TransactionContext};
use crate::ports::WorldState;

impl<S: WorldState> SpendingContract<S> {
    pub(crate) fn update_link(
        &self,
        ctx: &TransactionContext,
        id: &str,
        linked_doc_id: &str,
        linked_channel: &str,
        linked_doc_hash: &str,
    ) -> Result<(), ContractError> {
        let mut tx = self.begin(ctx);
        let mut doc = tx.load_document(id)?;
        invariant_owner(&doc.organization_id, &ctx.msp_id, "update document links")?;

        doc.linked_doc_id = linked_doc_id.to_string();
        doc.linked_channel = linked_channel.to_string();
        doc.linked_doc_hash = linked_doc_hash.to_string();
        doc.touch(ctx);
        tx.put_record(KeyKind::Document, id, &doc, "document")?;
        tx.commit()?;

        info!(
            channel = %ctx.channel_id,
            doc_id = %id,
            linked_doc_id = %linked_doc_id,
            linked_channel = %linked_channel,
            "[gl-01] Document link updated"
        );
        Ok(())
    }
}
