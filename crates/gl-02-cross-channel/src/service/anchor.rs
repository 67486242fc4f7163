//! Anchor Verifier and linked-document lookup. Read-only.

use gl_01_spending_contract::Document;
use tracing::{info, warn};

use super::LedgerGateway;
use crate::domain::{
    check_anchor, AnchorSide, AnchorVerification, CrossChannelError, LinkedDocuments,
    VerifyAnchorRequest,
};
use crate::ports::ChannelRegistry;

impl<R: ChannelRegistry> LedgerGateway<R> {
    pub(super) async fn verify(
        &self,
        request: VerifyAnchorRequest,
    ) -> Result<AnchorVerification, CrossChannelError> {
        request.validate()?;
        let source = self
            .anchor_half(AnchorSide::Source, &request.source_channel, &request.source_doc_id)
            .await?;
        let target = self
            .anchor_half(AnchorSide::Target, &request.target_channel, &request.target_doc_id)
            .await?;

        let verification = check_anchor(&request.source_channel, &source, &request.target_channel, &target);
        info!(
            source_doc_id = %verification.source_doc_id,
            target_doc_id = %verification.target_doc_id,
            valid = verification.is_valid,
            mismatches = verification.mismatch_reason.len(),
            "[gl-02] Anchor verified"
        );
        Ok(verification)
    }

    async fn anchor_half(
        &self,
        side: AnchorSide,
        channel: &str,
        id: &str,
    ) -> Result<Document, CrossChannelError> {
        let handle = self.registry.get_contract(channel).await?;
        self.fetch_document_on(handle.as_ref(), channel, id)
            .await
            .map_err(|e| CrossChannelError::AnchorDocument {
                side,
                channel: channel.to_string(),
                doc_id: id.to_string(),
                source: Box::new(e),
            })
    }

    pub(super) async fn linked(&self, channel: &str, id: &str) -> Result<LinkedDocuments, CrossChannelError> {
        let document = self.fetch_document(channel, id).await?;
        if !document.has_link() {
            return Ok(LinkedDocuments {
                document,
                linked_document: None,
                link_verified: false,
            });
        }

        match self
            .fetch_document(&document.linked_channel, &document.linked_doc_id)
            .await
        {
            Ok(linked) => {
                let link_verified = linked.content_hash == document.linked_doc_hash;
                if !link_verified {
                    warn!(
                        doc_id = %document.id,
                        channel = %channel,
                        linked_doc_id = %linked.id,
                        linked_channel = %document.linked_channel,
                        "[gl-02] Linked document hash does not match the recorded anchor"
                    );
                }
                Ok(LinkedDocuments {
                    document,
                    linked_document: Some(linked),
                    link_verified,
                })
            }
            Err(e) => {
                warn!(
                    doc_id = %document.id,
                    channel = %channel,
                    linked_doc_id = %document.linked_doc_id,
                    linked_channel = %document.linked_channel,
                    code = %e.code(),
                    error = %e,
                    "[gl-02] Linked document unavailable"
                );
                Ok(LinkedDocuments {
                    document,
                    linked_document: None,
                    link_verified: false,
                })
            }
        }
    }
}
