//! # Transfer Saga Flows
//!
//! ```text
//! union ──InitiateTransfer──→ [source doc, OUTGOING]
//!                                     │
//! state ──AcknowledgeTransfer──→ [ack doc, INCOMING, linked to source]
//!                                     │
//! union ──UpdateDocumentLink──→ [source doc linked to ack]
//! ```
//!
//! 1. **Happy Path**: both halves point at each other
//! 2. **Link-back Failure**: the transfer still succeeds, one-sided
//! 3. **Fatal Steps**: failures before the acknowledgment is written

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use gl_01_spending_contract::LinkDirection;
    use gl_02_cross_channel::{CrossChannelApi, DocumentGatewayApi, TransferStep};
    use shared_types::ErrorCode;

    // =========================================================================
    // HAPPY PATH
    // =========================================================================

    #[tokio::test]
    async fn test_union_to_state_transfer_links_both_halves() {
        let gw = memory_gateway();
        register_transfer_type(&gw).await;

        let sent = gw.initiate_transfer(initiate("union", "state", "StateMSP", 1000.0)).await.unwrap();
        assert!(sent.success);
        assert_eq!(sent.channel, "union");
        assert!(sent.linked_doc_id.is_none());

        let ack = gw.acknowledge_transfer("state", acknowledge("union", &sent.id)).await.unwrap();
        assert_eq!(ack.channel, "state");
        assert_eq!(ack.linked_doc_id.as_deref(), Some(sent.id.as_str()));
        assert_eq!(ack.linked_doc_hash.as_deref(), Some(sent.content_hash.as_str()));
        assert_eq!(ack.linked_channel.as_deref(), Some("union"));

        let source = gw.get_document("union", &sent.id).await.unwrap();
        assert_eq!(source.linked_doc_id, ack.id);
        assert_eq!(source.linked_channel, "state");
        assert_eq!(source.linked_doc_hash, ack.content_hash);
        assert_eq!(source.linked_direction, LinkDirection::Outgoing);
        assert_eq!(source.data["transferType"], "OUTGOING");
        assert_eq!(source.data["targetChannel"], "state");
        assert_eq!(source.data["targetOrg"], "StateMSP");
        // Linking leaves the payload and its hash alone.
        assert_eq!(source.content_hash, sent.content_hash);

        let target = gw.get_document("state", &ack.id).await.unwrap();
        assert_eq!(target.linked_direction, LinkDirection::Incoming);
        assert_eq!(target.amount, 1000.0);
        assert_eq!(target.currency, "BRL");
        assert_eq!(target.organization_id, "StateMSP");
        assert_eq!(target.data["sourceDocId"], sent.id.as_str());
        assert_eq!(target.data["sourceContentHash"], sent.content_hash.as_str());
        assert_eq!(target.data["sourceOrg"], "UnionMSP");
    }

    #[tokio::test]
    async fn test_state_to_municipal_transfer() {
        let gw = memory_gateway();
        register_transfer_type(&gw).await;

        let sent = gw
            .initiate_transfer(initiate("state", "municipal", "MunicipalMSP", 250.5))
            .await
            .unwrap();
        let ack = gw.acknowledge_transfer("municipal", acknowledge("state", &sent.id)).await.unwrap();

        let linked = gw.get_linked_documents("municipal", &ack.id).await.unwrap();
        assert!(linked.link_verified);
        assert_eq!(linked.linked_document.unwrap().amount, 250.5);
    }

    // =========================================================================
    // LINK-BACK FAILURE
    // =========================================================================

    #[tokio::test]
    async fn test_refused_link_back_leaves_asymmetric_link() {
        let gw = sealed_gateway("union");
        register_transfer_type(&gw).await;

        let sent = gw.initiate_transfer(initiate("union", "state", "StateMSP", 1000.0)).await.unwrap();
        let ack = gw.acknowledge_transfer("state", acknowledge("union", &sent.id)).await.unwrap();
        assert!(ack.success);
        // Permission failures are not retried.
        assert_eq!(gw.registry().connector().refused(), 1);

        let source = gw.get_document("union", &sent.id).await.unwrap();
        assert!(source.linked_doc_id.is_empty());

        let from_target = gw.get_linked_documents("state", &ack.id).await.unwrap();
        assert!(from_target.link_verified);
        let from_source = gw.get_linked_documents("union", &sent.id).await.unwrap();
        assert!(from_source.linked_document.is_none());
        assert!(!from_source.link_verified);
    }

    // =========================================================================
    // FATAL STEPS
    // =========================================================================

    #[tokio::test]
    async fn test_acknowledging_missing_source_writes_nothing() {
        let gw = memory_gateway();
        register_transfer_type(&gw).await;

        let err = gw
            .acknowledge_transfer("state", acknowledge("union", "no-such-doc"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::SourceDocNotFound);
        assert_eq!(err.step(), Some(TransferStep::FetchSourceDocument));

        let page = gw.query_documents("state", &Default::default()).await.unwrap();
        assert!(page.documents.is_empty());
    }

    #[tokio::test]
    async fn test_unregistered_type_on_target_fails_acknowledgment() {
        let gw = memory_gateway();
        register_transfer_type(&gw).await;
        let sent = gw.initiate_transfer(initiate("union", "state", "StateMSP", 10.0)).await.unwrap();

        let mut request = acknowledge("union", &sent.id);
        request.document_type_id = "unknown-type".into();
        let err = gw.acknowledge_transfer("state", request).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(err.step(), Some(TransferStep::CreateAckDocument));

        let response = err.to_response("AcknowledgeTransfer");
        assert_eq!(response.context["step"], TransferStep::CreateAckDocument.as_str());
        assert_eq!(response.context["channel"], "state");
    }

    #[tokio::test]
    async fn test_initiate_to_unknown_channel_is_rejected() {
        let gw = memory_gateway();
        register_transfer_type(&gw).await;
        let err = gw
            .initiate_transfer(initiate("union", "federal", "FederalMSP", 10.0))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidChannel);

        let page = gw.query_documents("union", &Default::default()).await.unwrap();
        assert!(page.documents.is_empty());
    }
}
