//! # Anchor Verification Flows
//!
//! The verifier never writes. It compares the two halves of a transfer on
//! four dimensions: content hash, id, channel and amount.

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use gl_02_cross_channel::{
        AnchorStatus, CreateDocumentRequest, CrossChannelApi, DocumentGatewayApi, MismatchReason,
        VerifyAnchorRequest,
    };
    use shared_types::ErrorCode;

    fn request(source_channel: &str, source: &str, target_channel: &str, target: &str) -> VerifyAnchorRequest {
        VerifyAnchorRequest {
            source_channel: source_channel.into(),
            source_doc_id: source.into(),
            target_channel: target_channel.into(),
            target_doc_id: target.into(),
        }
    }

    #[tokio::test]
    async fn test_end_to_end_transfer_verifies() {
        let gw = memory_gateway();
        register_transfer_type(&gw).await;

        let sent = gw.initiate_transfer(initiate("union", "state", "StateMSP", 1000.0)).await.unwrap();
        let ack = gw.acknowledge_transfer("state", acknowledge("union", &sent.id)).await.unwrap();

        let v = gw.verify_anchor(request("union", &sent.id, "state", &ack.id)).await.unwrap();
        assert!(v.is_valid);
        assert_eq!(v.status, AnchorStatus::Verified);
        assert!(v.hash_match && v.id_match && v.channel_match && v.amount_match);
        assert!(v.mismatch_reason.is_empty());
        assert_eq!(v.source_hash, sent.content_hash);
        assert_eq!(v.target_hash, ack.content_hash);
        assert_eq!(v.source_amount, v.target_amount);

        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json["status"], "VERIFIED");
        assert!(json.get("mismatchReason").is_none());
    }

    #[tokio::test]
    async fn test_unrelated_documents_report_every_mismatch() {
        let gw = memory_gateway();
        register_transfer_type(&gw).await;

        let mut ids = Vec::new();
        for (channel, amount) in [("union", 10.0), ("state", 20.0)] {
            let doc = gw
                .create_document(
                    channel,
                    CreateDocumentRequest {
                        document_type_id: TRANSFER_TYPE.into(),
                        title: "avulso".into(),
                        amount,
                        ..Default::default()
                    },
                )
                .await
                .unwrap();
            ids.push(doc.id);
        }

        let v = gw.verify_anchor(request("union", &ids[0], "state", &ids[1])).await.unwrap();
        assert!(!v.is_valid);
        assert_eq!(v.status, AnchorStatus::Mismatch);
        assert_eq!(
            v.mismatch_reason,
            vec![
                MismatchReason::ContentHash,
                MismatchReason::DocumentId,
                MismatchReason::Channel,
                MismatchReason::Amount,
            ]
        );
        assert!(v.target_linked_hash.is_empty());
    }

    #[tokio::test]
    async fn test_repeated_verification_is_stable_and_writes_nothing() {
        let gw = memory_gateway();
        register_transfer_type(&gw).await;

        let sent = gw.initiate_transfer(initiate("union", "state", "StateMSP", 1000.0)).await.unwrap();
        let ack = gw.acknowledge_transfer("state", acknowledge("union", &sent.id)).await.unwrap();
        let loose = gw
            .create_document(
                "state",
                CreateDocumentRequest {
                    document_type_id: TRANSFER_TYPE.into(),
                    title: "avulso".into(),
                    amount: 999.0,
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        for (source, target) in [(&sent.id, &ack.id), (&sent.id, &loose.id)] {
            let source_before = gw.get_document("union", source).await.unwrap();
            let target_before = gw.get_document("state", target).await.unwrap();
            let source_versions = gw.get_document_history("union", source).await.unwrap().len();
            let target_versions = gw.get_document_history("state", target).await.unwrap().len();

            let first = gw.verify_anchor(request("union", source, "state", target)).await.unwrap();
            let second = gw.verify_anchor(request("union", source, "state", target)).await.unwrap();
            assert_eq!(first, second);
            assert_eq!(first.mismatch_reason, second.mismatch_reason);

            let source_after = gw.get_document("union", source).await.unwrap();
            let target_after = gw.get_document("state", target).await.unwrap();
            assert_eq!(source_after, source_before);
            assert_eq!(target_after, target_before);
            assert_eq!(source_after.content_hash, source_before.content_hash);
            assert_eq!(target_after.linked_doc_id, target_before.linked_doc_id);
            assert_eq!(target_after.linked_doc_hash, target_before.linked_doc_hash);
            assert_eq!(
                gw.get_document_history("union", source).await.unwrap().len(),
                source_versions
            );
            assert_eq!(
                gw.get_document_history("state", target).await.unwrap().len(),
                target_versions
            );
        }

        let verified = gw.verify_anchor(request("union", &sent.id, "state", &ack.id)).await.unwrap();
        assert_eq!(verified.status, AnchorStatus::Verified);
        let mismatch = gw.verify_anchor(request("union", &sent.id, "state", &loose.id)).await.unwrap();
        assert_eq!(mismatch.status, AnchorStatus::Mismatch);
        assert_eq!(
            mismatch.mismatch_reason,
            vec![
                MismatchReason::ContentHash,
                MismatchReason::DocumentId,
                MismatchReason::Channel,
                MismatchReason::Amount,
            ]
        );
    }

    #[tokio::test]
    async fn test_completed_link_verifies_in_both_directions() {
        let gw = memory_gateway();
        register_transfer_type(&gw).await;
        let sent = gw.initiate_transfer(initiate("union", "state", "StateMSP", 75.0)).await.unwrap();
        let ack = gw.acknowledge_transfer("state", acknowledge("union", &sent.id)).await.unwrap();

        // After link-back the source anchors the acknowledgment too.
        let v = gw.verify_anchor(request("state", &ack.id, "union", &sent.id)).await.unwrap();
        assert!(v.is_valid);
        assert_eq!(v.target_linked_hash, ack.content_hash);
    }

    #[tokio::test]
    async fn test_one_sided_link_fails_in_reverse() {
        let gw = sealed_gateway("union");
        register_transfer_type(&gw).await;
        let sent = gw.initiate_transfer(initiate("union", "state", "StateMSP", 75.0)).await.unwrap();
        let ack = gw.acknowledge_transfer("state", acknowledge("union", &sent.id)).await.unwrap();

        let forward = gw.verify_anchor(request("union", &sent.id, "state", &ack.id)).await.unwrap();
        assert!(forward.is_valid);

        let reverse = gw.verify_anchor(request("state", &ack.id, "union", &sent.id)).await.unwrap();
        assert!(!reverse.is_valid);
        assert!(!reverse.hash_match);
        assert!(reverse.amount_match);
    }

    #[tokio::test]
    async fn test_missing_document_names_the_side() {
        let gw = memory_gateway();
        register_transfer_type(&gw).await;
        let sent = gw.initiate_transfer(initiate("union", "state", "StateMSP", 5.0)).await.unwrap();

        let err = gw
            .verify_anchor(request("union", &sent.id, "state", "ghost"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert!(err.to_string().contains("ghost"));

        let err = gw
            .verify_anchor(request("federal", &sent.id, "state", "ghost"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidChannel);
    }
}
