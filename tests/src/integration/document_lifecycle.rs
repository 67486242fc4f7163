//! # Document Lifecycle Flows
//!
//! 1. **Type Registry**: registration, required fields, deactivation
//! 2. **Invalidation**: one-way, recorded in history
//! 3. **Hashing**: canonical payloads hash equal on every channel
//! 4. **Concurrency**: conflicting writes never both commit
//! 5. **Persistence**: a node reopens what an earlier node wrote

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use gl_01_spending_contract::{
        content_hash, DocumentStatus, InMemoryWorldState, StateError, WorldState, WriteSet,
    };
    use gl_02_cross_channel::{
        CreateDocumentRequest, CreateDocumentTypeRequest, CrossChannelApi, DocumentGatewayApi,
        InvalidateDocumentRequest,
    };
    use ledger_node::{LedgerNode, NodeConfig};
    use serde_json::json;
    use shared_types::ErrorCode;
    use std::sync::Arc;

    fn document(id: &str, type_id: &str, data: serde_json::Value) -> CreateDocumentRequest {
        CreateDocumentRequest {
            id: id.into(),
            document_type_id: type_id.into(),
            title: "Nota de empenho".into(),
            amount: 1200.0,
            data: object(data),
            ..Default::default()
        }
    }

    // =========================================================================
    // TYPE REGISTRY
    // =========================================================================

    #[tokio::test]
    async fn test_required_fields_and_deactivation() {
        let gw = memory_gateway();
        gw.create_document_type(
            "municipal",
            CreateDocumentTypeRequest {
                id: "empenho".into(),
                name: "Nota de Empenho".into(),
                required_fields: vec!["cnpj".into(), "elemento".into()],
                optional_fields: vec!["observacao".into()],
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let err = gw
            .create_document("municipal", document("e-1", "empenho", json!({"cnpj": "00.000"})))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationFailed);
        assert!(err.to_string().contains("elemento"));

        gw.create_document(
            "municipal",
            document("e-2", "empenho", json!({"cnpj": "00.000", "elemento": "3390"})),
        )
        .await
        .unwrap();

        gw.deactivate_document_type("municipal", "empenho").await.unwrap();
        let doc_type = gw.get_document_type("municipal", "empenho").await.unwrap();
        assert!(!doc_type.is_active);
        let err = gw
            .create_document(
                "municipal",
                document("e-3", "empenho", json!({"cnpj": "00.000", "elemento": "3390"})),
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationFailed);

        // Existing documents keep their type.
        assert_eq!(gw.get_document("municipal", "e-2").await.unwrap().document_type_id, "empenho");
    }

    #[tokio::test]
    async fn test_duplicate_type_and_document_ids() {
        let gw = memory_gateway();
        register_transfer_type(&gw).await;
        let err = gw
            .create_document_type(
                "union",
                CreateDocumentTypeRequest {
                    id: TRANSFER_TYPE.into(),
                    name: "Outro".into(),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::AlreadyExists);

        gw.create_document("union", document("d-1", TRANSFER_TYPE, json!({}))).await.unwrap();
        let err = gw
            .create_document("union", document("d-1", TRANSFER_TYPE, json!({})))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::AlreadyExists);
        // The same id is free on another channel.
        gw.create_document("state", document("d-1", TRANSFER_TYPE, json!({}))).await.unwrap();
    }

    #[tokio::test]
    async fn test_empty_channel_lists_nothing() {
        let gw = memory_gateway();
        assert!(gw.list_document_types("union", None).await.unwrap().is_empty());
        let page = gw.query_documents("union", &Default::default()).await.unwrap();
        assert!(page.documents.is_empty());
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["documents"], json!([]));
    }

    // =========================================================================
    // INVALIDATION
    // =========================================================================

    #[tokio::test]
    async fn test_invalidation_is_one_way_and_kept_in_history() {
        let gw = memory_gateway();
        register_transfer_type(&gw).await;
        let original = gw
            .create_document("state", document("nf-1", TRANSFER_TYPE, json!({"valor": 1200})))
            .await
            .unwrap();
        gw.create_document("state", document("nf-2", TRANSFER_TYPE, json!({"valor": 1100})))
            .await
            .unwrap();

        let request = InvalidateDocumentRequest {
            reason: "valor divergente".into(),
            correction_doc_id: Some("nf-2".into()),
        };
        gw.invalidate_document("state", "nf-1", request.clone()).await.unwrap();

        let invalidated = gw.get_document("state", "nf-1").await.unwrap();
        assert_eq!(invalidated.status, DocumentStatus::Invalidated);
        assert_eq!(invalidated.invalid_reason, "valor divergente");
        assert_eq!(invalidated.corrected_by_doc, "nf-2");
        assert_eq!(invalidated.invalidated_by, "admin");
        assert_eq!(invalidated.content_hash, original.content_hash);

        let err = gw.invalidate_document("state", "nf-1", request).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidOperation);

        let history = gw.get_document_history("state", "nf-1").await.unwrap();
        let statuses: Vec<_> = history.iter().map(|h| h.document.status).collect();
        assert_eq!(statuses, vec![DocumentStatus::Active, DocumentStatus::Invalidated]);
        assert!(history.iter().all(|h| !h.is_delete));
    }

    #[tokio::test]
    async fn test_invalidate_with_missing_correction_fails() {
        let gw = memory_gateway();
        register_transfer_type(&gw).await;
        gw.create_document("state", document("nf-1", TRANSFER_TYPE, json!({}))).await.unwrap();
        let err = gw
            .invalidate_document(
                "state",
                "nf-1",
                InvalidateDocumentRequest {
                    reason: "erro".into(),
                    correction_doc_id: Some("ghost".into()),
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(
            gw.get_document("state", "nf-1").await.unwrap().status,
            DocumentStatus::Active
        );
    }

    // =========================================================================
    // HASHING
    // =========================================================================

    #[tokio::test]
    async fn test_key_order_does_not_change_the_hash() {
        let gw = memory_gateway();
        register_transfer_type(&gw).await;

        let mut forward = serde_json::Map::new();
        forward.insert("a".into(), json!(1));
        forward.insert("b".into(), json!({"y": [1, 2], "x": "z"}));
        let mut backward = serde_json::Map::new();
        backward.insert("b".into(), json!({"x": "z", "y": [1, 2]}));
        backward.insert("a".into(), json!(1));

        let mut on_union = document("h-1", TRANSFER_TYPE, json!({}));
        on_union.data = forward.clone();
        let mut on_state = document("h-2", TRANSFER_TYPE, json!({}));
        on_state.data = backward;

        let a = gw.create_document("union", on_union).await.unwrap();
        let b = gw.create_document("state", on_state).await.unwrap();
        assert_eq!(a.content_hash, b.content_hash);
        assert_eq!(a.content_hash, content_hash(&forward));
    }

    // =========================================================================
    // CONCURRENCY
    // =========================================================================

    #[tokio::test]
    async fn test_concurrent_creates_of_one_id_commit_once() {
        let gw = Arc::new(memory_gateway());
        register_transfer_type(gw.as_ref()).await;

        let mut tasks = Vec::new();
        for i in 0..8 {
            let gw = Arc::clone(&gw);
            tasks.push(tokio::spawn(async move {
                gw.create_document(
                    "union",
                    document("contested", TRANSFER_TYPE, json!({"attempt": i})),
                )
                .await
            }));
        }

        let mut committed = 0;
        for task in tasks {
            match task.await.unwrap() {
                Ok(_) => committed += 1,
                Err(err) => assert!(matches!(
                    err.code(),
                    ErrorCode::AlreadyExists | ErrorCode::CommitConflict
                )),
            }
        }
        assert_eq!(committed, 1);
        assert_eq!(gw.get_document_history("union", "contested").await.unwrap().len(), 1);
    }

    #[test]
    fn test_stale_read_is_rejected_atomically() {
        let state = InMemoryWorldState::new();
        let mut first = WriteSet {
            tx_id: "tx-1".into(),
            timestamp: "2026-01-01T00:00:00.000Z".into(),
            ..Default::default()
        };
        first.reads.insert("k".into(), None);
        first.writes.insert("k".into(), b"v1".to_vec());
        state.commit(first.clone()).unwrap();

        // Written against the same snapshot as the first transaction.
        let mut stale = first;
        stale.tx_id = "tx-2".into();
        stale.writes.insert("other".into(), b"x".to_vec());
        let err = state.commit(stale).unwrap_err();
        assert!(matches!(err, StateError::VersionConflict { .. }));
        assert!(state.get_state("other").unwrap().is_none());
        assert_eq!(state.get_state("k").unwrap().unwrap().version, 1);
    }

    // =========================================================================
    // PERSISTENCE
    // =========================================================================

    #[tokio::test]
    async fn test_file_backed_node_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let config = || {
            let mut config = NodeConfig::default();
            config.storage.data_dir = dir.path().to_path_buf();
            config
        };

        let (sent_id, ack_id) = {
            let node = LedgerNode::new(config());
            let gw = node.gateway();
            register_transfer_type(gw).await;
            let sent = gw.initiate_transfer(initiate("union", "municipal", "MunicipalMSP", 42.0)).await.unwrap();
            let ack = gw.acknowledge_transfer("municipal", acknowledge("union", &sent.id)).await.unwrap();
            (sent.id, ack.id)
        };
        assert!(dir.path().join("union-channel.json").exists());
        assert!(dir.path().join("municipal-channel.json").exists());

        let node = LedgerNode::new(config());
        let linked = node.gateway().get_linked_documents("union", &sent_id).await.unwrap();
        assert!(linked.link_verified);
        assert_eq!(linked.linked_document.map(|d| d.id), Some(ack_id));
        let history = node.gateway().get_document_history("union", &sent_id).await.unwrap();
        assert_eq!(history.len(), 2);
    }
}
