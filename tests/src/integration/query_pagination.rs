//! # Query and Pagination Flows
//!
//! Ordering is newest first with the id as tiebreak. A bookmark is only
//! handed out while more matches remain.

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use gl_01_spending_contract::{DocumentStatus, LinkDirection, QueryFilter};
    use gl_02_cross_channel::{
        CachedChannelRegistry, ChannelConfig, CreateDocumentRequest, CrossChannelApi,
        DocumentGatewayApi, GatewayConfig, InProcessConnector, InvalidateDocumentRequest,
        LedgerGateway, TimeSource,
    };
    use shared_types::ErrorCode;
    use std::collections::HashSet;
    use std::sync::{Arc, Mutex};

    /// Clock moved by hand.
    struct ManualClock(Mutex<DateTime<Utc>>);

    impl ManualClock {
        fn advance(&self, by: Duration) {
            let mut now = self.0.lock().unwrap();
            *now += by;
        }
    }

    impl TimeSource for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.0.lock().unwrap()
        }
    }

    async fn seed<G: DocumentGatewayApi>(gw: &G, channel: &str, amounts: &[f64]) -> Vec<String> {
        let mut ids = Vec::new();
        for (i, amount) in amounts.iter().enumerate() {
            let doc = gw
                .create_document(
                    channel,
                    CreateDocumentRequest {
                        id: format!("{channel}-{i:02}"),
                        document_type_id: TRANSFER_TYPE.into(),
                        title: format!("Empenho {i}"),
                        amount: *amount,
                        ..Default::default()
                    },
                )
                .await
                .unwrap();
            ids.push(doc.id);
        }
        ids
    }

    #[tokio::test]
    async fn test_page_size_one_walks_every_document_once() {
        let gw = memory_gateway();
        register_transfer_type(&gw).await;
        let created = seed(&gw, "municipal", &[1.0, 2.0, 3.0, 4.0, 5.0]).await;

        let mut filter = QueryFilter {
            page_size: Some(1),
            ..Default::default()
        };
        let mut seen = Vec::new();
        loop {
            let page = gw.query_documents("municipal", &filter).await.unwrap();
            assert_eq!(page.total, page.documents.len());
            assert!(page.total <= 1);
            seen.extend(page.documents.into_iter().map(|d| d.id));
            match page.bookmark {
                Some(bookmark) => filter.bookmark = Some(bookmark),
                None => break,
            }
        }

        assert_eq!(seen.len(), created.len());
        let unique: HashSet<_> = seen.iter().collect();
        assert_eq!(unique.len(), created.len());
    }

    #[tokio::test]
    async fn test_newest_first_and_date_window() {
        let clock = Arc::new(ManualClock(Mutex::new(
            Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap(),
        )));
        let connector = InProcessConnector::memory().with_time_source(clock.clone());
        let registry = CachedChannelRegistry::new(ChannelConfig::defaults(), connector);
        let gw = LedgerGateway::new(registry, GatewayConfig::default());
        register_transfer_type(&gw).await;

        for (i, amount) in [100.0, 200.0, 300.0].into_iter().enumerate() {
            gw.create_document(
                "state",
                CreateDocumentRequest {
                    id: format!("mensal-{i}"),
                    document_type_id: TRANSFER_TYPE.into(),
                    title: "Repasse mensal".into(),
                    amount,
                    ..Default::default()
                },
            )
            .await
            .unwrap();
            clock.advance(Duration::days(30));
        }

        let all = gw.query_documents("state", &QueryFilter::default()).await.unwrap();
        let amounts: Vec<f64> = all.documents.iter().map(|d| d.amount).collect();
        assert_eq!(amounts, vec![300.0, 200.0, 100.0]);
        assert!(all.bookmark.is_none());

        let window = QueryFilter {
            from_date: Some("2024-02-01".into()),
            to_date: Some("2024-03-01".into()),
            ..Default::default()
        };
        let page = gw.query_documents("state", &window).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.documents[0].id, "mensal-1");
    }

    #[tokio::test]
    async fn test_filters_combine() {
        let gw = memory_gateway();
        register_transfer_type(&gw).await;
        let ids = seed(&gw, "union", &[50.0, 500.0, 5000.0]).await;
        gw.invalidate_document(
            "union",
            &ids[1],
            InvalidateDocumentRequest {
                reason: "valor incorreto".into(),
                correction_doc_id: Some(ids[2].clone()),
            },
        )
        .await
        .unwrap();
        let sent = gw.initiate_transfer(initiate("union", "state", "StateMSP", 700.0)).await.unwrap();
        gw.acknowledge_transfer("state", acknowledge("union", &sent.id)).await.unwrap();

        let invalidated = QueryFilter {
            status: Some(DocumentStatus::Invalidated),
            ..Default::default()
        };
        let page = gw.query_documents("union", &invalidated).await.unwrap();
        assert_eq!(page.documents.len(), 1);
        assert_eq!(page.documents[0].corrected_by_doc, ids[2]);

        let amount_band = QueryFilter {
            status: Some(DocumentStatus::Active),
            min_amount: Some(100.0),
            max_amount: Some(1000.0),
            ..Default::default()
        };
        let page = gw.query_documents("union", &amount_band).await.unwrap();
        assert_eq!(page.documents.len(), 1);
        assert_eq!(page.documents[0].id, sent.id);

        let linked = QueryFilter {
            has_linked_doc: Some(true),
            linked_direction: Some(LinkDirection::Outgoing),
            ..Default::default()
        };
        let page = gw.query_documents("union", &linked).await.unwrap();
        assert_eq!(page.documents.len(), 1);

        let by_org = QueryFilter {
            organization_id: Some("StateMSP".into()),
            ..Default::default()
        };
        assert!(gw.query_documents("union", &by_org).await.unwrap().documents.is_empty());
        assert_eq!(gw.query_documents("state", &by_org).await.unwrap().total, 1);
    }

    #[tokio::test]
    async fn test_malformed_bookmark_is_rejected() {
        let gw = memory_gateway();
        let filter = QueryFilter {
            bookmark: Some("not-a-bookmark".into()),
            ..Default::default()
        };
        let err = gw.query_documents("union", &filter).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationFailed);
    }
}
