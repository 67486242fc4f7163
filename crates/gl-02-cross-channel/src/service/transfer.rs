//! Transfer Coordinator
//!
//! The initiate → acknowledge → link-back saga. Channels share no
//! transaction, so each step commits on its own:
//!
//! 1. Initiate on the source channel. Fatal on failure.
//! 2. Acknowledge on the target channel. Fatal on failure.
//! 3. Link the source back to the acknowledgment. Retried while retriable,
//!    then logged and swallowed; the target half is already committed.

use gl_01_spending_contract::{ContractFunction, DocumentData, LinkDirection};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::LedgerGateway;
use crate::domain::{
    AcknowledgeTransferRequest, CrossChannelError, InitiateTransferRequest, TransferResult,
    TransferStep,
};
use crate::ports::{ChannelRegistry, ContractHandle};

/// Base delay between link-back attempts, multiplied by the attempt number.
pub const LINK_BACK_BACKOFF: Duration = Duration::from_millis(50);

impl<R: ChannelRegistry> LedgerGateway<R> {
    pub(super) async fn initiate(
        &self,
        request: InitiateTransferRequest,
    ) -> Result<TransferResult, CrossChannelError> {
        request.validate()?;
        let from = request.from_channel.clone();
        let to = request.to_channel.clone();
        if self.registry.channel_config(&to).is_none() {
            return Err(CrossChannelError::InvalidChannel(to));
        }

        self.ensure_writable(&from)
            .map_err(|e| e.at_step(TransferStep::GetSourceContract))?;
        let source = self
            .registry
            .get_contract(&from)
            .await
            .map_err(|e| e.at_step(TransferStep::GetSourceContract))?;

        let transfer_id = self.ids.next_id();
        let mut data = request.data;
        insert(&mut data, "transferType", LinkDirection::Outgoing.as_str());
        insert(&mut data, "targetOrg", &request.to_org);
        insert(&mut data, "targetChannel", &to);
        let data_json = super::to_json(&data, "data")?;

        let args = vec![
            transfer_id.clone(),
            request.document_type_id,
            request.title,
            request.description,
            request.amount.to_string(),
            self.currency_or_default(&request.currency),
            data_json,
            String::new(),
            String::new(),
            String::new(),
            LinkDirection::Outgoing.as_str().to_string(),
        ];
        self.call_on(source.as_ref(), &from, ContractFunction::CreateDocument, &args)
            .await
            .map_err(|e| e.at_step(TransferStep::CreateSourceDocument))?;

        // The ledger's hash is authoritative.
        let created = self
            .fetch_document_on(source.as_ref(), &from, &transfer_id)
            .await
            .map_err(|e| e.at_step(TransferStep::VerifySourceDocument))?;

        info!(
            transfer_id = %created.id,
            channel = %from,
            to_channel = %to,
            amount = created.amount,
            content_hash = %created.content_hash,
            "[gl-02] Transfer initiated"
        );

        Ok(TransferResult {
            success: true,
            id: created.id,
            content_hash: created.content_hash,
            channel: from,
            linked_doc_id: None,
            linked_doc_hash: None,
            linked_channel: None,
        })
    }

    pub(super) async fn acknowledge(
        &self,
        target_channel: &str,
        request: AcknowledgeTransferRequest,
    ) -> Result<TransferResult, CrossChannelError> {
        request.validate()?;
        if request.source_channel == target_channel {
            return Err(CrossChannelError::Validation(
                "sourceChannel and target channel must differ".into(),
            ));
        }
        self.ensure_writable(target_channel)
            .map_err(|e| e.at_step(TransferStep::GetTargetContract))?;

        let source_channel = request.source_channel.clone();
        let source_handle = self
            .registry
            .get_contract(&source_channel)
            .await
            .map_err(|e| e.at_step(TransferStep::FetchSourceDocument))?;
        let source = self
            .fetch_document_on(source_handle.as_ref(), &source_channel, &request.source_doc_id)
            .await
            .map_err(|e| {
                let doc_id = request.source_doc_id.clone();
                let err = if e.code() == shared_types::ErrorCode::NotFound {
                    CrossChannelError::SourceDocNotFound {
                        channel: source_channel.clone(),
                        doc_id,
                    }
                } else {
                    CrossChannelError::SourceDocUnavailable {
                        channel: source_channel.clone(),
                        doc_id,
                        source: Box::new(e),
                    }
                };
                err.at_step(TransferStep::FetchSourceDocument)
            })?;

        let target = self
            .registry
            .get_contract(target_channel)
            .await
            .map_err(|e| e.at_step(TransferStep::GetTargetContract))?;

        let ack_id = self.ids.next_id();
        let mut data = request.data;
        insert(&mut data, "transferType", LinkDirection::Incoming.as_str());
        insert(&mut data, "sourceDocId", &source.id);
        insert(&mut data, "sourceChannel", &source_channel);
        insert(&mut data, "sourceContentHash", &source.content_hash);
        insert(&mut data, "sourceOrg", &source.organization_id);
        let data_json = super::to_json(&data, "data")?;

        // Amount and currency come from the source, never from the request.
        let args = vec![
            ack_id.clone(),
            request.document_type_id,
            request.title,
            request.description,
            source.amount.to_string(),
            source.currency.clone(),
            data_json,
            source.id.clone(),
            source_channel.clone(),
            source.content_hash.clone(),
            LinkDirection::Incoming.as_str().to_string(),
        ];
        self.call_on(target.as_ref(), target_channel, ContractFunction::CreateDocument, &args)
            .await
            .map_err(|e| e.at_step(TransferStep::CreateAckDocument))?;

        let ack = self
            .fetch_document_on(target.as_ref(), target_channel, &ack_id)
            .await
            .map_err(|e| e.at_step(TransferStep::VerifyAckDocument))?;

        let linked = self
            .link_back(
                source_handle.as_ref(),
                &source_channel,
                &source.id,
                target_channel,
                &ack.id,
                &ack.content_hash,
            )
            .await;

        info!(
            transfer_id = %source.id,
            ack_id = %ack.id,
            channel = %target_channel,
            source_channel = %source_channel,
            amount = ack.amount,
            linked,
            "[gl-02] Transfer acknowledged"
        );

        Ok(TransferResult {
            success: true,
            id: ack.id,
            content_hash: ack.content_hash,
            channel: target_channel.to_string(),
            linked_doc_id: Some(source.id),
            linked_doc_hash: Some(source.content_hash),
            linked_channel: Some(source_channel),
        })
    }

    /// Point the source document at the acknowledgment.
    ///
    /// Returns whether the link was established. Never fails the saga.
    async fn link_back(
        &self,
        source: &dyn ContractHandle,
        source_channel: &str,
        source_id: &str,
        target_channel: &str,
        ack_id: &str,
        ack_hash: &str,
    ) -> bool {
        let args = [
            source_id.to_string(),
            ack_id.to_string(),
            target_channel.to_string(),
            ack_hash.to_string(),
        ];
        let attempts = self.config.link_back_attempts.max(1);

        for attempt in 1..=attempts {
            let err = match self
                .call_on(source, source_channel, ContractFunction::UpdateDocumentLink, &args)
                .await
            {
                Ok(_) => {
                    debug!(transfer_id = %source_id, ack_id = %ack_id, attempt, "[gl-02] Link-back committed");
                    return true;
                }
                Err(err) => err.at_step(TransferStep::UpdateLink),
            };

            if err.is_retriable() && attempt < attempts {
                debug!(
                    transfer_id = %source_id,
                    attempt,
                    error = %err,
                    "[gl-02] Link-back failed, retrying"
                );
                tokio::time::sleep(LINK_BACK_BACKOFF * attempt).await;
                continue;
            }

            warn!(
                transfer_id = %source_id,
                ack_id = %ack_id,
                channel = %source_channel,
                code = %err.code(),
                attempts = attempt,
                error = %err,
                "[gl-02] Transfer completed but bidirectional link not established"
            );
            return false;
        }
        false
    }
}

fn insert(data: &mut DocumentData, key: &str, value: &str) {
    data.insert(key.to_string(), Value::String(value.to_string()));
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::domain::{AnchorStatus, ChannelConfig, CreateDocumentRequest};
    use crate::ports::{CrossChannelApi, DocumentGatewayApi};
    use gl_01_spending_contract::DocumentStatus;
    use shared_types::ErrorCode;

    fn initiate_request() -> InitiateTransferRequest {
        InitiateTransferRequest {
            from_channel: "union".into(),
            to_channel: "state".into(),
            to_org: "StateMSP".into(),
            document_type_id: "repasse".into(),
            title: "FPE janeiro".into(),
            description: "Fundo de participação".into(),
            amount: 1000.0,
            currency: String::new(),
            data: Default::default(),
        }
    }

    fn ack_request(source_doc_id: &str) -> AcknowledgeTransferRequest {
        AcknowledgeTransferRequest {
            source_doc_id: source_doc_id.into(),
            source_channel: "union".into(),
            document_type_id: "repasse".into(),
            title: "Recebimento FPE".into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_initiate_creates_outgoing_document() {
        let gw = gateway();
        register_transfer_type(&gw).await;
        let result = gw.initiate_transfer(initiate_request()).await.unwrap();
        assert!(result.success);
        assert_eq!(result.channel, "union");
        assert!(result.linked_doc_id.is_none());

        let doc = gw.get_document("union", &result.id).await.unwrap();
        assert_eq!(doc.content_hash, result.content_hash);
        assert_eq!(doc.linked_direction, LinkDirection::Outgoing);
        assert!(doc.linked_doc_id.is_empty());
        assert_eq!(doc.currency, "BRL");
        assert_eq!(doc.data["transferType"], "OUTGOING");
        assert_eq!(doc.data["targetOrg"], "StateMSP");
        assert_eq!(doc.data["targetChannel"], "state");
    }

    #[tokio::test]
    async fn test_acknowledge_links_both_halves() {
        let gw = gateway();
        register_transfer_type(&gw).await;
        let sent = gw.initiate_transfer(initiate_request()).await.unwrap();

        let mut request = ack_request(&sent.id);
        request.data.insert("amount".into(), Value::from(1.0));
        let ack = gw.acknowledge_transfer("state", request).await.unwrap();
        assert_eq!(ack.channel, "state");
        assert_eq!(ack.linked_doc_id.as_deref(), Some(sent.id.as_str()));
        assert_eq!(ack.linked_doc_hash.as_deref(), Some(sent.content_hash.as_str()));
        assert_eq!(ack.linked_channel.as_deref(), Some("union"));

        let incoming = gw.get_document("state", &ack.id).await.unwrap();
        assert_eq!(incoming.amount, 1000.0);
        assert_eq!(incoming.currency, "BRL");
        assert_eq!(incoming.linked_direction, LinkDirection::Incoming);
        assert_eq!(incoming.data["sourceOrg"], "UnionMSP");
        assert_eq!(incoming.data["sourceContentHash"], sent.content_hash.as_str());

        let outgoing = gw.get_document("union", &sent.id).await.unwrap();
        assert_eq!(outgoing.linked_doc_id, ack.id);
        assert_eq!(outgoing.linked_channel, "state");
        assert_eq!(outgoing.linked_doc_hash, ack.content_hash);
        assert_eq!(outgoing.linked_direction, LinkDirection::Outgoing);
        assert_eq!(outgoing.content_hash, sent.content_hash);
        assert_eq!(outgoing.status, DocumentStatus::Active);
        assert_eq!(link_calls(&gw), 1);
    }

    #[tokio::test]
    async fn test_link_back_retries_retriable_failures() {
        let gw = gateway_with(ChannelConfig::defaults(), 2);
        register_transfer_type(&gw).await;
        let sent = gw.initiate_transfer(initiate_request()).await.unwrap();
        let ack = gw.acknowledge_transfer("state", ack_request(&sent.id)).await.unwrap();

        assert_eq!(link_calls(&gw), 3);
        let outgoing = gw.get_document("union", &sent.id).await.unwrap();
        assert_eq!(outgoing.linked_doc_id, ack.id);
    }

    #[tokio::test]
    async fn test_link_back_failure_is_swallowed() {
        let gw = gateway_with(ChannelConfig::defaults(), usize::MAX);
        register_transfer_type(&gw).await;
        let sent = gw.initiate_transfer(initiate_request()).await.unwrap();
        let ack = gw.acknowledge_transfer("state", ack_request(&sent.id)).await.unwrap();
        assert!(ack.success);
        assert_eq!(link_calls(&gw), 3);

        // Target points at the source; the source never learned about the target.
        let outgoing = gw.get_document("union", &sent.id).await.unwrap();
        assert!(outgoing.linked_doc_id.is_empty());
        let linked = gw.get_linked_documents("state", &ack.id).await.unwrap();
        assert!(linked.link_verified);

        let anchor = gw
            .verify_anchor(crate::domain::VerifyAnchorRequest {
                source_channel: "union".into(),
                source_doc_id: sent.id,
                target_channel: "state".into(),
                target_doc_id: ack.id,
            })
            .await
            .unwrap();
        assert_eq!(anchor.status, AnchorStatus::Verified);
    }

    #[tokio::test]
    async fn test_acknowledge_missing_source() {
        let gw = gateway();
        register_transfer_type(&gw).await;
        let err = gw
            .acknowledge_transfer("state", ack_request("does-not-exist"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::SourceDocNotFound);
        assert_eq!(err.step(), Some(TransferStep::FetchSourceDocument));
        assert!(gw
            .query_documents("state", &Default::default())
            .await
            .unwrap()
            .documents
            .is_empty());
    }

    #[tokio::test]
    async fn test_initiate_with_unregistered_type_fails_at_create() {
        let gw = gateway();
        let err = gw.initiate_transfer(initiate_request()).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(err.step(), Some(TransferStep::CreateSourceDocument));
        let response = err.to_response("InitiateTransfer");
        assert_eq!(response.context["step"], "create_source_document");
        assert_eq!(response.context["channel"], "union");
    }

    #[tokio::test]
    async fn test_initiate_rejects_bad_requests() {
        let gw = gateway();
        let mut same = initiate_request();
        same.to_channel = "union".into();
        assert_eq!(
            gw.initiate_transfer(same).await.unwrap_err().code(),
            ErrorCode::ValidationFailed
        );

        let mut unknown = initiate_request();
        unknown.to_channel = "federal".into();
        assert_eq!(
            gw.initiate_transfer(unknown).await.unwrap_err().code(),
            ErrorCode::InvalidChannel
        );
    }

    #[tokio::test]
    async fn test_acknowledge_on_read_only_target() {
        let mut channels = ChannelConfig::defaults();
        channels[1].writable = false;
        let gw = gateway_with(channels, 0);
        let doc = gw
            .create_document_type("union", crate::domain::CreateDocumentTypeRequest {
                id: "repasse".into(),
                name: "Repasse".into(),
                ..Default::default()
            })
            .await;
        assert!(doc.is_ok());
        let sent = gw.initiate_transfer(initiate_request()).await.unwrap();
        let err = gw.acknowledge_transfer("state", ack_request(&sent.id)).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::PermissionDenied);
        assert_eq!(err.step(), Some(TransferStep::GetTargetContract));

        // Plain document creation is unaffected elsewhere.
        let created = gw
            .create_document(
                "union",
                CreateDocumentRequest {
                    document_type_id: "repasse".into(),
                    title: "x".into(),
                    amount: 1.0,
                    ..Default::default()
                },
            )
            .await;
        assert!(created.is_ok());
    }
}
