//! Per-channel document operations.

use async_trait::async_trait;
use gl_01_spending_contract::{
    ContractFunction, Document, DocumentType, HistoryEntry, IdResult, QueryFilter, QueryResult,
};
use tracing::info;

use super::{decode, to_json, LedgerGateway};
use crate::domain::{
    ChannelInfo, ConfigInfo, CreateDocumentRequest, CreateDocumentTypeRequest, CrossChannelError,
    InvalidateDocumentRequest,
};
use crate::ports::{ChannelRegistry, DocumentGatewayApi};

#[async_trait]
impl<R: ChannelRegistry> DocumentGatewayApi for LedgerGateway<R> {
    async fn create_document_type(
        &self,
        channel: &str,
        request: CreateDocumentTypeRequest,
    ) -> Result<String, CrossChannelError> {
        self.ensure_writable(channel)?;
        let args = vec![
            request.id,
            request.name,
            request.description,
            to_json(&request.required_fields, "requiredFields")?,
            to_json(&request.optional_fields, "optionalFields")?,
        ];
        let bytes = self
            .call(channel, ContractFunction::RegisterDocumentType, &args)
            .await?;
        let created: IdResult = decode(&bytes, "document type id")?;
        info!(channel = %channel, type_id = %created.id, "[gl-02] Document type registered");
        Ok(created.id)
    }

    async fn get_document_type(&self, channel: &str, id: &str) -> Result<DocumentType, CrossChannelError> {
        let bytes = self
            .call(channel, ContractFunction::GetDocumentType, &[id.to_string()])
            .await?;
        decode(&bytes, "document type")
    }

    async fn list_document_types(
        &self,
        channel: &str,
        org: Option<&str>,
    ) -> Result<Vec<DocumentType>, CrossChannelError> {
        let args = [org.unwrap_or_default().to_string()];
        let bytes = self
            .call(channel, ContractFunction::ListDocumentTypes, &args)
            .await?;
        decode(&bytes, "document types")
    }

    async fn deactivate_document_type(&self, channel: &str, id: &str) -> Result<(), CrossChannelError> {
        self.ensure_writable(channel)?;
        self.call(channel, ContractFunction::DeactivateDocumentType, &[id.to_string()])
            .await?;
        info!(channel = %channel, type_id = %id, "[gl-02] Document type deactivated");
        Ok(())
    }

    async fn create_document(
        &self,
        channel: &str,
        request: CreateDocumentRequest,
    ) -> Result<Document, CrossChannelError> {
        request.validate()?;
        self.ensure_writable(channel)?;
        let id = if request.id.is_empty() {
            self.ids.next_id()
        } else {
            request.id
        };
        let args = vec![
            id,
            request.document_type_id,
            request.title,
            request.description,
            request.amount.to_string(),
            self.currency_or_default(&request.currency),
            to_json(&request.data, "data")?,
        ];
        let bytes = self
            .call(channel, ContractFunction::CreateSimpleDocument, &args)
            .await?;
        let created: IdResult = decode(&bytes, "document id")?;
        let doc = self.fetch_document(channel, &created.id).await?;
        info!(
            channel = %channel,
            doc_id = %doc.id,
            type_id = %doc.document_type_id,
            content_hash = %doc.content_hash,
            "[gl-02] Document created"
        );
        Ok(doc)
    }

    async fn get_document(&self, channel: &str, id: &str) -> Result<Document, CrossChannelError> {
        self.fetch_document(channel, id).await
    }

    async fn invalidate_document(
        &self,
        channel: &str,
        id: &str,
        request: InvalidateDocumentRequest,
    ) -> Result<(), CrossChannelError> {
        request.validate()?;
        self.ensure_writable(channel)?;
        let args = [
            id.to_string(),
            request.reason,
            request.correction_doc_id.unwrap_or_default(),
        ];
        self.call(channel, ContractFunction::InvalidateDocument, &args)
            .await?;
        info!(channel = %channel, doc_id = %id, "[gl-02] Document invalidated");
        Ok(())
    }

    async fn query_documents(
        &self,
        channel: &str,
        filter: &QueryFilter,
    ) -> Result<QueryResult, CrossChannelError> {
        let args = [to_json(filter, "filter")?];
        let bytes = self
            .call(channel, ContractFunction::QueryDocuments, &args)
            .await?;
        decode(&bytes, "query result")
    }

    async fn get_document_history(
        &self,
        channel: &str,
        id: &str,
    ) -> Result<Vec<HistoryEntry>, CrossChannelError> {
        let bytes = self
            .call(channel, ContractFunction::GetDocumentHistory, &[id.to_string()])
            .await?;
        decode(&bytes, "document history")
    }

    fn config_info(&self) -> ConfigInfo {
        let channels = self.registry.channels();
        ConfigInfo {
            writable_channels: channels
                .iter()
                .filter(|c| c.writable)
                .map(|c| c.key.clone())
                .collect(),
            all_channels: channels.iter().map(|c| c.key.clone()).collect(),
            channel_details: channels
                .into_iter()
                .map(|c| ChannelInfo {
                    key: c.key,
                    name: c.name,
                    msp_id: c.msp_id,
                    writable: c.writable,
                })
                .collect(),
        }
    }
}
