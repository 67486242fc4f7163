//! Command execution against a [`LedgerNode`].

use gl_01_spending_contract::{DocumentData, QueryFilter};
use gl_02_cross_channel::{
    AcknowledgeTransferRequest, CreateDocumentRequest, CreateDocumentTypeRequest,
    CrossChannelApi, CrossChannelError, DocumentGatewayApi, InitiateTransferRequest,
    InvalidateDocumentRequest, VerifyAnchorRequest,
};
use serde::Serialize;
use serde_json::{json, Value};

use super::{AnchorCommand, Command, DocCommand, QueryArgs, TransferCommand, TypeCommand};
use crate::container::LedgerNode;

/// Run `command` and return its JSON result.
pub async fn execute(node: &LedgerNode, command: Command) -> Result<Value, CrossChannelError> {
    let gw = node.gateway();
    match command {
        Command::Channels => to_value(&gw.config_info()),

        Command::Types(cmd) => match cmd {
            TypeCommand::Register {
                channel,
                id,
                name,
                description,
                required,
                optional,
            } => {
                let request = CreateDocumentTypeRequest {
                    id,
                    name,
                    description,
                    required_fields: required,
                    optional_fields: optional,
                };
                let id = gw.create_document_type(&channel.channel, request).await?;
                Ok(json!({ "success": true, "id": id }))
            }
            TypeCommand::Get { channel, id } => {
                to_value(&gw.get_document_type(&channel.channel, &id).await?)
            }
            TypeCommand::List { channel, org } => {
                to_value(&gw.list_document_types(&channel.channel, org.as_deref()).await?)
            }
            TypeCommand::Deactivate { channel, id } => {
                gw.deactivate_document_type(&channel.channel, &id).await?;
                Ok(json!({ "success": true, "id": id }))
            }
        },

        Command::Docs(cmd) => match cmd {
            DocCommand::Create {
                channel,
                id,
                document_type_id,
                title,
                description,
                amount,
                currency,
                data,
            } => {
                let request = CreateDocumentRequest {
                    id: id.unwrap_or_default(),
                    document_type_id,
                    title,
                    description,
                    amount,
                    currency: currency.unwrap_or_default(),
                    data: parse_data(data.as_deref())?,
                };
                to_value(&gw.create_document(&channel.channel, request).await?)
            }
            DocCommand::Get { channel, id } => to_value(&gw.get_document(&channel.channel, &id).await?),
            DocCommand::History { channel, id } => {
                to_value(&gw.get_document_history(&channel.channel, &id).await?)
            }
            DocCommand::Linked { channel, id } => {
                to_value(&gw.get_linked_documents(&channel.channel, &id).await?)
            }
            DocCommand::Invalidate {
                channel,
                id,
                reason,
                correction,
            } => {
                let request = InvalidateDocumentRequest {
                    reason,
                    correction_doc_id: correction,
                };
                gw.invalidate_document(&channel.channel, &id, request).await?;
                Ok(json!({ "success": true, "id": id }))
            }
            DocCommand::Query { channel, filter } => {
                to_value(&gw.query_documents(&channel.channel, &query_filter(filter)).await?)
            }
        },

        Command::Transfer(cmd) => match cmd {
            TransferCommand::Initiate {
                from,
                to,
                to_org,
                document_type_id,
                title,
                description,
                amount,
                currency,
                data,
            } => {
                let request = InitiateTransferRequest {
                    from_channel: from,
                    to_channel: to,
                    to_org,
                    document_type_id,
                    title,
                    description,
                    amount,
                    currency: currency.unwrap_or_default(),
                    data: parse_data(data.as_deref())?,
                };
                to_value(&gw.initiate_transfer(request).await?)
            }
            TransferCommand::Acknowledge {
                channel,
                source_channel,
                source_doc,
                document_type_id,
                title,
                description,
                data,
            } => {
                let request = AcknowledgeTransferRequest {
                    source_doc_id: source_doc,
                    source_channel,
                    document_type_id,
                    title,
                    description,
                    data: parse_data(data.as_deref())?,
                };
                to_value(&gw.acknowledge_transfer(&channel.channel, request).await?)
            }
        },

        Command::Anchor(AnchorCommand::Verify {
            source_channel,
            source_doc,
            target_channel,
            target_doc,
        }) => {
            let request = VerifyAnchorRequest {
                source_channel,
                source_doc_id: source_doc,
                target_channel,
                target_doc_id: target_doc,
            };
            to_value(&gw.verify_anchor(request).await?)
        }
    }
}

fn query_filter(args: QueryArgs) -> QueryFilter {
    QueryFilter {
        organization_id: args.org,
        document_type_id: args.document_type_id,
        status: args.status,
        from_date: args.from_date,
        to_date: args.to_date,
        min_amount: args.min_amount,
        max_amount: args.max_amount,
        has_linked_doc: args.has_link,
        linked_direction: args.direction,
        page_size: args.page_size,
        bookmark: args.bookmark,
    }
}

/// Parse a `--data` flag. Absent or blank means an empty payload.
fn parse_data(text: Option<&str>) -> Result<DocumentData, CrossChannelError> {
    match text.map(str::trim) {
        None | Some("") => Ok(DocumentData::new()),
        Some(text) => serde_json::from_str(text)
            .map_err(|e| CrossChannelError::Validation(format!("data must be a JSON object: {e}"))),
    }
}

fn to_value<T: Serialize>(value: &T) -> Result<Value, CrossChannelError> {
    serde_json::to_value(value).map_err(|e| CrossChannelError::Marshal(e.to_string()))
}
