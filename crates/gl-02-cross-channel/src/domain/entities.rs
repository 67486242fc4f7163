//! # Domain Entities
//!
//! Requests accepted and results returned by the gateway. Field names on the
//! wire are camelCase.

use gl_01_spending_contract::{Document, DocumentData, NewDocumentType};
use serde::{Deserialize, Serialize};

use super::errors::CrossChannelError;
use super::value_objects::{AnchorStatus, MismatchReason};

/// Request to register a document type.
pub type CreateDocumentTypeRequest = NewDocumentType;

/// Request to create a document without a link.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateDocumentRequest {
    /// Empty means the gateway generates one.
    pub id: String,
    /// Type to validate against.
    pub document_type_id: String,
    /// Title.
    pub title: String,
    /// Free text.
    pub description: String,
    /// Amount.
    pub amount: f64,
    /// Empty means the configured default currency.
    pub currency: String,
    /// Payload.
    pub data: DocumentData,
}

impl CreateDocumentRequest {
    /// Reject requests the contract would refuse anyway.
    pub fn validate(&self) -> Result<(), CrossChannelError> {
        require("documentTypeId", &self.document_type_id)?;
        require("title", &self.title)?;
        if !self.amount.is_finite() {
            return Err(CrossChannelError::Validation("amount must be a finite number".into()));
        }
        Ok(())
    }
}

/// Request to invalidate a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InvalidateDocumentRequest {
    /// Why the document is invalid.
    pub reason: String,
    /// Document that corrects this one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correction_doc_id: Option<String>,
}

impl InvalidateDocumentRequest {
    /// A reason is mandatory.
    pub fn validate(&self) -> Result<(), CrossChannelError> {
        require("reason", &self.reason)
    }
}

/// First half of a transfer, submitted on the sending channel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InitiateTransferRequest {
    /// Sending channel key.
    pub from_channel: String,
    /// Receiving channel key.
    pub to_channel: String,
    /// Receiving organization.
    pub to_org: String,
    /// Type of the OUTGOING document.
    pub document_type_id: String,
    /// Title.
    pub title: String,
    /// Free text.
    pub description: String,
    /// Transferred amount.
    pub amount: f64,
    /// Empty means the configured default currency.
    pub currency: String,
    /// Payload.
    pub data: DocumentData,
}

impl InitiateTransferRequest {
    /// Channels must differ and the amount must be positive.
    pub fn validate(&self) -> Result<(), CrossChannelError> {
        require("fromChannel", &self.from_channel)?;
        require("toChannel", &self.to_channel)?;
        require("toOrg", &self.to_org)?;
        require("documentTypeId", &self.document_type_id)?;
        require("title", &self.title)?;
        if self.from_channel == self.to_channel {
            return Err(CrossChannelError::Validation(
                "fromChannel and toChannel must differ".into(),
            ));
        }
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(CrossChannelError::Validation("amount must be greater than zero".into()));
        }
        Ok(())
    }
}

/// Second half of a transfer, submitted on the receiving channel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AcknowledgeTransferRequest {
    /// Id of the OUTGOING document.
    pub source_doc_id: String,
    /// Channel key of the OUTGOING document.
    pub source_channel: String,
    /// Type of the INCOMING document.
    pub document_type_id: String,
    /// Title.
    pub title: String,
    /// Free text.
    pub description: String,
    /// Payload, extended with the source reference.
    pub data: DocumentData,
}

impl AcknowledgeTransferRequest {
    /// Source reference and type are mandatory.
    pub fn validate(&self) -> Result<(), CrossChannelError> {
        require("sourceDocId", &self.source_doc_id)?;
        require("sourceChannel", &self.source_channel)?;
        require("documentTypeId", &self.document_type_id)?;
        require("title", &self.title)
    }
}

/// Anchor to check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VerifyAnchorRequest {
    /// Channel key of the OUTGOING document.
    pub source_channel: String,
    /// Id of the OUTGOING document.
    pub source_doc_id: String,
    /// Channel key of the INCOMING document.
    pub target_channel: String,
    /// Id of the INCOMING document.
    pub target_doc_id: String,
}

impl VerifyAnchorRequest {
    /// All four fields are mandatory.
    pub fn validate(&self) -> Result<(), CrossChannelError> {
        require("sourceChannel", &self.source_channel)?;
        require("sourceDocId", &self.source_doc_id)?;
        require("targetChannel", &self.target_channel)?;
        require("targetDocId", &self.target_doc_id)
    }
}

/// Outcome of one half of a transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferResult {
    /// Always `true`; failures are reported as errors.
    pub success: bool,
    /// Id of the document created by this half.
    pub id: String,
    /// Its content hash.
    pub content_hash: String,
    /// Channel key it was created on.
    pub channel: String,
    /// Counterpart id, set on acknowledgment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linked_doc_id: Option<String>,
    /// Counterpart hash, set on acknowledgment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linked_doc_hash: Option<String>,
    /// Counterpart channel key, set on acknowledgment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linked_channel: Option<String>,
}

/// Result of comparing both halves of a transfer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnchorVerification {
    /// OUTGOING document id.
    pub source_doc_id: String,
    /// OUTGOING channel key.
    pub source_channel: String,
    /// OUTGOING content hash.
    pub source_hash: String,
    /// OUTGOING amount.
    pub source_amount: f64,
    /// OUTGOING currency.
    pub source_currency: String,
    /// INCOMING document id.
    pub target_doc_id: String,
    /// INCOMING channel key.
    pub target_channel: String,
    /// INCOMING content hash.
    pub target_hash: String,
    /// Hash the INCOMING document recorded for its counterpart.
    pub target_linked_hash: String,
    /// INCOMING amount.
    pub target_amount: f64,
    /// INCOMING currency.
    pub target_currency: String,
    /// `targetLinkedHash == sourceHash`.
    pub hash_match: bool,
    /// Target links to the source id.
    pub id_match: bool,
    /// Target links to the source channel.
    pub channel_match: bool,
    /// Amounts are equal.
    pub amount_match: bool,
    /// All four checks hold.
    pub is_valid: bool,
    /// VERIFIED or MISMATCH.
    pub status: AnchorStatus,
    /// Failed checks, in check order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mismatch_reason: Vec<MismatchReason>,
}

/// A document together with its counterpart on another channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedDocuments {
    /// The requested document.
    pub document: Document,
    /// The counterpart, when reachable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linked_document: Option<Document>,
    /// Counterpart's current hash equals the recorded `linkedDocHash`.
    pub link_verified: bool,
}

/// Public description of one channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelInfo {
    /// Channel key.
    pub key: String,
    /// Ledger channel name.
    pub name: String,
    /// Organization this node acts as on the channel.
    pub msp_id: String,
    /// Whether this node may submit mutations.
    pub writable: bool,
}

/// Channel configuration visible to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigInfo {
    /// Keys of writable channels.
    pub writable_channels: Vec<String>,
    /// Keys of every channel.
    pub all_channels: Vec<String>,
    /// Per-channel details.
    pub channel_details: Vec<ChannelInfo>,
}

fn require(field: &str, value: &str) -> Result<(), CrossChannelError> {
    if value.trim().is_empty() {
        return Err(CrossChannelError::Validation(format!("{field} is required")));
    }
    Ok(())
}
