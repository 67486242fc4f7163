//! # Domain Entities
//!
//! Records stored on a channel. Field names on the wire are camelCase.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::value_objects::{DocumentStatus, LinkDirection};

/// Free-form document payload.
pub type DocumentData = Map<String, Value>;

/// Schema a document must satisfy. Owned by one organization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentType {
    /// Unique within the channel, assigned by the caller.
    pub id: String,
    /// Owning organization.
    pub organization_id: String,
    /// Display name.
    pub name: String,
    /// Free text.
    pub description: String,
    /// Keys every document payload must contain.
    #[serde(default)]
    pub required_fields: Vec<String>,
    /// Keys a document payload may contain.
    #[serde(default)]
    pub optional_fields: Vec<String>,
    /// Registration timestamp.
    pub created_at: String,
    /// Registering identity.
    pub created_by: String,
    /// Cleared by deactivation. Inactive types accept no new documents.
    pub is_active: bool,
}

/// The four link fields of a document.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkFields {
    /// Id of the document on the other channel.
    pub linked_doc_id: String,
    /// Channel of the other document.
    pub linked_channel: String,
    /// Content hash of the other document.
    pub linked_doc_hash: String,
    /// Side of the link this document is on.
    pub linked_direction: LinkDirection,
}

/// A spending document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Unique within the channel.
    pub id: String,
    /// Type the payload was validated against.
    pub document_type_id: String,
    /// Creating organization. Immutable.
    pub organization_id: String,
    /// Channel the document lives on. Immutable.
    pub channel_id: String,
    /// Status machine state.
    pub status: DocumentStatus,
    /// Title.
    pub title: String,
    /// Free text.
    pub description: String,
    /// Amount.
    pub amount: f64,
    /// Currency code.
    pub currency: String,
    /// Payload.
    #[serde(default)]
    pub data: DocumentData,
    /// SHA-256 of the canonical payload, computed once at creation.
    pub content_hash: String,

    /// Id of the linked document.
    #[serde(default)]
    pub linked_doc_id: String,
    /// Channel of the linked document.
    #[serde(default)]
    pub linked_channel: String,
    /// Content hash of the linked document.
    #[serde(default)]
    pub linked_doc_hash: String,
    /// Link side, fixed at creation.
    #[serde(default)]
    pub linked_direction: LinkDirection,

    /// Identity that invalidated the document.
    #[serde(default)]
    pub invalidated_by: String,
    /// Invalidation timestamp.
    #[serde(default)]
    pub invalidated_at: String,
    /// Invalidation reason.
    #[serde(default)]
    pub invalid_reason: String,
    /// Document that corrects this one.
    #[serde(default)]
    pub corrected_by_doc: String,

    /// Creation timestamp.
    pub created_at: String,
    /// Creating identity.
    pub created_by: String,
    /// Last mutation timestamp.
    pub updated_at: String,
    /// Last mutating identity.
    pub updated_by: String,
    /// Transaction ids of every mutation, in order.
    #[serde(default)]
    pub history: Vec<String>,
}

impl Document {
    /// Whether the document points at another channel.
    pub fn has_link(&self) -> bool {
        !self.linked_doc_id.is_empty()
    }

    /// Current link fields.
    pub fn link(&self) -> LinkFields {
        LinkFields {
            linked_doc_id: self.linked_doc_id.clone(),
            linked_channel: self.linked_channel.clone(),
            linked_doc_hash: self.linked_doc_hash.clone(),
            linked_direction: self.linked_direction,
        }
    }
}

/// One committed version of a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Committing transaction.
    pub tx_id: String,
    /// Commit timestamp.
    pub timestamp: String,
    /// Whether the version is a deletion marker.
    pub is_delete: bool,
    /// Document as of this version.
    pub document: Document,
}

/// Identifier of a newly created record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdResult {
    /// The id.
    pub id: String,
}

/// Arguments of a document type registration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDocumentType {
    /// Caller-assigned id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Free text.
    pub description: String,
    /// Keys every payload must contain.
    pub required_fields: Vec<String>,
    /// Keys a payload may contain.
    pub optional_fields: Vec<String>,
}

/// Arguments of a document creation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDocument {
    /// Caller-assigned id. Empty means the transaction id.
    pub id: String,
    /// Type to validate against.
    pub document_type_id: String,
    /// Title.
    pub title: String,
    /// Free text.
    pub description: String,
    /// Amount.
    pub amount: f64,
    /// Currency code.
    pub currency: String,
    /// Payload.
    pub data: DocumentData,
    /// Initial link fields.
    #[serde(flatten)]
    pub link: LinkFields,
}
