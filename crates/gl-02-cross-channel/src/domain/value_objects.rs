//! # Value Objects
//!
//! Saga steps, anchor status and mismatch reasons.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A step of the transfer saga, reported in error context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferStep {
    /// Resolve the source channel.
    GetSourceContract,
    /// Create the OUTGOING document.
    CreateSourceDocument,
    /// Read the OUTGOING document back for its hash.
    VerifySourceDocument,
    /// Fetch the source document before acknowledging.
    FetchSourceDocument,
    /// Resolve the target channel.
    GetTargetContract,
    /// Create the INCOMING document.
    CreateAckDocument,
    /// Read the INCOMING document back for its hash.
    VerifyAckDocument,
    /// Point the source document at the acknowledgment.
    UpdateLink,
}

impl TransferStep {
    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransferStep::GetSourceContract => "get_source_contract",
            TransferStep::CreateSourceDocument => "create_source_document",
            TransferStep::VerifySourceDocument => "verify_source_document",
            TransferStep::FetchSourceDocument => "fetch_source_document",
            TransferStep::GetTargetContract => "get_target_contract",
            TransferStep::CreateAckDocument => "create_ack_document",
            TransferStep::VerifyAckDocument => "verify_ack_document",
            TransferStep::UpdateLink => "update_link",
        }
    }
}

impl fmt::Display for TransferStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of an anchor verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnchorStatus {
    /// All four checks hold.
    Verified,
    /// At least one check failed.
    Mismatch,
}

/// One failed anchor check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MismatchReason {
    /// Target's `linkedDocHash` differs from source's `contentHash`.
    #[serde(rename = "content hash mismatch")]
    ContentHash,
    /// Target's `linkedDocId` differs from the source id.
    #[serde(rename = "document ID mismatch")]
    DocumentId,
    /// Target's `linkedChannel` differs from the source channel.
    #[serde(rename = "channel mismatch")]
    Channel,
    /// Amounts differ.
    #[serde(rename = "amount mismatch")]
    Amount,
}

impl MismatchReason {
    /// Human-readable reason.
    pub fn as_str(&self) -> &'static str {
        match self {
            MismatchReason::ContentHash => "content hash mismatch",
            MismatchReason::DocumentId => "document ID mismatch",
            MismatchReason::Channel => "channel mismatch",
            MismatchReason::Amount => "amount mismatch",
        }
    }
}

impl fmt::Display for MismatchReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which half of an anchor could not be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnchorSide {
    /// The sending document.
    Source,
    /// The receiving document.
    Target,
}

impl fmt::Display for AnchorSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AnchorSide::Source => "source",
            AnchorSide::Target => "target",
        })
    }
}
