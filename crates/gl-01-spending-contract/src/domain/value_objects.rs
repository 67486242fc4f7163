//! # Value Objects
//!
//! Status, link direction, transaction context and state keys.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::errors::ContractError;

/// Document status. ACTIVE is initial, INVALIDATED is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentStatus {
    /// Live document.
    #[default]
    Active,
    /// Soft-deleted. Never transitions back.
    Invalidated,
}

impl DocumentStatus {
    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Active => "ACTIVE",
            DocumentStatus::Invalidated => "INVALIDATED",
        }
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentStatus {
    type Err = ContractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(DocumentStatus::Active),
            "INVALIDATED" => Ok(DocumentStatus::Invalidated),
            other => Err(ContractError::invalid_argument("status", format!("unknown status {other}"))),
        }
    }
}

/// Which side of a cross-channel link a document is on.
///
/// Fixed at creation time. The empty string on the wire means the document
/// takes no part in a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum LinkDirection {
    /// Not part of a transfer.
    #[default]
    #[serde(rename = "")]
    Unlinked,
    /// Sending side.
    #[serde(rename = "OUTGOING")]
    Outgoing,
    /// Receiving side.
    #[serde(rename = "INCOMING")]
    Incoming,
}

impl LinkDirection {
    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkDirection::Unlinked => "",
            LinkDirection::Outgoing => "OUTGOING",
            LinkDirection::Incoming => "INCOMING",
        }
    }
}

impl fmt::Display for LinkDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LinkDirection {
    type Err = ContractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Ok(LinkDirection::Unlinked),
            "OUTGOING" => Ok(LinkDirection::Outgoing),
            "INCOMING" => Ok(LinkDirection::Incoming),
            other => Err(ContractError::invalid_argument(
                "linkedDirection",
                format!("expected OUTGOING, INCOMING or empty, got {other}"),
            )),
        }
    }
}

/// Context of one contract invocation, supplied by the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionContext {
    /// Transaction id. Also the fallback document id.
    pub tx_id: String,
    /// Channel the invocation runs on.
    pub channel_id: String,
    /// Caller identity, recorded in `createdBy`/`updatedBy`.
    pub client_id: String,
    /// Caller organization, the only authorization input.
    pub msp_id: String,
    /// Transaction timestamp, RFC 3339 UTC with milliseconds.
    pub timestamp: String,
}

impl TransactionContext {
    /// Build a context stamped at `at`.
    pub fn new(
        tx_id: impl Into<String>,
        channel_id: impl Into<String>,
        client_id: impl Into<String>,
        msp_id: impl Into<String>,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            tx_id: tx_id.into(),
            channel_id: channel_id.into(),
            client_id: client_id.into(),
            msp_id: msp_id.into(),
            timestamp: format_timestamp(at),
        }
    }
}

/// Format a timestamp so that lexical order is chronological.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Record kind stored under a composite key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    /// Document record.
    Document,
    /// Document type record.
    DocumentType,
}

impl KeyKind {
    fn prefix(&self) -> &'static str {
        match self {
            KeyKind::Document => "DOC",
            KeyKind::DocumentType => "TYPE",
        }
    }

    /// Composite key for one record.
    pub fn key(&self, id: &str) -> String {
        format!("\u{0}{}\u{0}{}\u{0}", self.prefix(), id)
    }

    /// Prefix shared by every record of this kind.
    pub fn scan_prefix(&self) -> String {
        format!("\u{0}{}\u{0}", self.prefix())
    }
}
