//! # Error Types
//!
//! The stable error-code taxonomy and the structured response surfaced to
//! callers outside the node.

use crate::security::sanitize_message;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Context keys allowed to leave the node inside an [`ErrorResponse`].
pub const CONTEXT_WHITELIST: [&str; 5] = ["channel", "operation", "step", "documentTypeId", "typeId"];

/// Stable, machine-readable error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Document type, document or contract absent.
    NotFound,
    /// Identifier collision.
    AlreadyExists,
    /// Missing required field, malformed argument, filter or body.
    ValidationFailed,
    /// Caller organization does not own the record.
    PermissionDenied,
    /// Operation not allowed in the record's current state.
    InvalidOperation,
    /// Ledger channel could not be reached.
    ChannelUnavailable,
    /// Ledger call did not complete before its deadline.
    Timeout,
    /// Optimistic-concurrency rejection at commit.
    CommitConflict,
    /// Channel key not configured.
    InvalidChannel,
    /// Source document of a transfer could not be fetched.
    SourceDocNotFound,
    /// Linked document on another channel could not be fetched.
    LinkedDocUnavailable,
    /// Encoding a payload failed.
    MarshalingFailed,
    /// Decoding a payload failed.
    UnmarshalingFailed,
    /// Anything else.
    InternalError,
}

impl ErrorCode {
    /// Wire representation of the code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::AlreadyExists => "ALREADY_EXISTS",
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::PermissionDenied => "PERMISSION_DENIED",
            ErrorCode::InvalidOperation => "INVALID_OPERATION",
            ErrorCode::ChannelUnavailable => "CHANNEL_UNAVAILABLE",
            ErrorCode::Timeout => "TIMEOUT",
            ErrorCode::CommitConflict => "COMMIT_CONFLICT",
            ErrorCode::InvalidChannel => "INVALID_CHANNEL",
            ErrorCode::SourceDocNotFound => "SOURCE_DOC_NOT_FOUND",
            ErrorCode::LinkedDocUnavailable => "LINKED_DOC_UNAVAILABLE",
            ErrorCode::MarshalingFailed => "MARSHALING_FAILED",
            ErrorCode::UnmarshalingFailed => "UNMARSHALING_FAILED",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Whether repeating the same call may succeed without changing it.
    pub fn is_retriable(&self) -> bool {
        matches!(
            self,
            ErrorCode::ChannelUnavailable
                | ErrorCode::Timeout
                | ErrorCode::CommitConflict
                | ErrorCode::LinkedDocUnavailable
        )
    }

    /// HTTP status a front door should use for this code.
    pub fn http_status(&self) -> u16 {
        match self {
            ErrorCode::NotFound | ErrorCode::SourceDocNotFound => 404,
            ErrorCode::AlreadyExists | ErrorCode::CommitConflict => 409,
            ErrorCode::ValidationFailed | ErrorCode::InvalidChannel => 400,
            ErrorCode::PermissionDenied => 403,
            ErrorCode::InvalidOperation => 422,
            ErrorCode::ChannelUnavailable => 503,
            ErrorCode::Timeout => 504,
            ErrorCode::LinkedDocUnavailable => 424,
            ErrorCode::MarshalingFailed
            | ErrorCode::UnmarshalingFailed
            | ErrorCode::InternalError => 500,
        }
    }

    /// Parse the wire representation.
    pub fn parse(s: &str) -> Option<Self> {
        let code = match s {
            "NOT_FOUND" => ErrorCode::NotFound,
            "ALREADY_EXISTS" => ErrorCode::AlreadyExists,
            "VALIDATION_FAILED" => ErrorCode::ValidationFailed,
            "PERMISSION_DENIED" => ErrorCode::PermissionDenied,
            "INVALID_OPERATION" => ErrorCode::InvalidOperation,
            "CHANNEL_UNAVAILABLE" => ErrorCode::ChannelUnavailable,
            "TIMEOUT" => ErrorCode::Timeout,
            "COMMIT_CONFLICT" => ErrorCode::CommitConflict,
            "INVALID_CHANNEL" => ErrorCode::InvalidChannel,
            "SOURCE_DOC_NOT_FOUND" => ErrorCode::SourceDocNotFound,
            "LINKED_DOC_UNAVAILABLE" => ErrorCode::LinkedDocUnavailable,
            "MARSHALING_FAILED" => ErrorCode::MarshalingFailed,
            "UNMARSHALING_FAILED" => ErrorCode::UnmarshalingFailed,
            "INTERNAL_ERROR" => ErrorCode::InternalError,
            _ => return None,
        };
        Some(code)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anything that can be reported with a stable code.
pub trait CodedError: std::error::Error {
    /// The stable code for this error.
    fn code(&self) -> ErrorCode;
}

/// User-visible error body.
///
/// Built through [`ErrorResponse::new`], which sanitizes the message, and
/// [`ErrorResponse::with_context`], which drops keys outside
/// [`CONTEXT_WHITELIST`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always `false`.
    pub success: bool,
    /// Sanitized message.
    pub error: String,
    /// Stable code.
    pub code: ErrorCode,
    /// Sanitized extra detail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Retriability hint.
    pub retriable: bool,
    /// Whitelisted context.
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub context: BTreeMap<String, String>,
}

impl ErrorResponse {
    /// Build a response with the code's default retriability.
    pub fn new(code: ErrorCode, message: impl AsRef<str>) -> Self {
        Self {
            success: false,
            error: sanitize_message(message.as_ref()),
            code,
            details: None,
            retriable: code.is_retriable(),
            context: BTreeMap::new(),
        }
    }

    /// Build a response from any coded error.
    pub fn from_error<E: CodedError + ?Sized>(err: &E) -> Self {
        Self::new(err.code(), err.to_string())
    }

    /// Attach sanitized detail text.
    pub fn with_details(mut self, details: impl AsRef<str>) -> Self {
        self.details = Some(sanitize_message(details.as_ref()));
        self
    }

    /// Attach a context entry. Keys outside the whitelist are ignored.
    pub fn with_context(mut self, key: &str, value: impl Into<String>) -> Self {
        if CONTEXT_WHITELIST.contains(&key) {
            self.context.insert(key.to_string(), value.into());
        }
        self
    }

    /// HTTP status hint for the code.
    pub fn http_status(&self) -> u16 {
        self.code.http_status()
    }
}
