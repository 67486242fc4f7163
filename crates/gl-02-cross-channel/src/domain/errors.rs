//! # Domain Errors
//!
//! Error types for cross-channel coordination.

use gl_01_spending_contract::ContractError;
use shared_types::{CodedError, ErrorCode, ErrorResponse};
use thiserror::Error;

use super::value_objects::{AnchorSide, TransferStep};

/// Failure reported by a contract handle.
///
/// The ledger boundary is textual, so only the stable code and the message
/// survive the crossing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct ChannelError {
    /// Stable code.
    pub code: ErrorCode,
    /// Message produced on the ledger side.
    pub message: String,
}

impl ChannelError {
    /// Build an error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Whether retrying the same call may succeed.
    pub fn is_retriable(&self) -> bool {
        self.code.is_retriable()
    }
}

impl From<ContractError> for ChannelError {
    fn from(err: ContractError) -> Self {
        Self::new(err.code(), err.to_string())
    }
}

/// Cross-channel error types.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CrossChannelError {
    /// Channel key not configured.
    #[error("channel {0} is not configured")]
    InvalidChannel(String),

    /// Channel could not be connected.
    #[error("channel {channel} is unavailable: {reason}")]
    ChannelUnavailable {
        /// Channel key.
        channel: String,
        /// Connector message.
        reason: String,
    },

    /// Mutation attempted on a channel this node may only read.
    #[error("channel {0} is read-only for this node")]
    ReadOnlyChannel(String),

    /// A ledger call exceeded its deadline.
    #[error("{function} on channel {channel} timed out after {after_ms}ms")]
    Timeout {
        /// Channel key.
        channel: String,
        /// Contract function.
        function: String,
        /// Deadline in milliseconds.
        after_ms: u64,
    },

    /// A ledger call failed.
    #[error("{function} on channel {channel} failed: {source}")]
    Contract {
        /// Channel key.
        channel: String,
        /// Contract function.
        function: String,
        /// Ledger-side failure.
        source: ChannelError,
    },

    /// The source document of an acknowledgment does not exist.
    #[error("source document {doc_id} not found on channel {channel}")]
    SourceDocNotFound {
        /// Source channel key.
        channel: String,
        /// Source document id.
        doc_id: String,
    },

    /// The source document of an acknowledgment could not be read.
    #[error("source document {doc_id} on channel {channel} is unavailable: {source}")]
    SourceDocUnavailable {
        /// Source channel key.
        channel: String,
        /// Source document id.
        doc_id: String,
        /// Underlying failure.
        source: Box<CrossChannelError>,
    },

    /// One half of an anchor could not be read.
    #[error("{side} document {doc_id} on channel {channel} is not accessible: {source}")]
    AnchorDocument {
        /// Which half.
        side: AnchorSide,
        /// Channel key.
        channel: String,
        /// Document id.
        doc_id: String,
        /// Underlying failure.
        source: Box<CrossChannelError>,
    },

    /// A fatal saga step failed.
    #[error("transfer step {step} failed: {source}")]
    TransferStep {
        /// The failed step.
        step: TransferStep,
        /// Underlying failure.
        source: Box<CrossChannelError>,
    },

    /// Encoding a request failed.
    #[error("failed to marshal {0}")]
    Marshal(String),

    /// Decoding a ledger result failed.
    #[error("failed to unmarshal {what}: {reason}")]
    Unmarshal {
        /// Payload kind.
        what: &'static str,
        /// Decoder message.
        reason: String,
    },

    /// Malformed request.
    #[error("invalid request: {0}")]
    Validation(String),
}

impl CrossChannelError {
    /// Wrap `self` as the failure of a saga step.
    pub fn at_step(self, step: TransferStep) -> Self {
        CrossChannelError::TransferStep {
            step,
            source: Box::new(self),
        }
    }

    /// Stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            CrossChannelError::InvalidChannel(_) => ErrorCode::InvalidChannel,
            CrossChannelError::ChannelUnavailable { .. } => ErrorCode::ChannelUnavailable,
            CrossChannelError::ReadOnlyChannel(_) => ErrorCode::PermissionDenied,
            CrossChannelError::Timeout { .. } => ErrorCode::Timeout,
            CrossChannelError::Contract { source, .. } => source.code,
            CrossChannelError::SourceDocNotFound { .. } => ErrorCode::SourceDocNotFound,
            CrossChannelError::SourceDocUnavailable { .. } => ErrorCode::LinkedDocUnavailable,
            CrossChannelError::AnchorDocument { source, .. } => match source.code() {
                ErrorCode::NotFound => ErrorCode::NotFound,
                _ => ErrorCode::LinkedDocUnavailable,
            },
            CrossChannelError::TransferStep { source, .. } => source.code(),
            CrossChannelError::Marshal(_) => ErrorCode::MarshalingFailed,
            CrossChannelError::Unmarshal { .. } => ErrorCode::UnmarshalingFailed,
            CrossChannelError::Validation(_) => ErrorCode::ValidationFailed,
        }
    }

    /// Whether retrying the same call may succeed.
    pub fn is_retriable(&self) -> bool {
        self.code().is_retriable()
    }

    /// Saga step the failure happened in, if any.
    pub fn step(&self) -> Option<TransferStep> {
        match self {
            CrossChannelError::TransferStep { step, .. } => Some(*step),
            _ => None,
        }
    }

    /// Channel key the failure is about, innermost first.
    pub fn channel(&self) -> Option<&str> {
        match self {
            CrossChannelError::InvalidChannel(channel)
            | CrossChannelError::ReadOnlyChannel(channel)
            | CrossChannelError::ChannelUnavailable { channel, .. }
            | CrossChannelError::Timeout { channel, .. }
            | CrossChannelError::Contract { channel, .. }
            | CrossChannelError::SourceDocNotFound { channel, .. }
            | CrossChannelError::SourceDocUnavailable { channel, .. }
            | CrossChannelError::AnchorDocument { channel, .. } => Some(channel),
            CrossChannelError::TransferStep { source, .. } => source.channel(),
            _ => None,
        }
    }

    /// Sanitized, user-visible response.
    pub fn to_response(&self, operation: &str) -> ErrorResponse {
        let mut response = ErrorResponse::from_error(self).with_context("operation", operation);
        if let Some(channel) = self.channel() {
            response = response.with_context("channel", channel);
        }
        if let Some(step) = self.step() {
            response = response.with_context("step", step.as_str());
        }
        response
    }
}

impl CodedError for CrossChannelError {
    fn code(&self) -> ErrorCode {
        CrossChannelError::code(self)
    }
}
