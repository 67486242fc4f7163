//! # Error Types
//!
//! Every failure of the spending contract, mapped onto the shared error codes.

use shared_types::{CodedError, ErrorCode};
use thiserror::Error;

/// Errors raised by a world-state backend.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StateError {
    /// A key read during the invocation changed before commit.
    #[error("commit conflict: key {key} was modified by a concurrent transaction")]
    VersionConflict {
        /// Printable form of the conflicting key.
        key: String,
    },

    /// Backend could not be reached.
    #[error("world state unavailable: {0}")]
    Unavailable(String),

    /// Persistence failure.
    #[error("world state I/O failure: {0}")]
    Io(String),

    /// Stored bytes could not be decoded.
    #[error("world state corrupted: {0}")]
    Corrupted(String),
}

/// Spending contract errors.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ContractError {
    /// Document type not registered.
    #[error("document type {0} not found")]
    DocumentTypeNotFound(String),

    /// Document not present on this channel.
    #[error("document {0} not found")]
    DocumentNotFound(String),

    /// Correction document named on invalidate does not exist.
    #[error("correction document {0} not found")]
    CorrectionDocumentNotFound(String),

    /// Document type id already taken.
    #[error("document type {0} already exists")]
    DocumentTypeExists(String),

    /// Document id already taken.
    #[error("document {0} already exists")]
    DocumentExists(String),

    /// Document type was deactivated.
    #[error("document type {0} is not active")]
    DocumentTypeInactive(String),

    /// Payload lacks a field the type requires.
    #[error("missing required field: {0}")]
    MissingRequiredField(String),

    /// Malformed argument.
    #[error("invalid {name}: {reason}")]
    InvalidArgument {
        /// Argument name.
        name: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Caller organization does not own the record.
    #[error("only the owning organization can {action}")]
    NotOwner {
        /// The refused action.
        action: &'static str,
    },

    /// Document is already INVALIDATED.
    #[error("document {0} is already invalidated")]
    AlreadyInvalidated(String),

    /// Router received an unknown function name.
    #[error("unknown function: {0}")]
    UnknownFunction(String),

    /// Router received the wrong number of arguments.
    #[error("{function} expects {expected} arguments, got {got}")]
    WrongArity {
        /// Function name.
        function: String,
        /// Expected count.
        expected: usize,
        /// Received count.
        got: usize,
    },

    /// A mutating function was called through a read-only path.
    #[error("function {0} modifies state and must be submitted")]
    NotReadOnly(String),

    /// Encoding a record failed.
    #[error("failed to marshal {what}: {reason}")]
    Marshal {
        /// Record kind.
        what: &'static str,
        /// Encoder message.
        reason: String,
    },

    /// Decoding a record failed.
    #[error("failed to unmarshal {what}: {reason}")]
    Unmarshal {
        /// Record kind.
        what: &'static str,
        /// Decoder message.
        reason: String,
    },

    /// World-state failure.
    #[error(transparent)]
    State(#[from] StateError),
}

impl ContractError {
    /// Shorthand for [`ContractError::InvalidArgument`].
    pub fn invalid_argument(name: impl Into<String>, reason: impl Into<String>) -> Self {
        ContractError::InvalidArgument {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Stable code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            ContractError::DocumentTypeNotFound(_)
            | ContractError::DocumentNotFound(_)
            | ContractError::CorrectionDocumentNotFound(_) => ErrorCode::NotFound,
            ContractError::DocumentTypeExists(_) | ContractError::DocumentExists(_) => {
                ErrorCode::AlreadyExists
            }
            ContractError::DocumentTypeInactive(_)
            | ContractError::MissingRequiredField(_)
            | ContractError::InvalidArgument { .. }
            | ContractError::UnknownFunction(_)
            | ContractError::WrongArity { .. }
            | ContractError::NotReadOnly(_) => ErrorCode::ValidationFailed,
            ContractError::NotOwner { .. } => ErrorCode::PermissionDenied,
            ContractError::AlreadyInvalidated(_) => ErrorCode::InvalidOperation,
            ContractError::Marshal { .. } => ErrorCode::MarshalingFailed,
            ContractError::Unmarshal { .. } => ErrorCode::UnmarshalingFailed,
            ContractError::State(StateError::VersionConflict { .. }) => ErrorCode::CommitConflict,
            ContractError::State(StateError::Unavailable(_)) => ErrorCode::ChannelUnavailable,
            ContractError::State(StateError::Corrupted(_)) => ErrorCode::UnmarshalingFailed,
            ContractError::State(StateError::Io(_)) => ErrorCode::InternalError,
        }
    }
}

impl CodedError for ContractError {
    fn code(&self) -> ErrorCode {
        ContractError::code(self)
    }
}
