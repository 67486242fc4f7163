//! # GL-02 Cross-Channel Coordination
//!
//! Everything that happens outside a single channel's ledger program.
//!
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! Channels are independent ledgers with no shared transaction. This crate
//! binds a document on one channel to a document on another through content
//! hashes:
//!
//! - **Channel Connection Registry**: one cached contract handle per channel key
//! - **Document Gateway**: typed façade over the textual contract boundary
//! - **Transfer Coordinator**: initiate → acknowledge → link-back saga
//! - **Anchor Verifier**: read-only comparison of the two halves of a link
//!
//! ## Saga Failure Policy
//!
//! | Step | Channel | On failure |
//! |------|---------|------------|
//! | Initiate | source | Fatal. The transfer did not happen. |
//! | Acknowledge | target | Fatal. Nothing is reported as received. |
//! | Link-back | source | Retried while retriable, then logged and swallowed. |
//!
//! ## Module Structure
//!
//! ```text
//! gl-02-cross-channel/
//! ├── domain/          # Requests, results, anchor checks, config, errors
//! ├── ports/           # DocumentGatewayApi, CrossChannelApi, ContractHandle, ChannelRegistry
//! ├── service/         # LedgerGateway
//! └── adapters/        # CachedChannelRegistry, in-process contract handles
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

// Re-exports
pub use adapters::{CachedChannelRegistry, InProcessConnector, StorageMode};
pub use domain::{
    check_anchor, AcknowledgeTransferRequest, AnchorSide, AnchorStatus, AnchorVerification,
    ChannelConfig, ChannelError, ChannelInfo, ConfigInfo, CreateDocumentRequest,
    CreateDocumentTypeRequest, CrossChannelError, GatewayConfig, InitiateTransferRequest,
    InvalidateDocumentRequest, LinkedDocuments, MismatchReason, TransferResult, TransferStep,
    VerifyAnchorRequest,
};
pub use ports::{
    ChannelConnector, ChannelRegistry, ContractHandle, CrossChannelApi, DocumentGatewayApi,
    IdGenerator, SystemTimeSource, TimeSource, UuidGenerator,
};
pub use service::LedgerGateway;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
