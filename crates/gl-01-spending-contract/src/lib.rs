//! # GL-01: Spending Contract
//!
//! The ledger program executed inside each channel. One instance per channel,
//! with no visibility into any other channel.
//!
//! ## Responsibilities
//!
//! - **Document Type Registry**: schemas (required/optional fields) per organization
//! - **Document Store**: documents, the ACTIVE → INVALIDATED status machine and
//!   content hashing over canonical JSON
//! - **Link Manager**: the only mutation path for a document's link fields
//! - **Query Engine**: filtered, cursor-paginated search
//! - **History**: every committed version of a document, oldest first
//!
//! ## Module Structure
//!
//! ```text
//! gl-01-spending-contract/
//! ├── domain/          # Entities, value objects, hashing, query, invariants, errors
//! ├── ports/
//! │   ├── inbound.rs   # SpendingContractApi
//! │   └── outbound.rs  # WorldState (versioned key-value store with history)
//! ├── service/         # SpendingContract<S: WorldState>
//! └── adapters/        # Textual router, in-memory and file-backed world state
//! ```
//!
//! ## Concurrency
//!
//! Every invocation records the version of each key it reads. The world state
//! rejects the commit with `CommitConflict` when any of those keys changed in
//! between, so concurrent writers never need an in-process lock.

#![warn(missing_docs)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::{ContractFunction, ContractRouter, FileWorldState, InMemoryWorldState};
pub use domain::*;
pub use ports::*;
pub use service::SpendingContract;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
