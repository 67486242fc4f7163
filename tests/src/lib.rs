//! # Gov-Ledger Test Suite
//!
//! Cross-crate flows exercised through the public gateway.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── fixtures.rs            # Gateways, connectors, request builders
//!     ├── transfer_flow.rs       # initiate → acknowledge → link-back
//!     ├── anchor.rs              # Anchor verification and linked lookups
//!     ├── query_pagination.rs    # Filters and bookmark chaining
//!     └── document_lifecycle.rs  # Types, invalidation, history, persistence
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p gl-tests
//! cargo test -p gl-tests integration::transfer_flow::
//! ```

pub mod integration;
