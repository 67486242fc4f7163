//! # Gov-Ledger Node
//!
//! Library half of the `gl-node` binary, exposed for tests.
//!
//! - `container/` - configuration loading and channel wiring
//! - `cli/` - argument parsing and command execution
//!
//! ## Startup Sequence
//!
//! 1. Parse arguments
//! 2. Load configuration (defaults, TOML file, environment, flags)
//! 3. Initialize telemetry
//! 4. Wire one contract handle per configured channel
//! 5. Run the requested operation and print its JSON result

#![warn(missing_docs)]

pub mod cli;
pub mod container;

pub use cli::{execute, Cli, Command};
pub use container::{ConfigError, LedgerNode, NodeConfig, NodeGateway};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
