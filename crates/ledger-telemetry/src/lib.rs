//! # Ledger Telemetry
//!
//! Structured logging for the Gov-Ledger node.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ledger_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     let _guard = init_telemetry(TelemetryConfig::from_env())?;
//!     // Every tracing event is now formatted and filtered.
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `GL_LOG_LEVEL` | `info` | Filter directive, falls back to `RUST_LOG` |
//! | `GL_JSON_LOGS` | `false`, `true` in containers | JSON instead of pretty output |
//! | `GL_SERVICE_NAME` | `gov-ledger` | Service name on the startup event |

#![warn(missing_docs)]

mod config;
mod logging;

pub use config::TelemetryConfig;
pub use logging::{init_telemetry, TelemetryGuard};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// The log filter directive could not be parsed.
    #[error("Invalid log filter: {0}")]
    Filter(String),

    /// A global subscriber is already installed.
    #[error("Telemetry already initialized: {0}")]
    AlreadyInitialized(String),
}

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
