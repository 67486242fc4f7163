//! # Shared Types Crate
//!
//! Types shared by every crate of the gov-ledger workspace.
//!
//! ## Contents
//!
//! | Module | Purpose |
//! |--------|---------|
//! | `entities` | Government-tier channel keys and the default currency |
//! | `errors` | Stable [`ErrorCode`] taxonomy and the user-visible [`ErrorResponse`] |
//! | `security` | Message sanitization applied before anything leaves the node |
//!
//! ## Design Principles
//!
//! - **Stable codes**: every subsystem error maps onto one [`ErrorCode`], so
//!   callers never have to parse messages.
//! - **Nothing internal leaks**: [`ErrorResponse`] only carries sanitized text
//!   and whitelisted context keys.

#![warn(missing_docs)]

pub mod entities;
pub mod errors;
pub mod security;

pub use entities::*;
pub use errors::*;
pub use security::*;
