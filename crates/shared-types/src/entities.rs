//! # Shared Constants
//!
//! Values every crate agrees on without going through configuration.

/// Default channel keys, one per government tier.
pub const DEFAULT_CHANNEL_KEYS: [&str; 3] = ["union", "state", "municipal"];

/// Currency recorded when a request leaves it empty.
pub const DEFAULT_CURRENCY: &str = "BRL";
