//! # Adapters Module
//!
//! Concrete implementations of the outbound ports.

pub mod in_process;
pub mod registry;

pub use in_process::{InProcessConnector, InProcessContract, StorageMode};
pub use registry::CachedChannelRegistry;
