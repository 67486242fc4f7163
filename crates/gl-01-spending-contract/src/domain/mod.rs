//! # Domain Module
//!
//! Core types of the spending contract.

pub mod entities;
pub mod errors;
pub mod hashing;
pub mod invariants;
pub mod query;
pub mod value_objects;

pub use entities::*;
pub use errors::*;
pub use hashing::*;
pub use invariants::*;
pub use query::*;
pub use value_objects::*;
