//! # Adapters Layer (Hexagonal Architecture)
//!
//! World-state backends and the textual contract router.

mod file_state;
mod memory_state;
mod router;

pub use file_state::FileWorldState;
pub use memory_state::InMemoryWorldState;
pub use router::{ContractFunction, ContractRouter};
