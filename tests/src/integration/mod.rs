//! Integration flows across the contract, the gateway and the node.

#[cfg(test)]
mod fixtures;

pub mod anchor;
pub mod document_lifecycle;
pub mod query_pagination;
pub mod transfer_flow;
