//! # Domain Invariants
//!
//! Business rules checked by the contract before any write.

use super::entities::{Document, DocumentData, DocumentType};
use super::errors::ContractError;
use super::value_objects::DocumentStatus;

/// Invariant: the payload contains every required key.
///
/// Presence only. Values are not type-checked.
pub fn invariant_required_fields_present(
    doc_type: &DocumentType,
    data: &DocumentData,
) -> Result<(), ContractError> {
    match doc_type.required_fields.iter().find(|f| !data.contains_key(f.as_str())) {
        Some(missing) => Err(ContractError::MissingRequiredField(missing.clone())),
        None => Ok(()),
    }
}

/// Invariant: only active types accept new documents.
pub fn invariant_type_active(doc_type: &DocumentType) -> Result<(), ContractError> {
    if doc_type.is_active {
        Ok(())
    } else {
        Err(ContractError::DocumentTypeInactive(doc_type.id.clone()))
    }
}

/// Invariant: status only moves ACTIVE → INVALIDATED.
pub fn invariant_can_invalidate(doc: &Document) -> Result<(), ContractError> {
    match doc.status {
        DocumentStatus::Active => Ok(()),
        DocumentStatus::Invalidated => Err(ContractError::AlreadyInvalidated(doc.id.clone())),
    }
}

/// Invariant: the caller's organization owns the record.
pub fn invariant_owner(
    owner_org: &str,
    caller_org: &str,
    action: &'static str,
) -> Result<(), ContractError> {
    if owner_org == caller_org {
        Ok(())
    } else {
        Err(ContractError::NotOwner { action })
    }
}

/// Invariant: identifiers are non-empty and cannot break composite keys.
pub fn invariant_valid_id(name: &str, id: &str) -> Result<(), ContractError> {
    if id.is_empty() {
        return Err(ContractError::invalid_argument(name, "must not be empty"));
    }
    if id.contains('\u{0}') {
        return Err(ContractError::invalid_argument(name, "must not contain NUL"));
    }
    Ok(())
}
