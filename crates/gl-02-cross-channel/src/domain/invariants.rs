//! # Domain Invariants
//!
//! Rules binding the two halves of a cross-channel link.

use gl_01_spending_contract::Document;

use super::entities::AnchorVerification;
use super::value_objects::{AnchorStatus, MismatchReason};

/// Invariant: the target recorded the source's hash at acknowledgment time.
pub fn invariant_hash_anchored(source: &Document, target: &Document) -> bool {
    target.linked_doc_hash == source.content_hash
}

/// Invariant: the target points at the source id.
pub fn invariant_id_anchored(source: &Document, target: &Document) -> bool {
    target.linked_doc_id == source.id
}

/// Invariant: the target points at the source channel key.
pub fn invariant_channel_anchored(source_channel: &str, target: &Document) -> bool {
    target.linked_channel == source_channel
}

/// Invariant: both halves carry the same amount.
///
/// Exact equality. The acknowledgment copies the source amount verbatim, so
/// any difference means one side was written by something else.
#[allow(clippy::float_cmp)]
pub fn invariant_amount_preserved(source: &Document, target: &Document) -> bool {
    source.amount == target.amount
}

/// Compare the two halves of a transfer.
///
/// The four checks are independent; every failing one is reported, in
/// check order.
pub fn check_anchor(
    source_channel: &str,
    source: &Document,
    target_channel: &str,
    target: &Document,
) -> AnchorVerification {
    let hash_match = invariant_hash_anchored(source, target);
    let id_match = invariant_id_anchored(source, target);
    let channel_match = invariant_channel_anchored(source_channel, target);
    let amount_match = invariant_amount_preserved(source, target);

    let mut mismatch_reason = Vec::new();
    for (ok, reason) in [
        (hash_match, MismatchReason::ContentHash),
        (id_match, MismatchReason::DocumentId),
        (channel_match, MismatchReason::Channel),
        (amount_match, MismatchReason::Amount),
    ] {
        if !ok {
            mismatch_reason.push(reason);
        }
    }
    let is_valid = mismatch_reason.is_empty();

    AnchorVerification {
        source_doc_id: source.id.clone(),
        source_channel: source_channel.to_string(),
        source_hash: source.content_hash.clone(),
        source_amount: source.amount,
        source_currency: source.currency.clone(),
        target_doc_id: target.id.clone(),
        target_channel: target_channel.to_string(),
        target_hash: target.content_hash.clone(),
        target_linked_hash: target.linked_doc_hash.clone(),
        target_amount: target.amount,
        target_currency: target.currency.clone(),
        hash_match,
        id_match,
        channel_match,
        amount_match,
        is_valid,
        status: if is_valid {
            AnchorStatus::Verified
        } else {
            AnchorStatus::Mismatch
        },
        mismatch_reason,
    }
}
