//! # Query Model
//!
//! Filter, ordering and cursor pagination over documents.
//!
//! Results are ordered by `createdAt` descending, ties by `id` ascending. The
//! bookmark encodes the position of the last returned document, and the next
//! page starts strictly after that position.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::entities::Document;
use super::errors::ContractError;
use super::value_objects::{DocumentStatus, LinkDirection};

/// Page size used when the filter asks for zero or fewer documents.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Document filter. Every present field must match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueryFilter {
    /// Creating organization.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
    /// Document type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_type_id: Option<String>,
    /// Status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<DocumentStatus>,
    /// Inclusive lower bound on `createdAt`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_date: Option<String>,
    /// Inclusive upper bound on `createdAt`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_date: Option<String>,
    /// Inclusive lower bound on `amount`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_amount: Option<f64>,
    /// Inclusive upper bound on `amount`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_amount: Option<f64>,
    /// `true` selects linked documents, `false` unlinked ones.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_linked_doc: Option<bool>,
    /// Link side.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linked_direction: Option<LinkDirection>,
    /// Page size. Zero or negative means [`DEFAULT_PAGE_SIZE`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<i64>,
    /// Cursor returned by a previous page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bookmark: Option<String>,
}

impl QueryFilter {
    /// Effective page size.
    pub fn effective_page_size(&self) -> usize {
        match self.page_size {
            Some(n) if n > 0 => n as usize,
            _ => DEFAULT_PAGE_SIZE,
        }
    }

    /// Whether `doc` satisfies every present criterion.
    pub fn matches(&self, doc: &Document) -> bool {
        fn non_empty(v: &Option<String>) -> Option<&str> {
            v.as_deref().filter(|s| !s.is_empty())
        }

        if let Some(org) = non_empty(&self.organization_id) {
            if doc.organization_id != org {
                return false;
            }
        }
        if let Some(type_id) = non_empty(&self.document_type_id) {
            if doc.document_type_id != type_id {
                return false;
            }
        }
        if let Some(status) = self.status {
            if doc.status != status {
                return false;
            }
        }
        if let Some(from) = non_empty(&self.from_date) {
            if doc.created_at.as_str() < from {
                return false;
            }
        }
        if let Some(to) = non_empty(&self.to_date) {
            if doc.created_at.as_str() > to {
                return false;
            }
        }
        if let Some(min) = self.min_amount {
            if doc.amount < min {
                return false;
            }
        }
        if let Some(max) = self.max_amount {
            if doc.amount > max {
                return false;
            }
        }
        if let Some(linked) = self.has_linked_doc {
            if doc.has_link() != linked {
                return false;
            }
        }
        if let Some(direction) = self.linked_direction {
            if doc.linked_direction != direction {
                return false;
            }
        }
        true
    }
}

/// One page of query results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    /// Matching documents. Never null.
    #[serde(default)]
    pub documents: Vec<Document>,
    /// Cursor for the next page, present only when more matches remain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bookmark: Option<String>,
    /// Number of documents in this page.
    pub total: usize,
}

/// Position of a document in query order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bookmark {
    /// `createdAt` of the last returned document.
    pub created_at: String,
    /// `id` of the last returned document.
    pub id: String,
}

impl Bookmark {
    /// Position of `doc`.
    pub fn of(doc: &Document) -> Self {
        Self {
            created_at: doc.created_at.clone(),
            id: doc.id.clone(),
        }
    }

    /// Opaque token.
    pub fn encode(&self) -> String {
        hex::encode(format!("{}\n{}", self.created_at, self.id))
    }

    /// Parse a token produced by [`Bookmark::encode`].
    pub fn decode(token: &str) -> Result<Self, ContractError> {
        let invalid = || ContractError::invalid_argument("bookmark", "malformed token");
        let bytes = hex::decode(token).map_err(|_| invalid())?;
        let text = String::from_utf8(bytes).map_err(|_| invalid())?;
        let (created_at, id) = text.split_once('\n').ok_or_else(invalid)?;
        Ok(Self {
            created_at: created_at.to_string(),
            id: id.to_string(),
        })
    }

    /// Whether `doc` comes strictly after this position.
    pub fn precedes(&self, doc: &Document) -> bool {
        query_order_key(&self.created_at, &self.id, &doc.created_at, &doc.id) == Ordering::Less
    }
}

fn query_order_key(a_created: &str, a_id: &str, b_created: &str, b_id: &str) -> Ordering {
    b_created.cmp(a_created).then_with(|| a_id.cmp(b_id))
}

/// Query order: `createdAt` descending, then `id` ascending.
pub fn query_order(a: &Document, b: &Document) -> Ordering {
    query_order_key(&a.created_at, &a.id, &b.created_at, &b.id)
}

/// Filter, sort and cut one page out of `docs`.
pub fn run_query(mut docs: Vec<Document>, filter: &QueryFilter) -> Result<QueryResult, ContractError> {
    let start = match filter.bookmark.as_deref().filter(|b| !b.is_empty()) {
        Some(token) => Some(Bookmark::decode(token)?),
        None => None,
    };
    let page_size = filter.effective_page_size();

    docs.retain(|doc| filter.matches(doc));
    docs.sort_by(query_order);

    let mut remaining = docs
        .into_iter()
        .filter(|doc| start.as_ref().map_or(true, |b| b.precedes(doc)));
    let documents: Vec<Document> = remaining.by_ref().take(page_size).collect();
    let more = remaining.next().is_some();

    let bookmark = match documents.last() {
        Some(last) if more => Some(Bookmark::of(last).encode()),
        _ => None,
    };

    Ok(QueryResult {
        total: documents.len(),
        documents,
        bookmark,
    })
}
