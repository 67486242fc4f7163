//! # Spending Contract Service
//!
//! [`SpendingContract`] implements [`SpendingContractApi`] over any
//! [`WorldState`]. Each operation opens an [`Invocation`], which records the
//! version of every key it reads and buffers every write until commit.

mod documents;
mod links;
mod registry;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::domain::{
    ContractError, Document, DocumentType, HistoryEntry, IdResult, KeyKind, NewDocument,
    NewDocumentType, QueryFilter, QueryResult, TransactionContext,
};
use crate::ports::{SpendingContractApi, WorldState, WriteSet};

/// The per-channel ledger program.
pub struct SpendingContract<S: WorldState> {
    state: S,
}

impl<S: WorldState> SpendingContract<S> {
    /// Run the contract against `state`.
    pub fn new(state: S) -> Self {
        Self { state }
    }

    /// Backing world state.
    pub fn state(&self) -> &S {
        &self.state
    }

    fn begin<'a>(&'a self, ctx: &'a TransactionContext) -> Invocation<'a, S> {
        Invocation {
            state: &self.state,
            ctx,
            reads: BTreeMap::new(),
            writes: BTreeMap::new(),
        }
    }

    fn scan_records<T: DeserializeOwned>(
        &self,
        kind: KeyKind,
        what: &'static str,
    ) -> Result<Vec<T>, ContractError> {
        self.state
            .scan_prefix(&kind.scan_prefix())?
            .into_iter()
            .map(|(_, v)| decode(&v.value, what))
            .collect()
    }
}

/// Read/write set of one transaction.
pub(crate) struct Invocation<'a, S: WorldState> {
    state: &'a S,
    ctx: &'a TransactionContext,
    reads: BTreeMap<String, Option<u64>>,
    writes: BTreeMap<String, Vec<u8>>,
}

impl<'a, S: WorldState> Invocation<'a, S> {
    fn get(&mut self, key: &str) -> Result<Option<Vec<u8>>, ContractError> {
        if let Some(pending) = self.writes.get(key) {
            return Ok(Some(pending.clone()));
        }
        let current = self.state.get_state(key)?;
        self.reads
            .entry(key.to_string())
            .or_insert_with(|| current.as_ref().map(|v| v.version));
        Ok(current.map(|v| v.value))
    }

    fn get_record<T: DeserializeOwned>(
        &mut self,
        kind: KeyKind,
        id: &str,
        what: &'static str,
    ) -> Result<Option<T>, ContractError> {
        match self.get(&kind.key(id))? {
            Some(bytes) => decode(&bytes, what).map(Some),
            None => Ok(None),
        }
    }

    fn exists(&mut self, kind: KeyKind, id: &str) -> Result<bool, ContractError> {
        Ok(self.get(&kind.key(id))?.is_some())
    }

    fn put_record<T: Serialize>(
        &mut self,
        kind: KeyKind,
        id: &str,
        record: &T,
        what: &'static str,
    ) -> Result<(), ContractError> {
        let bytes = serde_json::to_vec(record).map_err(|e| ContractError::Marshal {
            what,
            reason: e.to_string(),
        })?;
        self.writes.insert(kind.key(id), bytes);
        Ok(())
    }

    fn commit(self) -> Result<(), ContractError> {
        if self.writes.is_empty() {
            return Ok(());
        }
        self.state.commit(WriteSet {
            tx_id: self.ctx.tx_id.clone(),
            timestamp: self.ctx.timestamp.clone(),
            reads: self.reads,
            writes: self.writes,
        })?;
        Ok(())
    }
}

fn decode<T: DeserializeOwned>(bytes: &[u8], what: &'static str) -> Result<T, ContractError> {
    serde_json::from_slice(bytes).map_err(|e| ContractError::Unmarshal {
        what,
        reason: e.to_string(),
    })
}

impl<S: WorldState> SpendingContractApi for SpendingContract<S> {
    fn register_document_type(
        &self,
        ctx: &TransactionContext,
        request: NewDocumentType,
    ) -> Result<IdResult, ContractError> {
        self.register_type(ctx, request)
    }

    fn get_document_type(&self, ctx: &TransactionContext, id: &str) -> Result<DocumentType, ContractError> {
        self.get_type(ctx, id)
    }

    fn list_document_types(
        &self,
        _ctx: &TransactionContext,
        org_filter: Option<&str>,
    ) -> Result<Vec<DocumentType>, ContractError> {
        self.list_types(org_filter)
    }

    fn deactivate_document_type(&self, ctx: &TransactionContext, id: &str) -> Result<(), ContractError> {
        self.deactivate_type(ctx, id)
    }

    fn create_document(&self, ctx: &TransactionContext, request: NewDocument) -> Result<IdResult, ContractError> {
        self.create_doc(ctx, request)
    }

    fn get_document(&self, ctx: &TransactionContext, id: &str) -> Result<Document, ContractError> {
        self.get_doc(ctx, id)
    }

    fn invalidate_document(
        &self,
        ctx: &TransactionContext,
        id: &str,
        reason: &str,
        correction_doc_id: Option<&str>,
    ) -> Result<(), ContractError> {
        self.invalidate_doc(ctx, id, reason, correction_doc_id)
    }

    fn query_documents(&self, _ctx: &TransactionContext, filter: &QueryFilter) -> Result<QueryResult, ContractError> {
        self.query_docs(filter)
    }

    fn get_document_history(&self, _ctx: &TransactionContext, id: &str) -> Result<Vec<HistoryEntry>, ContractError> {
        self.doc_history(id)
    }

    fn update_document_link(
        &self,
        ctx: &TransactionContext,
        id: &str,
        linked_doc_id: &str,
        linked_channel: &str,
        linked_doc_hash: &str,
    ) -> Result<(), ContractError> {
        self.update_link(ctx, id, linked_doc_id, linked_channel, linked_doc_hash)
    }
}
