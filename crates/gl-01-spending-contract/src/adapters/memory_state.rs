//! In-memory world state.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::domain::StateError;
use crate::ports::{KeyModification, VersionedValue, WorldState, WriteSet};

/// Current values and per-key modification logs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct StateTables {
    entries: BTreeMap<String, VersionedValue>,
    history: BTreeMap<String, Vec<KeyModification>>,
}

impl StateTables {
    pub(crate) fn get(&self, key: &str) -> Option<VersionedValue> {
        self.entries.get(key).cloned()
    }

    pub(crate) fn scan(&self, prefix: &str) -> Vec<(String, VersionedValue)> {
        self.entries
            .range(prefix.to_string()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    pub(crate) fn history(&self, key: &str) -> Vec<KeyModification> {
        self.history.get(key).cloned().unwrap_or_default()
    }

    /// Reject the set if any key it read has moved on.
    pub(crate) fn validate(&self, write_set: &WriteSet) -> Result<(), StateError> {
        for (key, seen) in &write_set.reads {
            let current = self.entries.get(key).map(|v| v.version);
            if current != *seen {
                return Err(StateError::VersionConflict {
                    key: printable_key(key),
                });
            }
        }
        Ok(())
    }

    pub(crate) fn apply(&mut self, write_set: WriteSet) {
        for (key, value) in write_set.writes {
            let version = self.entries.get(&key).map_or(1, |v| v.version + 1);
            self.history.entry(key.clone()).or_default().push(KeyModification {
                tx_id: write_set.tx_id.clone(),
                timestamp: write_set.timestamp.clone(),
                is_delete: false,
                value: value.clone(),
            });
            self.entries.insert(key, VersionedValue { value, version });
        }
    }
}

/// Composite keys carry NUL separators; render them readably.
pub(crate) fn printable_key(key: &str) -> String {
    key.trim_matches('\u{0}').replace('\u{0}', "/")
}

/// World state held in memory. History lives as long as the value.
#[derive(Debug, Default)]
pub struct InMemoryWorldState {
    tables: RwLock<StateTables>,
}

impl InMemoryWorldState {
    /// Empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live keys.
    pub fn len(&self) -> usize {
        self.tables.read().entries.len()
    }

    /// Whether no key was ever written.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl WorldState for InMemoryWorldState {
    fn get_state(&self, key: &str) -> Result<Option<VersionedValue>, StateError> {
        Ok(self.tables.read().get(key))
    }

    fn scan_prefix(&self, prefix: &str) -> Result<Vec<(String, VersionedValue)>, StateError> {
        Ok(self.tables.read().scan(prefix))
    }

    fn history_for_key(&self, key: &str) -> Result<Vec<KeyModification>, StateError> {
        Ok(self.tables.read().history(key))
    }

    fn commit(&self, write_set: WriteSet) -> Result<(), StateError> {
        let mut tables = self.tables.write();
        tables.validate(&write_set)?;
        debug!(tx_id = %write_set.tx_id, writes = write_set.writes.len(), "[gl-01] Commit");
        tables.apply(write_set);
        Ok(())
    }
}
