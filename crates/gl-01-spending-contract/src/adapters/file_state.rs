//! File-backed world state.
//!
//! The whole state of one channel is kept in memory and written as a JSON
//! snapshot to `<data_dir>/<channel>.json` after every commit. The snapshot
//! is written to a temporary file first and renamed into place, so a crash
//! leaves either the previous or the new state on disk.

use parking_lot::RwLock;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::memory_state::StateTables;
use crate::domain::StateError;
use crate::ports::{KeyModification, VersionedValue, WorldState, WriteSet};

/// World state persisted as one JSON snapshot per channel.
#[derive(Debug)]
pub struct FileWorldState {
    path: PathBuf,
    tables: RwLock<StateTables>,
}

impl FileWorldState {
    /// Open (or start) the snapshot for `channel` under `data_dir`.
    pub fn open(data_dir: impl AsRef<Path>, channel: &str) -> Result<Self, StateError> {
        let data_dir = data_dir.as_ref();
        fs::create_dir_all(data_dir).map_err(|e| StateError::Io(e.to_string()))?;
        let path = data_dir.join(format!("{channel}.json"));

        let tables = if path.exists() {
            let bytes = fs::read(&path).map_err(|e| StateError::Io(e.to_string()))?;
            let tables: StateTables =
                serde_json::from_slice(&bytes).map_err(|e| StateError::Corrupted(e.to_string()))?;
            info!(channel, path = %path.display(), "[gl-01] World state loaded");
            tables
        } else {
            StateTables::default()
        };

        Ok(Self {
            path,
            tables: RwLock::new(tables),
        })
    }

    /// Snapshot location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, tables: &StateTables) -> Result<(), StateError> {
        let bytes = serde_json::to_vec_pretty(tables).map_err(|e| StateError::Io(e.to_string()))?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, bytes).map_err(|e| StateError::Io(e.to_string()))?;
        fs::rename(&tmp, &self.path).map_err(|e| StateError::Io(e.to_string()))?;
        Ok(())
    }
}

impl WorldState for FileWorldState {
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

        let tx_id = write_set.tx_id.clone();
        let mut next = tables.clone();
        next.apply(write_set);
        self.persist(&next)?;
        *tables = next;

        debug!(tx_id = %tx_id, path = %self.path.display(), "[gl-01] Snapshot written");
        Ok(())
    }
}
