//! # Outbound Ports (Driven Ports)
//!
//! The world state the contract runs against.
//!
//! Production: `FileWorldState` (snapshot per channel)
//! Testing: `InMemoryWorldState`

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::errors::StateError;

/// A stored value and the version it was written at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionedValue {
    /// Raw bytes.
    #[serde(with = "hex_bytes")]
    pub value: Vec<u8>,
    /// Monotonic per-key version, starting at 1.
    pub version: u64,
}

/// One committed modification of a key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyModification {
    /// Committing transaction.
    pub tx_id: String,
    /// Commit timestamp.
    pub timestamp: String,
    /// Deletion marker.
    pub is_delete: bool,
    /// Value written (empty for deletions).
    #[serde(with = "hex_bytes")]
    pub value: Vec<u8>,
}

mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let text = String::deserialize(deserializer)?;
        hex::decode(text).map_err(serde::de::Error::custom)
    }
}

/// Everything one invocation read and wants to write.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteSet {
    /// Committing transaction.
    pub tx_id: String,
    /// Commit timestamp.
    pub timestamp: String,
    /// Version observed for each key read. `None` means the key was absent.
    pub reads: BTreeMap<String, Option<u64>>,
    /// Values to store.
    pub writes: BTreeMap<String, Vec<u8>>,
}

impl WriteSet {
    /// Whether the invocation wrote anything.
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }
}

/// Versioned key-value store with per-key history.
///
/// ## Atomicity
///
/// [`WorldState::commit`] validates every read version and applies every
/// write, or rejects the whole set with [`StateError::VersionConflict`].
pub trait WorldState: Send + Sync {
    /// Current value of a key.
    fn get_state(&self, key: &str) -> Result<Option<VersionedValue>, StateError>;

    /// Every key starting with `prefix`, in key order.
    fn scan_prefix(&self, prefix: &str) -> Result<Vec<(String, VersionedValue)>, StateError>;

    /// Every committed modification of a key, oldest first.
    fn history_for_key(&self, key: &str) -> Result<Vec<KeyModification>, StateError>;

    /// Validate and apply a write set.
    fn commit(&self, write_set: WriteSet) -> Result<(), StateError>;
}

impl<T: WorldState + ?Sized> WorldState for std::sync::Arc<T> {
    fn get_state(&self, key: &str) -> Result<Option<VersionedValue>, StateError> {
        (**self).get_state(key)
    }

    fn scan_prefix(&self, prefix: &str) -> Result<Vec<(String, VersionedValue)>, StateError> {
        (**self).scan_prefix(prefix)
    }

    fn history_for_key(&self, key: &str) -> Result<Vec<KeyModification>, StateError> {
        (**self).history_for_key(key)
    }

    fn commit(&self, write_set: WriteSet) -> Result<(), StateError> {
        (**self).commit(write_set)
    }
}
