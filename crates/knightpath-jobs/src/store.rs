//! Result storage keyed by operation id.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;
use std::sync::{PoisonError, RwLock};

use crate::job::JobRecord;

/// Where workers put finished jobs and retrieval looks them up.
///
/// Each `(partition_key, operation_id)` holds at most one record; a second
/// insert for the same key fails and leaves the first in place.
pub trait ResultStore: Send + Sync {
    /// Store a record under its partition and operation id.
    fn insert(&self, record: JobRecord) -> Result<(), StoreError>;

    /// Look a record up.
    fn get(&self, partition_key: &str, operation_id: &str) -> Option<JobRecord>;

    /// Whether a record is stored under this key.
    fn contains(&self, partition_key: &str, operation_id: &str) -> bool {
        self.get(partition_key, operation_id).is_some()
    }

    /// Number of stored records.
    fn len(&self) -> usize;

    /// Whether nothing has been stored yet.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-process [`ResultStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: RwLock<HashMap<(String, String), JobRecord>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ResultStore for MemoryStore {
    fn insert(&self, record: JobRecord) -> Result<(), StoreError> {
        let mut rows = self.rows.write().unwrap_or_else(PoisonError::into_inner);
        let key = (record.partition_key.clone(), record.operation_id.clone());
        match rows.entry(key) {
            Entry::Occupied(e) => Err(StoreError::Duplicate {
                partition_key: e.key().0.clone(),
                operation_id: e.key().1.clone(),
            }),
            Entry::Vacant(e) => {
                e.insert(record);
                Ok(())
            }
        }
    }

    fn get(&self, partition_key: &str, operation_id: &str) -> Option<JobRecord> {
        let rows = self.rows.read().unwrap_or_else(PoisonError::into_inner);
        rows.get(&(partition_key.to_string(), operation_id.to_string())).cloned()
    }

    fn len(&self) -> usize {
        self.rows.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}

/// Errors returned by a [`ResultStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A record already exists for this key.
    Duplicate {
        partition_key: String,
        operation_id: String,
    },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Duplicate {
                partition_key,
                operation_id,
            } => write!(f, "result {partition_key}/{operation_id} already stored"),
        }
    }
}

impl std::error::Error for StoreError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, moves: Option<u32>) -> JobRecord {
        JobRecord {
            partition_key: "KnightPath".into(),
            operation_id: id.into(),
            number_of_moves: moves,
            shortest_path: String::new(),
            starting: "a1".into(),
            ending: "h8".into(),
            completed_at_ms: 0,
        }
    }

    #[test]
    fn insert_and_get() {
        let store = MemoryStore::new();
        assert!(store.is_empty());
        store.insert(record("a", Some(6))).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("KnightPath", "a").unwrap().number_of_moves, Some(6));
        assert!(store.contains("KnightPath", "a"));
        assert!(store.get("Other", "a").is_none());
        assert!(store.get("KnightPath", "b").is_none());
    }

    #[test]
    fn duplicate_keeps_first() {
        let store = MemoryStore::new();
        store.insert(record("a", Some(6))).unwrap();
        let err = store.insert(record("a", None)).unwrap_err();
        assert_eq!(
            err,
            StoreError::Duplicate {
                partition_key: "KnightPath".into(),
                operation_id: "a".into(),
            }
        );
        assert_eq!(store.get("KnightPath", "a").unwrap().number_of_moves, Some(6));
        assert_eq!(store.len(), 1);
    }
}
