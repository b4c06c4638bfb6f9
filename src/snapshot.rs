//! Local snapshot persistence behind a small key-value trait.

#[cfg(test)]
#[path = "snapshot_test.rs"]
mod snapshot_test;

use std::collections::HashMap;

use crate::error::EditorError;

/// String key-value storage for design snapshots.
pub trait SnapshotStore {
    /// The value stored under `key`, or `None` when nothing is stored.
    fn load(&self, key: &str) -> Result<Option<String>, EditorError>;

    fn save(&mut self, key: &str, value: &str) -> Result<(), EditorError>;

    fn remove(&mut self, key: &str) -> Result<(), EditorError>;
}

/// In-memory store, used natively and in tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, EditorError> {
        Ok(self.entries.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), EditorError> {
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), EditorError> {
        self.entries.remove(key);
        Ok(())
    }
}
