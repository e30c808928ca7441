//! In-process key-value store.

use super::{KeyValueStore, StoreResult};
use std::collections::HashMap;

/// `HashMap`-backed store for tests and hosts without durable storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful `set` calls.
    pub fn write_count(&self) -> usize {
        self.writes
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }
}
