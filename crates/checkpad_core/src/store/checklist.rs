//! Checklist persistence over a key-value store.
//!
//! # Responsibility
//! - Encode the ordered item list as one JSON array value.
//! - Decode it leniently on startup.
//!
//! # Invariants
//! - Array order is list order.
//! - Absent or malformed values load as an empty list; nothing is raised.
//! - Records without an `id` (written by the original web build) get fresh
//!   ids on load.

use super::{KeyValueStore, StoreResult};
use crate::model::item::{ItemId, TodoItem};
use log::{debug, error, warn};
use serde::Deserialize;

/// Wire record accepted on load.
#[derive(Debug, Deserialize)]
struct StoredItem {
    #[serde(default)]
    id: Option<ItemId>,
    #[serde(default)]
    text: String,
    #[serde(default)]
    checked: bool,
}

impl From<StoredItem> for TodoItem {
    fn from(value: StoredItem) -> Self {
        TodoItem::new(
            value.id.unwrap_or_else(ItemId::generate),
            value.text,
            value.checked,
        )
    }
}

/// Loads and saves the checklist under one fixed key.
#[derive(Debug)]
pub struct ChecklistStore<S: KeyValueStore> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> ChecklistStore<S> {
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    /// Overwrites the stored value with `items`.
    ///
    /// Failures are logged and dropped; the in-memory document stays
    /// authoritative.
    pub fn save(&mut self, items: &[TodoItem]) {
        match self.try_save(items) {
            Ok(()) => debug!(
                "event=checklist_save module=store status=ok count={}",
                items.len()
            ),
            Err(err) => error!(
                "event=checklist_save module=store status=error error_code=save_failed count={} error={}",
                items.len(),
                err
            ),
        }
    }

    /// Reads the stored list, recovering to empty on any problem.
    pub fn load(&self) -> Vec<TodoItem> {
        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("event=checklist_load module=store status=empty reason=absent");
                return Vec::new();
            }
            Err(err) => {
                warn!(
                    "event=checklist_load module=store status=recovered reason=store_error error={}",
                    err
                );
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<StoredItem>>(&raw) {
            Ok(records) => {
                let items: Vec<TodoItem> = records.into_iter().map(TodoItem::from).collect();
                debug!(
                    "event=checklist_load module=store status=ok count={}",
                    items.len()
                );
                items
            }
            Err(err) => {
                warn!(
                    "event=checklist_load module=store status=recovered reason=malformed value_len={} error={}",
                    raw.len(),
                    err
                );
                Vec::new()
            }
        }
    }

    fn try_save(&mut self, items: &[TodoItem]) -> StoreResult<()> {
        // Serializing plain strings and bools cannot fail.
        let value = serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string());
        self.store.set(&self.key, &value)
    }
}
