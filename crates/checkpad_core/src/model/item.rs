//! Checklist item model.
//!
//! # Responsibility
//! - Define the record stored for every checklist entry.
//! - Generate stable item identifiers.
//!
//! # Invariants
//! - `id` is assigned once and never reused for another item.
//! - Blank `text` is only legal for an item that was just inserted or is
//!   being removed; such items are never persisted.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for one checklist item.
///
/// Persisted as a plain JSON string. Ids loaded from storage are adopted
/// verbatim, so the inner value is not required to be a UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Draws a fresh random id.
    ///
    /// Uniqueness within a document is enforced by the document's issued-id
    /// registry, not by this function alone.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ItemId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Display for ItemId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One entry of the checklist region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    pub id: ItemId,
    /// Plain or lightly styled text owned by the item's own input field.
    pub text: String,
    pub checked: bool,
}

impl TodoItem {
    pub fn new(id: ItemId, text: impl Into<String>, checked: bool) -> Self {
        Self {
            id,
            text: text.into(),
            checked,
        }
    }

    /// Returns whether the item text is empty after trimming whitespace.
    ///
    /// Enter on a blank item leaves list mode; blank items are skipped when
    /// saving.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{ItemId, TodoItem};

    #[test]
    fn generated_ids_are_distinct() {
        let first = ItemId::generate();
        let second = ItemId::generate();
        assert_ne!(first, second);
        assert!(!first.as_str().is_empty());
    }

    #[test]
    fn whitespace_only_text_is_blank() {
        let item = TodoItem::new(ItemId::from("a"), " \t ", false);
        assert!(item.is_blank());
        let item = TodoItem::new(ItemId::from("b"), " x ", false);
        assert!(!item.is_blank());
    }
}
