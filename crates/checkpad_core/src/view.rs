//! Render projection of the document.
//!
//! # Responsibility
//! - Derive an immutable, host-neutral view of the document after each
//!   mutation.
//!
//! # Invariants
//! - `struck_through` is computed from `checked` and never stored.
//! - The view carries no editing state; rebuilding it is always safe.

use crate::model::document::{Block, BlockId, Document};
use crate::model::item::{ItemId, TodoItem};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemView {
    pub id: ItemId,
    pub text: String,
    pub checked: bool,
    pub struck_through: bool,
}

impl From<&TodoItem> for ItemView {
    fn from(item: &TodoItem) -> Self {
        Self {
            id: item.id.clone(),
            text: item.text.clone(),
            checked: item.checked,
            struck_through: item.checked,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockView {
    FreeText { id: BlockId, content: String },
    Checklist { id: BlockId, items: Vec<ItemView> },
}

/// Snapshot handed to the host renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentView {
    pub revision: u64,
    pub list_active: bool,
    pub blocks: Vec<BlockView>,
}

impl DocumentView {
    pub fn project(document: &Document, list_active: bool, revision: u64) -> Self {
        let blocks = document
            .blocks()
            .iter()
            .map(|block| match block {
                Block::FreeText { id, content } => BlockView::FreeText {
                    id: *id,
                    content: content.clone(),
                },
                Block::Checklist { id, items } => BlockView::Checklist {
                    id: *id,
                    items: items.iter().map(ItemView::from).collect(),
                },
            })
            .collect();
        Self {
            revision,
            list_active,
            blocks,
        }
    }

    pub fn items(&self) -> &[ItemView] {
        self.blocks
            .iter()
            .find_map(|block| match block {
                BlockView::Checklist { items, .. } => Some(items.as_slice()),
                BlockView::FreeText { .. } => None,
            })
            .unwrap_or(&[])
    }
}

/// Plain-text rendering: free text verbatim, items as `- [ ]` / `- [x]` lines,
/// struck items wrapped in `~~`.
impl Display for DocumentView {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for block in &self.blocks {
            match block {
                BlockView::FreeText { content, .. } => {
                    if !content.is_empty() {
                        writeln!(f, "{content}")?;
                    }
                }
                BlockView::Checklist { items, .. } => {
                    for item in items {
                        let mark = if item.checked { 'x' } else { ' ' };
                        if item.struck_through {
                            writeln!(f, "- [{mark}] ~~{}~~", item.text)?;
                        } else {
                            writeln!(f, "- [{mark}] {}", item.text)?;
                        }
                    }
                }
            }
        }
        Ok(())
    }
}
