//! Records of applied document mutations.
//!
//! Every structural or content change returns one of these so that caret
//! placement and persistence can be decided without re-inspecting the
//! document diff.

use crate::model::document::{BlockId, TextPosition};
use crate::model::item::ItemId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// A new item was placed at `index` within the region.
    ItemInserted { item: ItemId, index: usize },
    /// An item was deleted. `region_closed` is set when this emptied the
    /// region and free text was opened in its place.
    ItemRemoved {
        item: ItemId,
        index: usize,
        region_closed: Option<TextPosition>,
    },
    /// List mode ended and typing resumes at `resume_at`.
    ListExited {
        removed: Option<ItemId>,
        resume_at: TextPosition,
    },
    ItemTextEdited { item: ItemId },
    ItemCheckedToggled { item: ItemId, checked: bool },
    FreeTextEdited { block: BlockId },
}

impl Mutation {
    /// Whether the persisted checklist value must be rewritten.
    pub fn changes_items(&self) -> bool {
        match self {
            Self::ItemInserted { .. }
            | Self::ItemRemoved { .. }
            | Self::ItemTextEdited { .. }
            | Self::ItemCheckedToggled { .. } => true,
            Self::ListExited { removed, .. } => removed.is_some(),
            Self::FreeTextEdited { .. } => false,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::ItemInserted { .. } => "item_inserted",
            Self::ItemRemoved { .. } => "item_removed",
            Self::ListExited { .. } => "list_exited",
            Self::ItemTextEdited { .. } => "item_text_edited",
            Self::ItemCheckedToggled { .. } => "item_checked_toggled",
            Self::FreeTextEdited { .. } => "free_text_edited",
        }
    }
}
