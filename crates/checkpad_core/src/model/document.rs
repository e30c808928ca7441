//! Block-structured document model.
//!
//! # Responsibility
//! - Hold the ordered block sequence rendered by the editing surface.
//! - Provide the structural primitives (region create/close, item
//!   insert/remove, free-text coalescing) used by the list controller.
//!
//! # Invariants
//! - At most one `Block::Checklist` exists at any time.
//! - Adjacent `Block::FreeText` blocks are merged after every structural
//!   mutation; the earlier block keeps its id.
//! - Leaving a region never replaces an existing free-text block id with a
//!   fresh one.
//! - `BlockId` values come from a per-document counter and are never reused.
//! - Every item id placed in the document is recorded in the issued-id
//!   registry and is never handed out again, even after removal.

use crate::model::item::{ItemId, TodoItem};
use std::collections::HashSet;
use std::fmt::{Display, Formatter};

/// Identifier of one block inside a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(u64);

impl BlockId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl Display for BlockId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "b{}", self.0)
    }
}

/// A caret location inside a free-text block.
///
/// `offset` counts Unicode scalar values from the start of the block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextPosition {
    pub block: BlockId,
    pub offset: usize,
}

/// One top-level element of the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Host-styled text. The core stores it opaquely.
    FreeText { id: BlockId, content: String },
    /// The managed checklist region.
    Checklist { id: BlockId, items: Vec<TodoItem> },
}

impl Block {
    pub fn id(&self) -> BlockId {
        match self {
            Self::FreeText { id, .. } | Self::Checklist { id, .. } => *id,
        }
    }

    pub fn is_checklist(&self) -> bool {
        matches!(self, Self::Checklist { .. })
    }
}

/// Ordered block sequence owned by one editing session.
#[derive(Debug, Clone)]
pub struct Document {
    blocks: Vec<Block>,
    next_block_id: u64,
    issued_item_ids: HashSet<ItemId>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Creates a document holding one empty free-text block.
    pub fn new() -> Self {
        Self::with_opening_text().0
    }

    /// Like `new`, also returning the id of the opening free-text block.
    pub(crate) fn with_opening_text() -> (Self, BlockId) {
        let mut document = Self {
            blocks: Vec::new(),
            next_block_id: 0,
            issued_item_ids: HashSet::new(),
        };
        let id = document.next_block_id();
        document.blocks.push(Block::FreeText {
            id,
            content: String::new(),
        });
        (document, id)
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn contains_block(&self, id: BlockId) -> bool {
        self.blocks.iter().any(|block| block.id() == id)
    }

    /// Returns the content of a free-text block.
    pub fn free_text(&self, id: BlockId) -> Option<&str> {
        self.blocks.iter().find_map(|block| match block {
            Block::FreeText { id: block_id, content } if *block_id == id => {
                Some(content.as_str())
            }
            _ => None,
        })
    }

    /// Id of the last free-text block, if any.
    pub fn last_free_text(&self) -> Option<BlockId> {
        self.blocks.iter().rev().find_map(|block| match block {
            Block::FreeText { id, .. } => Some(*id),
            Block::Checklist { .. } => None,
        })
    }

    /// Concatenated content of all free-text blocks, in document order.
    pub fn free_text_content(&self) -> String {
        self.blocks
            .iter()
            .filter_map(|block| match block {
                Block::FreeText { content, .. } => Some(content.as_str()),
                Block::Checklist { .. } => None,
            })
            .collect()
    }

    pub fn checklist_id(&self) -> Option<BlockId> {
        self.blocks
            .iter()
            .find(|block| block.is_checklist())
            .map(Block::id)
    }

    pub fn has_checklist(&self) -> bool {
        self.checklist_id().is_some()
    }

    /// Items of the checklist region; empty when no region exists.
    pub fn items(&self) -> &[TodoItem] {
        self.blocks
            .iter()
            .find_map(|block| match block {
                Block::Checklist { items, .. } => Some(items.as_slice()),
                Block::FreeText { .. } => None,
            })
            .unwrap_or(&[])
    }

    pub fn item(&self, id: &ItemId) -> Option<&TodoItem> {
        self.items().iter().find(|item| &item.id == id)
    }

    pub fn item_position(&self, id: &ItemId) -> Option<usize> {
        self.items().iter().position(|item| &item.id == id)
    }

    /// Returns whether `id` has ever been issued or adopted by this document.
    pub fn has_issued(&self, id: &ItemId) -> bool {
        self.issued_item_ids.contains(id)
    }

    /// Replaces the content of a free-text block.
    ///
    /// Returns `false` when the block does not exist or the content is unchanged.
    pub(crate) fn set_free_text(&mut self, id: BlockId, new_content: &str) -> bool {
        for block in &mut self.blocks {
            if let Block::FreeText {
                id: block_id,
                content,
            } = block
            {
                if *block_id == id {
                    if content.as_str() == new_content {
                        return false;
                    }
                    content.clear();
                    content.push_str(new_content);
                    return true;
                }
            }
        }
        false
    }

    /// Allocates an item id never seen by this document.
    pub(crate) fn allocate_item_id(&mut self) -> ItemId {
        loop {
            let candidate = ItemId::generate();
            if self.issued_item_ids.insert(candidate.clone()) {
                return candidate;
            }
        }
    }

    /// Registers an externally supplied id, replacing it when already taken.
    pub(crate) fn adopt_item_id(&mut self, id: ItemId) -> ItemId {
        if self.issued_item_ids.insert(id.clone()) {
            id
        } else {
            self.allocate_item_id()
        }
    }

    pub(crate) fn item_mut(&mut self, id: &ItemId) -> Option<&mut TodoItem> {
        self.items_mut()?.iter_mut().find(|item| &item.id == id)
    }

    /// Creates the checklist region right after `anchor` unless one exists.
    ///
    /// Falls back to appending at the end when `anchor` is unknown. Returns the
    /// region id.
    pub(crate) fn ensure_checklist_after(&mut self, anchor: BlockId) -> BlockId {
        if let Some(id) = self.checklist_id() {
            return id;
        }
        let index = self
            .blocks
            .iter()
            .position(|block| block.id() == anchor)
            .map_or(self.blocks.len(), |index| index + 1);
        let id = self.next_block_id();
        self.blocks.insert(
            index,
            Block::Checklist {
                id,
                items: Vec::new(),
            },
        );
        id
    }

    /// Installs a restored checklist in front of the existing blocks.
    ///
    /// No-op when a region already exists or `items` is empty.
    pub(crate) fn install_checklist(&mut self, items: Vec<TodoItem>) -> Option<BlockId> {
        if self.has_checklist() || items.is_empty() {
            return None;
        }
        let items: Vec<TodoItem> = items
            .into_iter()
            .map(|item| TodoItem::new(self.adopt_item_id(item.id), item.text, item.checked))
            .collect();
        let id = self.next_block_id();
        self.blocks.insert(0, Block::Checklist { id, items });
        Some(id)
    }

    /// Inserts an item into the existing region.
    ///
    /// The item lands right after `after` when that item exists, otherwise at
    /// the end. Returns the insertion index, or `None` when no region exists.
    pub(crate) fn insert_item(&mut self, item: TodoItem, after: Option<&ItemId>) -> Option<usize> {
        let items = self.items_mut()?;
        let index = after
            .and_then(|after| items.iter().position(|existing| &existing.id == after))
            .map_or(items.len(), |index| index + 1);
        items.insert(index, item);
        Some(index)
    }

    /// Removes an item, returning it with its former index.
    pub(crate) fn remove_item(&mut self, id: &ItemId) -> Option<(TodoItem, usize)> {
        let items = self.items_mut()?;
        let index = items.iter().position(|item| &item.id == id)?;
        Some((items.remove(index), index))
    }

    /// Deletes an empty checklist region, resuming in the surrounding text.
    ///
    /// Text above the region wins: the caret lands at its end and any text
    /// below merges into it. With text only below, the caret lands at its
    /// start. A fresh block is opened only when the region had no free-text
    /// neighbour. Returns `None` when there is no region or it still holds
    /// items.
    pub(crate) fn close_empty_checklist(&mut self) -> Option<TextPosition> {
        let index = self.blocks.iter().position(|block| {
            matches!(block, Block::Checklist { items, .. } if items.is_empty())
        })?;
        self.blocks.remove(index);

        let above = index
            .checked_sub(1)
            .and_then(|above| self.free_text_at(above));
        if let Some((block, content_len)) = above {
            return Some(self.coalesce(TextPosition {
                block,
                offset: content_len,
            }));
        }
        if let Some((block, _)) = self.free_text_at(index) {
            return Some(TextPosition { block, offset: 0 });
        }
        Some(self.insert_empty_text(index))
    }

    /// Start of the free text directly below the checklist region.
    ///
    /// An existing block there is reused with its id; an empty block is
    /// opened only when nothing follows the region. Returns `None` when there
    /// is no region.
    pub(crate) fn text_after_checklist(&mut self) -> Option<TextPosition> {
        let below = self.blocks.iter().position(Block::is_checklist)? + 1;
        if let Some((block, _)) = self.free_text_at(below) {
            return Some(TextPosition { block, offset: 0 });
        }
        Some(self.insert_empty_text(below))
    }

    fn free_text_at(&self, index: usize) -> Option<(BlockId, usize)> {
        match self.blocks.get(index)? {
            Block::FreeText { id, content } => Some((*id, content.chars().count())),
            Block::Checklist { .. } => None,
        }
    }

    fn insert_empty_text(&mut self, index: usize) -> TextPosition {
        let id = self.next_block_id();
        self.blocks.insert(
            index,
            Block::FreeText {
                id,
                content: String::new(),
            },
        );
        TextPosition {
            block: id,
            offset: 0,
        }
    }

    /// Merges adjacent free-text blocks and remaps `tracked` onto the result.
    fn coalesce(&mut self, mut tracked: TextPosition) -> TextPosition {
        let mut index = 0;
        while index + 1 < self.blocks.len() {
            let adjacent_text = matches!(
                (&self.blocks[index], &self.blocks[index + 1]),
                (Block::FreeText { .. }, Block::FreeText { .. })
            );
            if !adjacent_text {
                index += 1;
                continue;
            }
            if let Block::FreeText {
                id: merged_id,
                content: merged,
            } = self.blocks.remove(index + 1)
            {
                if let Block::FreeText {
                    id: keep_id,
                    content: keep,
                } = &mut self.blocks[index]
                {
                    if tracked.block == merged_id {
                        tracked = TextPosition {
                            block: *keep_id,
                            offset: keep.chars().count() + tracked.offset,
                        };
                    }
                    keep.push_str(&merged);
                }
            }
        }
        tracked
    }

    fn items_mut(&mut self) -> Option<&mut Vec<TodoItem>> {
        self.blocks.iter_mut().find_map(|block| match block {
            Block::Checklist { items, .. } => Some(items),
            Block::FreeText { .. } => None,
        })
    }

    fn next_block_id(&mut self) -> BlockId {
        let id = BlockId(self.next_block_id);
        self.next_block_id += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::{Block, Document, TextPosition};
    use crate::model::item::{ItemId, TodoItem};

    fn item(doc: &mut Document, text: &str) -> TodoItem {
        TodoItem::new(doc.allocate_item_id(), text, false)
    }

    #[test]
    fn new_document_has_one_empty_text_block() {
        let doc = Document::new();
        assert_eq!(doc.blocks().len(), 1);
        let id = doc.last_free_text().unwrap();
        assert_eq!(doc.free_text(id), Some(""));
        assert!(!doc.has_checklist());
        assert!(doc.items().is_empty());
    }

    #[test]
    fn checklist_is_created_once_after_anchor() {
        let mut doc = Document::new();
        let text = doc.last_free_text().unwrap();
        let first = doc.ensure_checklist_after(text);
        let second = doc.ensure_checklist_after(text);
        assert_eq!(first, second);
        assert_eq!(doc.blocks().len(), 2);
        assert!(doc.blocks()[1].is_checklist());
    }

    #[test]
    fn insert_after_places_item_directly_behind_anchor() {
        let mut doc = Document::new();
        let text = doc.last_free_text().unwrap();
        doc.ensure_checklist_after(text);
        let a = item(&mut doc, "a");
        let b = item(&mut doc, "b");
        let c = item(&mut doc, "c");
        let a_id = a.id.clone();
        doc.insert_item(a, None).unwrap();
        doc.insert_item(b, None).unwrap();
        assert_eq!(doc.insert_item(c, Some(&a_id)), Some(1));

        let texts: Vec<&str> = doc.items().iter().map(|i| i.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "c", "b"]);
    }

    #[test]
    fn closing_empty_region_coalesces_surrounding_text() {
        let mut doc = Document::new();
        let text = doc.last_free_text().unwrap();
        assert!(doc.set_free_text(text, "hello "));
        doc.ensure_checklist_after(text);
        let only = item(&mut doc, "");
        let only_id = only.id.clone();
        doc.insert_item(only, None).unwrap();
        doc.remove_item(&only_id).unwrap();

        let resume = doc.close_empty_checklist().unwrap();
        assert_eq!(
            resume,
            TextPosition {
                block: text,
                offset: 6
            }
        );
        assert_eq!(doc.blocks().len(), 1);
        assert_eq!(doc.free_text(text), Some("hello "));
    }

    #[test]
    fn closing_non_empty_region_is_refused() {
        let mut doc = Document::new();
        let text = doc.last_free_text().unwrap();
        doc.ensure_checklist_after(text);
        let kept = item(&mut doc, "kept");
        doc.insert_item(kept, None).unwrap();
        assert!(doc.close_empty_checklist().is_none());
        assert!(doc.has_checklist());
    }

    #[test]
    fn text_below_region_is_reused_with_its_id() {
        let mut doc = Document::new();
        let text = doc.last_free_text().unwrap();
        doc.ensure_checklist_after(text);
        let first = doc.text_after_checklist().unwrap();
        doc.set_free_text(first.block, "tail");

        let second = doc.text_after_checklist().unwrap();
        assert_eq!(second, first);
        assert_eq!(doc.blocks().len(), 3);
        assert_eq!(doc.free_text(second.block), Some("tail"));
    }

    #[test]
    fn closing_leading_region_keeps_following_block() {
        let mut doc = Document::new();
        let text = doc.last_free_text().unwrap();
        doc.set_free_text(text, "tail");
        doc.install_checklist(vec![TodoItem::new(ItemId::from("1"), "a", false)])
            .unwrap();
        doc.remove_item(&ItemId::from("1")).unwrap();

        let resume = doc.close_empty_checklist().unwrap();
        assert_eq!(
            resume,
            TextPosition {
                block: text,
                offset: 0
            }
        );
        assert_eq!(doc.blocks().len(), 1);
        assert_eq!(doc.free_text(text), Some("tail"));
    }

    #[test]
    fn adopted_duplicate_ids_are_replaced() {
        let mut doc = Document::new();
        let items = vec![
            TodoItem::new(ItemId::from("1"), "a", false),
            TodoItem::new(ItemId::from("1"), "b", true),
        ];
        doc.install_checklist(items).unwrap();

        let restored = doc.items();
        assert_eq!(restored[0].id, ItemId::from("1"));
        assert_ne!(restored[1].id, ItemId::from("1"));
        assert!(restored[1].checked);
        assert!(matches!(doc.blocks()[0], Block::Checklist { .. }));
    }

    #[test]
    fn removed_ids_are_never_reissued() {
        let mut doc = Document::new();
        let text = doc.last_free_text().unwrap();
        doc.ensure_checklist_after(text);
        let gone = item(&mut doc, "gone");
        let gone_id = gone.id.clone();
        doc.insert_item(gone, None).unwrap();
        doc.remove_item(&gone_id).unwrap();

        assert!(doc.has_issued(&gone_id));
        assert_ne!(doc.adopt_item_id(gone_id.clone()), gone_id);
    }
}
