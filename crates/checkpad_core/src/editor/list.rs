//! Checklist item lifecycle.
//!
//! # Responsibility
//! - Insert, remove, edit and toggle checklist items.
//! - Apply the Enter-key policy that grows the list or leaves list mode.
//!
//! # Invariants
//! - New items always receive an id the document has never issued.
//! - Enter on a blank item removes it and ends list mode; Enter on any other
//!   item inserts directly below it.
//! - Leaving list mode resumes in the free text below the region (or around
//!   its former place when the region was emptied), opening a block only
//!   when none is there.
//! - Every call that does nothing returns `None`.

use crate::editor::mutation::Mutation;
use crate::editor::state::EditorState;
use crate::model::document::TextPosition;
use crate::model::item::{ItemId, TodoItem};
use log::debug;

/// Item operations over one borrowed editing state.
pub struct ListController<'s> {
    state: &'s mut EditorState,
}

impl<'s> ListController<'s> {
    pub fn new(state: &'s mut EditorState) -> Self {
        Self { state }
    }

    /// Creates an item and places it in the region.
    ///
    /// The region is created below the active free-text block when missing.
    /// With `after` pointing at an existing item the new item lands directly
    /// below it, otherwise at the end.
    pub fn insert_item(
        &mut self,
        initial_text: impl Into<String>,
        checked: bool,
        after: Option<&ItemId>,
    ) -> (TodoItem, Mutation) {
        let document = &mut self.state.document;
        document.ensure_checklist_after(self.state.active_text);
        let item = TodoItem::new(document.allocate_item_id(), initial_text, checked);
        // The region was ensured above, so insertion cannot miss.
        let index = document
            .insert_item(item.clone(), after)
            .unwrap_or_default();
        debug!(
            "event=item_insert module=list status=ok index={} count={}",
            index,
            document.items().len()
        );
        let mutation = Mutation::ItemInserted {
            item: item.id.clone(),
            index,
        };
        (item, mutation)
    }

    /// Deletes an item; an emptied region is replaced by free text.
    pub fn remove_item(&mut self, id: &ItemId) -> Option<Mutation> {
        let (removed, index) = self.state.document.remove_item(id)?;
        let region_closed = self
            .state
            .document
            .close_empty_checklist()
            .map(|resume| self.settle_resume(resume));
        if let Some(resume) = region_closed {
            self.leave_list_mode(resume);
        }
        debug!(
            "event=item_remove module=list status=ok index={} region_closed={}",
            index,
            region_closed.is_some()
        );
        Some(Mutation::ItemRemoved {
            item: removed.id,
            index,
            region_closed,
        })
    }

    /// Replaces the item text. The caret stays where the host put it.
    pub fn edit_text(&mut self, id: &ItemId, new_text: &str) -> Option<Mutation> {
        let item = self.state.document.item_mut(id)?;
        if item.text == new_text {
            return None;
        }
        item.text.clear();
        item.text.push_str(new_text);
        Some(Mutation::ItemTextEdited { item: id.clone() })
    }

    pub fn toggle_checked(&mut self, id: &ItemId) -> Option<Mutation> {
        let item = self.state.document.item_mut(id)?;
        item.checked = !item.checked;
        Some(Mutation::ItemCheckedToggled {
            item: id.clone(),
            checked: item.checked,
        })
    }

    /// Enter pressed while editing `focused`.
    ///
    /// Does nothing when list mode is inactive or the item is unknown.
    pub fn handle_enter(&mut self, focused: &ItemId) -> Option<Mutation> {
        if !self.state.list_active {
            return None;
        }
        let blank = self.state.document.item(focused)?.is_blank();
        if !blank {
            let (_, mutation) = self.insert_item(String::new(), false, Some(focused));
            return Some(mutation);
        }

        self.state.document.remove_item(focused)?;
        let resume_at = self.resume_below_region();
        self.leave_list_mode(resume_at);
        debug!("event=list_exit module=list status=ok trigger=enter");
        Some(Mutation::ListExited {
            removed: Some(focused.clone()),
            resume_at,
        })
    }

    /// Leaves list mode without Enter, dropping a trailing blank item.
    pub fn exit_list(&mut self) -> Option<Mutation> {
        if !self.state.list_active {
            return None;
        }
        let trailing_blank = self
            .state
            .document
            .items()
            .last()
            .filter(|item| item.is_blank())
            .map(|item| item.id.clone());
        if let Some(id) = &trailing_blank {
            self.state.document.remove_item(id);
        }
        let resume_at = self.resume_below_region();
        self.leave_list_mode(resume_at);
        debug!(
            "event=list_exit module=list status=ok trigger=escape pruned={}",
            trailing_blank.is_some()
        );
        Some(Mutation::ListExited {
            removed: trailing_blank,
            resume_at,
        })
    }

    /// Installs previously saved items as the region; list mode stays off.
    ///
    /// Returns the number of items installed.
    pub fn restore(&mut self, items: Vec<TodoItem>) -> usize {
        let count = items.len();
        match self.state.document.install_checklist(items) {
            Some(_) => count,
            None => 0,
        }
    }

    /// Start of free text directly below the region, or where it used to be.
    fn resume_below_region(&mut self) -> TextPosition {
        let document = &mut self.state.document;
        let resume = document
            .close_empty_checklist()
            .or_else(|| document.text_after_checklist());
        if let Some(resume) = resume {
            return self.settle_resume(resume);
        }
        let document = &self.state.document;
        let block = document.last_free_text().unwrap_or(self.state.active_text);
        TextPosition {
            block,
            offset: document.free_text(block).map_or(0, |text| text.chars().count()),
        }
    }

    /// Returns to where the trigger was typed when resuming in that block.
    fn settle_resume(&self, resume: TextPosition) -> TextPosition {
        match self.state.trigger_origin {
            Some(origin) if origin.block == resume.block => {
                let text_len = self
                    .state
                    .document
                    .free_text(origin.block)
                    .map_or(0, |text| text.chars().count());
                TextPosition {
                    block: origin.block,
                    offset: origin.offset.min(text_len),
                }
            }
            _ => resume,
        }
    }

    fn leave_list_mode(&mut self, resume_at: TextPosition) {
        self.state.list_active = false;
        self.state.active_text = resume_at.block;
        self.state.trigger_origin = None;
    }
}
