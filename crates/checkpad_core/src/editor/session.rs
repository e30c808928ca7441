//! Editing session orchestrator.
//!
//! # Responsibility
//! - Route host input, key and checkbox events to trigger detection and
//!   list operations.
//! - After every mutation: schedule caret placement, persist items, bump the
//!   render revision.
//!
//! # Invariants
//! - The session exclusively owns its document; handlers run to completion
//!   one at a time.
//! - Blank items are never written to the store.
//! - Caret placement runs only through `flush_caret`, after the host has
//!   rendered the latest revision.

use crate::config::{ConfigError, EditorConfig, PreTriggerText};
use crate::editor::caret::{self, CaretSurface, CaretTarget, PendingCaret};
use crate::editor::format::{FormatCommand, FormattingHost};
use crate::editor::list::ListController;
use crate::editor::mutation::Mutation;
use crate::editor::state::EditorState;
use crate::editor::trigger::TriggerDetector;
use crate::model::document::{BlockId, Document, TextPosition};
use crate::model::item::{ItemId, TodoItem};
use crate::store::{ChecklistStore, KeyValueStore};
use crate::view::DocumentView;
use log::{debug, info, warn};

/// Editable field on the host surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    FreeText(BlockId),
    Item(ItemId),
}

/// Keys the session reacts to; everything else is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Escape,
    Other,
}

/// Result of handing one host event to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// Event consumed; the document is unchanged.
    Unchanged,
    /// Event consumed; re-render from `view()` then call `flush_caret`.
    Changed,
    /// The host should apply its default behaviour.
    PassThrough,
}

/// One editable surface bound to one checklist store.
pub struct EditingSession<S: KeyValueStore> {
    state: EditorState,
    config: EditorConfig,
    trigger: TriggerDetector,
    checklist: ChecklistStore<S>,
    pending_caret: PendingCaret,
    revision: u64,
}

impl<S: KeyValueStore> EditingSession<S> {
    /// Validates `config` and restores any saved checklist from `store`.
    ///
    /// Restored items appear above an empty free-text block; list mode
    /// starts inactive.
    pub fn open(store: S, config: EditorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let checklist = ChecklistStore::new(store, config.storage_key.clone());
        let mut state = EditorState::new();
        let restored = ListController::new(&mut state).restore(checklist.load());
        info!("event=session_open module=session status=ok restored={restored}");

        Ok(Self {
            state,
            trigger: TriggerDetector::new(config.trigger_token.clone()),
            config,
            checklist,
            pending_caret: PendingCaret::default(),
            revision: 0,
        })
    }

    pub fn document(&self) -> &Document {
        self.state.document()
    }

    pub fn list_active(&self) -> bool {
        self.state.list_active()
    }

    /// Free-text block that receives typing while list mode is off.
    pub fn active_text(&self) -> BlockId {
        self.state.active_text()
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Incremented once per applied event that changed the document.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn view(&self) -> DocumentView {
        DocumentView::project(self.state.document(), self.state.list_active(), self.revision)
    }

    pub fn pending_caret(&self) -> Option<&CaretTarget> {
        self.pending_caret.peek()
    }

    pub fn checklist_store(&self) -> &ChecklistStore<S> {
        &self.checklist
    }

    pub fn into_store(self) -> S {
        self.checklist.into_inner()
    }

    /// Content of `target` changed to `content`.
    pub fn on_input(&mut self, target: &Field, content: &str) -> EditOutcome {
        match target {
            Field::Item(id) => {
                let mutation = ListController::new(&mut self.state).edit_text(id, content);
                self.commit(mutation.into_iter().collect())
            }
            Field::FreeText(block) => self.on_free_text_input(*block, content),
        }
    }

    /// Key pressed while `focus` holds the caret.
    pub fn on_key_down(&mut self, key: Key, focus: &Field) -> EditOutcome {
        if !self.state.list_active() {
            return EditOutcome::PassThrough;
        }
        let mutation = match (key, focus) {
            (Key::Enter, Field::Item(id)) => ListController::new(&mut self.state).handle_enter(id),
            (Key::Escape, _) => ListController::new(&mut self.state).exit_list(),
            _ => return EditOutcome::PassThrough,
        };
        self.commit(mutation.into_iter().collect())
    }

    /// The checkbox of `id` now reports `new_checked`.
    ///
    /// Reports that already match the stored flag are ignored.
    pub fn on_checkbox_change(&mut self, id: &ItemId, new_checked: bool) -> EditOutcome {
        let Some(item) = self.state.document().item(id) else {
            warn!("event=checkbox_change module=session status=skipped reason=unknown_item");
            return EditOutcome::Unchanged;
        };
        if item.checked == new_checked {
            return EditOutcome::Unchanged;
        }
        let mutation = ListController::new(&mut self.state).toggle_checked(id);
        self.commit(mutation.into_iter().collect())
    }

    /// Forwards a toolbar command to the host unchanged.
    pub fn apply_format(&self, host: &mut dyn FormattingHost, command: FormatCommand) -> bool {
        let accepted = host.apply_text_style(command);
        debug!("event=format_apply module=session command={command} accepted={accepted}");
        accepted
    }

    /// Applies the scheduled caret target once the host finished rendering.
    pub fn flush_caret(&mut self, surface: &mut dyn CaretSurface) -> Option<CaretTarget> {
        self.pending_caret.flush(self.state.document(), surface)
    }

    fn on_free_text_input(&mut self, block: BlockId, content: &str) -> EditOutcome {
        if self.state.document().free_text(block).is_none() {
            warn!("event=free_text_input module=session status=skipped reason=unknown_block");
            return EditOutcome::Unchanged;
        }

        let list_active = self.state.list_active();
        if !list_active {
            self.state.active_text = block;
        }
        let Some(found) = self.trigger.detect(content, list_active) else {
            let mutation = self
                .state
                .document
                .set_free_text(block, content)
                .then_some(Mutation::FreeTextEdited { block });
            return self.commit(mutation.into_iter().collect());
        };

        let prefix = found.prefix(content);
        let (kept, seed) = match self.config.pre_trigger_text {
            PreTriggerText::KeepAsFreeText => (prefix, ""),
            PreTriggerText::SeedFirstItem => split_last_line(prefix),
        };
        let mut mutations = Vec::with_capacity(2);
        if self.state.document.set_free_text(block, kept) {
            mutations.push(Mutation::FreeTextEdited { block });
        }
        self.state.list_active = true;
        self.state.trigger_origin = Some(TextPosition {
            block,
            offset: kept.chars().count(),
        });
        let (_, inserted) = ListController::new(&mut self.state).insert_item(seed, false, None);
        mutations.push(inserted);
        info!(
            "event=list_enter module=session status=ok seeded={} items={}",
            !seed.is_empty(),
            self.state.document().items().len()
        );
        self.commit(mutations)
    }

    fn commit(&mut self, mutations: Vec<Mutation>) -> EditOutcome {
        if mutations.is_empty() {
            return EditOutcome::Unchanged;
        }

        let mut persist = false;
        for mutation in &mutations {
            if let Some(target) = caret::target_for(mutation, self.state.document()) {
                self.pending_caret.schedule(target);
            }
            persist |= mutation.changes_items();
            debug!(
                "event=mutation module=session kind={} revision={}",
                mutation.kind(),
                self.revision + 1
            );
        }
        if persist {
            let items = self.persistable_items();
            self.checklist.save(&items);
        }
        self.revision += 1;
        EditOutcome::Changed
    }

    fn persistable_items(&self) -> Vec<TodoItem> {
        self.state
            .document()
            .items()
            .iter()
            .filter(|item| !item.is_blank())
            .cloned()
            .collect()
    }
}

/// Splits `text` after its last line break: earlier lines stay free text,
/// the last line seeds the first item.
fn split_last_line(text: &str) -> (&str, &str) {
    match text.rfind('\n') {
        Some(index) => text.split_at(index + 1),
        None => ("", text),
    }
}

#[cfg(test)]
mod tests {
    use super::{split_last_line, EditOutcome, EditingSession, Field, Key};
    use crate::config::EditorConfig;
    use crate::editor::caret::CaretAnchor;
    use crate::store::{KeyValueStore, MemoryStore};

    fn session() -> EditingSession<MemoryStore> {
        EditingSession::open(MemoryStore::new(), EditorConfig::default()).unwrap()
    }

    #[test]
    fn plain_typing_accumulates_free_text() {
        let mut session = session();
        let text = Field::FreeText(session.active_text());
        assert_eq!(session.on_input(&text, "hello"), EditOutcome::Changed);
        assert_eq!(session.on_input(&text, "hello"), EditOutcome::Unchanged);
        assert!(!session.list_active());
        assert_eq!(session.document().free_text_content(), "hello");
        assert!(session.pending_caret().is_none());
    }

    #[test]
    fn trigger_schedules_caret_on_new_item() {
        let mut session = session();
        let text = Field::FreeText(session.active_text());
        session.on_input(&text, "[] ");

        let item = session.document().items()[0].id.clone();
        let pending = session.pending_caret().unwrap();
        assert_eq!(pending.anchor, CaretAnchor::Item(item));
        assert_eq!(pending.offset, 0);
    }

    #[test]
    fn keys_pass_through_while_list_inactive() {
        let mut session = session();
        let text = Field::FreeText(session.active_text());
        assert_eq!(
            session.on_key_down(Key::Enter, &text),
            EditOutcome::PassThrough
        );
        assert_eq!(
            session.on_key_down(Key::Escape, &text),
            EditOutcome::PassThrough
        );
    }

    #[test]
    fn empty_inserted_item_is_not_persisted() {
        let mut session = session();
        let text = Field::FreeText(session.active_text());
        session.on_input(&text, "[] ");

        let raw = session.checklist_store().store().get("todoItems").unwrap();
        assert_eq!(raw.as_deref(), Some("[]"));
    }

    #[test]
    fn stale_checkbox_report_is_ignored() {
        let mut session = session();
        let text = Field::FreeText(session.active_text());
        session.on_input(&text, "[] ");
        let id = session.document().items()[0].id.clone();

        assert_eq!(
            session.on_checkbox_change(&id, false),
            EditOutcome::Unchanged
        );
        assert_eq!(session.on_checkbox_change(&id, true), EditOutcome::Changed);
        assert!(session.document().items()[0].checked);
    }

    #[test]
    fn seed_takes_only_the_last_line() {
        assert_eq!(
            split_last_line("Notes\nBuy milk"),
            ("Notes\n", "Buy milk")
        );
        assert_eq!(split_last_line("Buy milk"), ("", "Buy milk"));
        assert_eq!(split_last_line("Notes\n"), ("Notes\n", ""));
    }

    #[test]
    fn revision_counts_changed_events_only() {
        let mut session = session();
        let text = Field::FreeText(session.active_text());
        session.on_input(&text, "a");
        session.on_input(&text, "a");
        session.on_key_down(Key::Other, &text);
        assert_eq!(session.revision(), 1);
        assert_eq!(session.view().revision, 1);
    }
}
