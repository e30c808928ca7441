//! Caret placement after structural mutations.
//!
//! # Responsibility
//! - Map a mutation and the resulting document to a caret target.
//! - Hold at most one target until the host has rendered the nodes it
//!   refers to, then apply it through `CaretSurface`.
//!
//! # Invariants
//! - Text edits and checkbox toggles never move the caret.
//! - A scheduled target is replaced by any newer one and is re-validated
//!   against the latest document before it is applied.
//! - An unavailable host selection skips placement; the mutation stands.

use crate::editor::mutation::Mutation;
use crate::model::document::{BlockId, Document};
use crate::model::item::ItemId;
use log::debug;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Field that should receive the caret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaretAnchor {
    /// Text input of one checklist item.
    Item(ItemId),
    /// A free-text block.
    Block(BlockId),
}

/// Caret location requested after a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaretTarget {
    pub anchor: CaretAnchor,
    /// Unicode scalar offset inside the anchor's text.
    pub offset: usize,
}

impl CaretTarget {
    pub fn item(id: ItemId, offset: usize) -> Self {
        Self {
            anchor: CaretAnchor::Item(id),
            offset,
        }
    }

    pub fn block(id: BlockId, offset: usize) -> Self {
        Self {
            anchor: CaretAnchor::Block(id),
            offset,
        }
    }
}

/// Computes where the caret belongs after `mutation`.
///
/// Returns `None` when the caret stays with the user's current field or when
/// the target is no longer part of `document`.
pub fn target_for(mutation: &Mutation, document: &Document) -> Option<CaretTarget> {
    let target = match mutation {
        // Empty new items put the caret at 0; a seeded item puts it after the seed.
        Mutation::ItemInserted { item, .. } => {
            CaretTarget::item(item.clone(), document.item(item)?.text.chars().count())
        }
        Mutation::ItemRemoved {
            region_closed: Some(resume),
            ..
        }
        | Mutation::ListExited {
            resume_at: resume, ..
        } => CaretTarget::block(resume.block, resume.offset),
        Mutation::ItemRemoved {
            region_closed: None,
            ..
        }
        | Mutation::ItemTextEdited { .. }
        | Mutation::ItemCheckedToggled { .. }
        | Mutation::FreeTextEdited { .. } => return None,
    };
    resolve(target, document)
}

/// Clamps `target` to the current document, or drops it when its anchor is gone.
fn resolve(target: CaretTarget, document: &Document) -> Option<CaretTarget> {
    let text_len = match &target.anchor {
        CaretAnchor::Item(id) => document.item(id)?.text.chars().count(),
        CaretAnchor::Block(id) => document.free_text(*id)?.chars().count(),
    };
    Some(CaretTarget {
        offset: target.offset.min(text_len),
        ..target
    })
}

/// Host selection could not be driven.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaretUnavailable {
    pub reason: String,
}

impl CaretUnavailable {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl Display for CaretUnavailable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "caret unavailable: {}", self.reason)
    }
}

impl Error for CaretUnavailable {}

/// Boundary adapter over the host's selection API.
pub trait CaretSurface {
    fn place_caret(&mut self, target: &CaretTarget) -> Result<(), CaretUnavailable>;
}

/// Caret request waiting for the next completed render.
#[derive(Debug, Clone, Default)]
pub struct PendingCaret {
    target: Option<CaretTarget>,
}

impl PendingCaret {
    /// Replaces any previously scheduled target.
    pub fn schedule(&mut self, target: CaretTarget) {
        self.target = Some(target);
    }

    pub fn peek(&self) -> Option<&CaretTarget> {
        self.target.as_ref()
    }

    pub fn is_pending(&self) -> bool {
        self.target.is_some()
    }

    /// Applies the scheduled target against `document` and clears the slot.
    ///
    /// Returns the target actually applied. Anchors that disappeared and
    /// surface failures yield `None`.
    pub fn flush(
        &mut self,
        document: &Document,
        surface: &mut dyn CaretSurface,
    ) -> Option<CaretTarget> {
        let target = resolve(self.target.take()?, document)?;
        match surface.place_caret(&target) {
            Ok(()) => Some(target),
            Err(err) => {
                debug!("event=caret_apply module=caret status=skipped reason={err}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{target_for, CaretAnchor, CaretSurface, CaretTarget, CaretUnavailable, PendingCaret};
    use crate::editor::mutation::Mutation;
    use crate::model::document::{Document, TextPosition};
    use crate::model::item::{ItemId, TodoItem};

    #[derive(Default)]
    struct RecordingSurface {
        placed: Vec<CaretTarget>,
        unavailable: bool,
    }

    impl CaretSurface for RecordingSurface {
        fn place_caret(&mut self, target: &CaretTarget) -> Result<(), CaretUnavailable> {
            if self.unavailable {
                return Err(CaretUnavailable::new("no selection"));
            }
            self.placed.push(target.clone());
            Ok(())
        }
    }

    fn document_with_item(text: &str) -> (Document, ItemId) {
        let mut doc = Document::new();
        let anchor = doc.last_free_text().unwrap();
        doc.ensure_checklist_after(anchor);
        let id = doc.allocate_item_id();
        doc.insert_item(TodoItem::new(id.clone(), text, false), None)
            .unwrap();
        (doc, id)
    }

    #[test]
    fn inserted_item_gets_caret_at_start() {
        let (doc, id) = document_with_item("");
        let target = target_for(
            &Mutation::ItemInserted {
                item: id.clone(),
                index: 0,
            },
            &doc,
        )
        .unwrap();
        assert_eq!(target, CaretTarget::item(id, 0));
    }

    #[test]
    fn edits_and_toggles_leave_caret_alone() {
        let (doc, id) = document_with_item("x");
        assert!(target_for(&Mutation::ItemTextEdited { item: id.clone() }, &doc).is_none());
        assert!(target_for(
            &Mutation::ItemCheckedToggled {
                item: id,
                checked: true
            },
            &doc
        )
        .is_none());
    }

    #[test]
    fn list_exit_targets_resume_position() {
        let (mut doc, _) = document_with_item("x");
        let resume = doc.text_after_checklist().unwrap();
        let target = target_for(
            &Mutation::ListExited {
                removed: None,
                resume_at: resume,
            },
            &doc,
        )
        .unwrap();
        assert_eq!(target.anchor, CaretAnchor::Block(resume.block));
        assert_eq!(target.offset, 0);
    }

    #[test]
    fn vanished_anchor_yields_no_target() {
        let (mut doc, id) = document_with_item("");
        doc.remove_item(&id).unwrap();
        assert!(target_for(&Mutation::ItemInserted { item: id, index: 0 }, &doc).is_none());

        let stale = TextPosition {
            block: doc.checklist_id().unwrap(),
            offset: 0,
        };
        assert!(target_for(
            &Mutation::ListExited {
                removed: None,
                resume_at: stale
            },
            &doc
        )
        .is_none());
    }

    #[test]
    fn pending_caret_applies_latest_target_once() {
        let (doc, id) = document_with_item("");
        let text = doc.last_free_text().unwrap();
        let mut pending = PendingCaret::default();
        let mut surface = RecordingSurface::default();

        pending.schedule(CaretTarget::block(text, 40));
        pending.schedule(CaretTarget::item(id.clone(), 0));
        let applied = pending.flush(&doc, &mut surface).unwrap();

        assert_eq!(applied, CaretTarget::item(id, 0));
        assert_eq!(surface.placed.len(), 1);
        assert!(!pending.is_pending());
        assert!(pending.flush(&doc, &mut surface).is_none());
    }

    #[test]
    fn pending_caret_clamps_offset_to_current_text() {
        let (doc, _) = document_with_item("");
        let text = doc.last_free_text().unwrap();
        let mut pending = PendingCaret::default();
        let mut surface = RecordingSurface::default();

        pending.schedule(CaretTarget::block(text, 99));
        let applied = pending.flush(&doc, &mut surface).unwrap();
        assert_eq!(applied.offset, 0);
    }

    #[test]
    fn unavailable_surface_is_a_no_op() {
        let (doc, id) = document_with_item("");
        let mut pending = PendingCaret::default();
        let mut surface = RecordingSurface {
            unavailable: true,
            ..RecordingSurface::default()
        };

        pending.schedule(CaretTarget::item(id, 0));
        assert!(pending.flush(&doc, &mut surface).is_none());
        assert!(!pending.is_pending());
    }
}
