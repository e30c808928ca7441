//! Mutable editing state owned by one session.

use crate::model::document::{BlockId, Document, TextPosition};

/// Document plus the mode flags that decide how input is routed.
#[derive(Debug, Clone)]
pub struct EditorState {
    pub(crate) document: Document,
    pub(crate) list_active: bool,
    /// Free-text block that receives typing while list mode is inactive.
    pub(crate) active_text: BlockId,
    /// Caret position left behind in free text when the trigger fired.
    pub(crate) trigger_origin: Option<TextPosition>,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorState {
    pub fn new() -> Self {
        let (document, active_text) = Document::with_opening_text();
        Self {
            document,
            list_active: false,
            active_text,
            trigger_origin: None,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn list_active(&self) -> bool {
        self.list_active
    }

    pub fn active_text(&self) -> BlockId {
        self.active_text
    }
}
