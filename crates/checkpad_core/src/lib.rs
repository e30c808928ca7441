//! Core editing engine for Checkpad.
//! A single surface of free text that turns into a managed checklist when the
//! trigger token is typed, and back again on an empty Enter.

pub mod config;
pub mod db;
pub mod editor;
pub mod logging;
pub mod model;
pub mod store;
pub mod view;

pub use config::{ConfigError, EditorConfig, PreTriggerText};
pub use editor::caret::{CaretAnchor, CaretSurface, CaretTarget, CaretUnavailable};
pub use editor::format::{FormatCommand, FormattingHost};
pub use editor::list::ListController;
pub use editor::mutation::Mutation;
pub use editor::session::{EditOutcome, EditingSession, Field, Key};
pub use editor::trigger::{TriggerDetector, TriggerMatch};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::document::{Block, BlockId, Document, TextPosition};
pub use model::item::{ItemId, TodoItem};
pub use store::{
    ChecklistStore, KeyValueStore, MemoryStore, SqliteStore, StoreError, StoreResult,
};
pub use view::{BlockView, DocumentView, ItemView};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
