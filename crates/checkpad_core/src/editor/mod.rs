//! Editing state machine.
//!
//! # Responsibility
//! - Turn host events into document mutations (`session`).
//! - Detect the checklist trigger (`trigger`) and run item operations
//!   (`list`).
//! - Decide and defer caret placement (`caret`).
//!
//! # Invariants
//! - Every mutation is applied synchronously inside the handler that
//!   received the event.

pub mod caret;
pub mod format;
pub mod list;
pub mod mutation;
pub mod session;
pub mod state;
pub mod trigger;
