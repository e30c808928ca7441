//! Editor domain model.
//!
//! # Responsibility
//! - Define the document block sequence and checklist item records.
//!
//! # Invariants
//! - A document holds at most one checklist region.
//! - Item ids are stable and never reused within a document lifetime.

pub mod document;
pub mod item;
