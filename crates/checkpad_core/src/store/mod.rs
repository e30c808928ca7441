//! Key-value storage boundary and checklist persistence.
//!
//! # Responsibility
//! - Define the opaque `get`/`set` capability the editor persists through.
//! - Provide in-memory and SQLite backends.
//! - Encode the checklist as one whole JSON value under a fixed key.
//!
//! # Invariants
//! - `set` overwrites the whole value; last write wins.
//! - Checklist load/save never surface store failures to editing code.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod checklist;
pub mod memory;
pub mod sqlite;

pub use checklist::ChecklistStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure reported by a key-value backend.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    /// Backend refused the operation (quota, read-only medium, ...).
    Unavailable(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Unavailable(message) => write!(f, "store unavailable: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Opaque string key-value capability provided by the host.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> StoreResult<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &mut S {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set(key, value)
    }
}
