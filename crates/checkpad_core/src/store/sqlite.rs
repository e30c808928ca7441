//! SQLite-backed key-value store.
//!
//! # Invariants
//! - Connections must come from `db::open_db*` so `kv_entries` exists.
//! - `set` is a single upsert statement, so each write replaces the value
//!   atomically.

use super::{KeyValueStore, StoreResult};
use rusqlite::{params, Connection, OptionalExtension};

/// Key-value store over the `kv_entries` table.
pub struct SqliteStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl KeyValueStore for SqliteStore<'_> {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        // Failures are reported once, by the caller that owns the write.
        self.conn.execute(
            "INSERT INTO kv_entries (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }
}
