use checkpad_core::db::migrations::latest_version;
use checkpad_core::db::{open_db, open_db_in_memory, DbError};
use checkpad_core::{KeyValueStore, SqliteStore};
use rusqlite::Connection;

fn user_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn has_kv_table(conn: &Connection) -> bool {
    conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'kv_entries';",
        [],
        |row| row.get::<_, i64>(0),
    )
    .unwrap()
        == 1
}

#[test]
fn fresh_connection_is_stamped_with_latest_schema() {
    let conn = open_db_in_memory().unwrap();
    assert_eq!(user_version(&conn), latest_version());
    assert!(has_kv_table(&conn));
}

#[test]
fn reopening_keeps_entries_and_skips_migration() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("checkpad.db");

    {
        let conn = open_db(&path).unwrap();
        SqliteStore::new(&conn).set("todoItems", "[]").unwrap();
    }

    let conn = open_db(&path).unwrap();
    assert_eq!(user_version(&conn), latest_version());
    assert_eq!(
        SqliteStore::new(&conn).get("todoItems").unwrap().as_deref(),
        Some("[]")
    );
}

#[test]
fn unversioned_file_with_foreign_tables_is_migrated_in_place() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shared.db");
    {
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE host_prefs (name TEXT);
             INSERT INTO host_prefs VALUES ('dark');",
        )
        .unwrap();
    }

    let conn = open_db(&path).unwrap();
    assert!(has_kv_table(&conn));
    let prefs: i64 = conn
        .query_row("SELECT COUNT(*) FROM host_prefs;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(prefs, 1);
}

#[test]
fn newer_schema_is_rejected_and_left_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");
    {
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch("PRAGMA user_version = 42;").unwrap();
    }

    let err = open_db(&path).unwrap_err();
    assert!(matches!(
        err,
        DbError::SchemaTooNew { found: 42, supported } if supported == latest_version()
    ));
    assert!(err.to_string().contains("v42"));

    let conn = Connection::open(&path).unwrap();
    assert_eq!(user_version(&conn), 42);
    assert!(!has_kv_table(&conn));
}
