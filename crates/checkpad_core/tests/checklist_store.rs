use checkpad_core::db::open_db;
use checkpad_core::{ChecklistStore, ItemId, KeyValueStore, MemoryStore, SqliteStore, TodoItem};
use proptest::prelude::*;

fn arb_items() -> impl Strategy<Value = Vec<TodoItem>> {
    prop::collection::vec(("[a-z0-9-]{1,12}", ".{0,24}", any::<bool>()), 0..12).prop_map(
        |rows| {
            rows.into_iter()
                .enumerate()
                // Index suffix keeps ids unique within one generated list.
                .map(|(index, (id, text, checked))| {
                    TodoItem::new(ItemId::from(format!("{id}-{index}")), text, checked)
                })
                .collect()
        },
    )
}

proptest! {
    #[test]
    fn load_after_save_returns_same_items(items in arb_items()) {
        let mut checklist = ChecklistStore::new(MemoryStore::new(), "todoItems");
        checklist.save(&items);
        prop_assert_eq!(checklist.load(), items);
    }
}

#[test]
fn last_write_wins() {
    let mut checklist = ChecklistStore::new(MemoryStore::new(), "todoItems");
    checklist.save(&[TodoItem::new(ItemId::from("1"), "first", false)]);
    checklist.save(&[]);
    assert!(checklist.load().is_empty());
}

#[test]
fn other_keys_are_left_untouched() {
    let mut store = MemoryStore::new();
    store.set("theme", "dark").unwrap();

    let mut checklist = ChecklistStore::new(&mut store, "todoItems");
    checklist.save(&[TodoItem::new(ItemId::from("1"), "x", true)]);

    assert_eq!(store.get("theme").unwrap().as_deref(), Some("dark"));
}

#[test]
fn sqlite_backend_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("checkpad.db");
    let items = vec![
        TodoItem::new(ItemId::from("a"), "Buy milk", false),
        TodoItem::new(ItemId::from("b"), "<b>Eggs</b>", true),
    ];

    {
        let conn = open_db(&path).unwrap();
        let mut checklist = ChecklistStore::new(SqliteStore::new(&conn), "todoItems");
        checklist.save(&items);
    }

    let conn = open_db(&path).unwrap();
    let checklist = ChecklistStore::new(SqliteStore::new(&conn), "todoItems");
    assert_eq!(checklist.load(), items);
}
