use lazytodo_core::db::{open_db, open_db_in_memory};
use lazytodo_core::repo::todo_repo::TODO_LIST_KEY;
use lazytodo_core::{
    IdGenerator, KeyValueStore, SqliteKvStore, StoreError, Task, TaskId, TodoStore,
    UuidIdGenerator, ValidationError,
};
use std::collections::HashSet;

#[derive(Default)]
struct SeqIds(u32);

impl IdGenerator for SeqIds {
    fn generate_id(&mut self) -> TaskId {
        self.0 += 1;
        TaskId::new(format!("t{}", self.0))
    }
}

fn id_list(store: &TodoStore<SqliteKvStore<'_>, SeqIds>) -> Vec<String> {
    store
        .tasks()
        .iter()
        .map(|task| task.id.to_string())
        .collect()
}

fn stored_tasks(kv: &SqliteKvStore<'_>) -> Vec<Task> {
    let raw = kv.get(TODO_LIST_KEY).unwrap().unwrap();
    serde_json::from_str(&raw).unwrap()
}

#[test]
fn state_survives_reopening_the_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("todos.db");

    {
        let conn = open_db(&path).unwrap();
        let mut store = TodoStore::load(SqliteKvStore::new(&conn), UuidIdGenerator);
        let milk = store.add("Buy milk").unwrap();
        store.add("Walk dog").unwrap();
        store.toggle(&milk.id).unwrap();
    }

    let conn = open_db(&path).unwrap();
    let store = TodoStore::load(SqliteKvStore::new(&conn), UuidIdGenerator);
    let texts: Vec<(&str, bool)> = store
        .tasks()
        .iter()
        .map(|task| (task.text.as_str(), task.completed))
        .collect();
    assert_eq!(texts, vec![("Buy milk", true), ("Walk dog", false)]);
    assert_eq!(store.count_incomplete(), 1);
}

#[test]
fn every_mutation_leaves_a_complete_array_in_storage() {
    let conn = open_db_in_memory().unwrap();
    let kv = SqliteKvStore::new(&conn);
    let mut store = TodoStore::load(SqliteKvStore::new(&conn), SeqIds::default());

    let a = store.add("a").unwrap();
    assert_eq!(stored_tasks(&kv), store.tasks());
    let b = store.add("b").unwrap();
    store.add("c").unwrap();
    assert_eq!(stored_tasks(&kv), store.tasks());

    store.toggle(&b.id).unwrap();
    assert_eq!(stored_tasks(&kv), store.tasks());

    store.reorder(&[TaskId::from("t3"), a.id.clone(), b.id.clone()]).unwrap();
    assert_eq!(stored_tasks(&kv), store.tasks());

    store.remove(&a.id).unwrap();
    assert_eq!(stored_tasks(&kv), store.tasks());

    assert_eq!(store.clear_completed().unwrap(), 1);
    assert_eq!(stored_tasks(&kv), store.tasks());
    assert_eq!(id_list(&store), vec!["t3"]);
}

#[test]
fn remove_twice_is_a_silent_noop() {
    let conn = open_db_in_memory().unwrap();
    let mut store = TodoStore::load(SqliteKvStore::new(&conn), SeqIds::default());
    let task = store.add("once").unwrap();

    store.remove(&task.id).unwrap();
    store.remove(&task.id).unwrap();
    store.remove(&TaskId::from("never-existed")).unwrap();
    assert!(store.is_empty());
}

#[test]
fn clear_completed_reports_exact_count() {
    let conn = open_db_in_memory().unwrap();
    let mut store = TodoStore::load(SqliteKvStore::new(&conn), SeqIds::default());
    assert_eq!(store.clear_completed().unwrap(), 0);

    for text in ["a", "b", "c", "d"] {
        store.add(text).unwrap();
    }
    store.toggle(&TaskId::from("t1")).unwrap();
    store.toggle(&TaskId::from("t3")).unwrap();

    assert_eq!(store.clear_completed().unwrap(), 2);
    assert!(store.tasks().iter().all(|task| !task.completed));
    assert_eq!(id_list(&store), vec!["t2", "t4"]);
    assert_eq!(store.clear_completed().unwrap(), 0);
}

#[test]
fn reorder_permutes_without_touching_tasks() {
    let conn = open_db_in_memory().unwrap();
    let mut store = TodoStore::load(SqliteKvStore::new(&conn), SeqIds::default());
    for text in ["a", "b", "c"] {
        store.add(text).unwrap();
    }
    store.toggle(&TaskId::from("t2")).unwrap();
    let before: HashSet<(String, String, bool)> = store
        .tasks()
        .iter()
        .map(|t| (t.id.to_string(), t.text.clone(), t.completed))
        .collect();

    let order = [TaskId::from("t3"), TaskId::from("t1"), TaskId::from("t2")];
    store.reorder(&order).unwrap();

    assert_eq!(id_list(&store), vec!["t3", "t1", "t2"]);
    let after: HashSet<(String, String, bool)> = store
        .tasks()
        .iter()
        .map(|t| (t.id.to_string(), t.text.clone(), t.completed))
        .collect();
    assert_eq!(before, after);
}

#[test]
fn reorder_with_foreign_id_fails_and_keeps_order() {
    let conn = open_db_in_memory().unwrap();
    let kv = SqliteKvStore::new(&conn);
    let mut store = TodoStore::load(SqliteKvStore::new(&conn), SeqIds::default());
    store.add("a").unwrap();
    store.add("b").unwrap();
    let persisted_before = kv.get(TODO_LIST_KEY).unwrap();

    let err = store
        .reorder(&[TaskId::from("t2"), TaskId::from("intruder")])
        .unwrap_err();

    assert!(matches!(
        err,
        StoreError::Validation(ValidationError::SetMismatch)
    ));
    assert_eq!(id_list(&store), vec!["t1", "t2"]);
    assert_eq!(kv.get(TODO_LIST_KEY).unwrap(), persisted_before);
}

#[test]
fn corrupt_stored_list_starts_empty_and_is_overwritten_on_next_add() {
    let conn = open_db_in_memory().unwrap();
    let kv = SqliteKvStore::new(&conn);
    kv.set(TODO_LIST_KEY, "not json at all").unwrap();

    let mut store = TodoStore::load(SqliteKvStore::new(&conn), SeqIds::default());
    assert!(store.is_empty());

    store.add("fresh start").unwrap();
    assert_eq!(stored_tasks(&kv).len(), 1);
}

#[test]
fn legacy_string_ids_load_and_stay_addressable() {
    let conn = open_db_in_memory().unwrap();
    let kv = SqliteKvStore::new(&conn);
    kv.set(
        TODO_LIST_KEY,
        r#"[{"id":"V1StGXR8_Z5jdHi6B-myT","text":"legacy","completed":false}]"#,
    )
    .unwrap();

    let mut store = TodoStore::load(SqliteKvStore::new(&conn), SeqIds::default());
    let toggled = store.toggle(&TaskId::from("V1StGXR8_Z5jdHi6B-myT")).unwrap();
    assert!(toggled.completed);
    assert_eq!(store.count_incomplete(), 0);
}
