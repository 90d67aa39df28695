//! Persisted layout of the todo list and theme preference.
//!
//! # Responsibility
//! - Map domain values to the string values stored under well-known keys.
//! - Tolerate missing or corrupt stored state at read time.
//!
//! # Invariants
//! - `todoList` always holds the whole collection as one JSON array.
//! - `theme` holds `"true"` (dark) or `"false"` (light); absence means no
//!   explicit user choice.

use crate::model::task::Task;
use crate::model::theme::ThemePreference;
use crate::repo::kv_store::{KeyValueStore, RepoResult};
use log::{error, warn};

/// Storage key of the serialized task array.
pub const TODO_LIST_KEY: &str = "todoList";
/// Storage key of the explicit theme choice.
pub const THEME_KEY: &str = "theme";

/// Reads the stored task array.
///
/// Missing, `null`, unreadable or unparseable state yields an empty list.
pub fn load_todo_list(kv: &impl KeyValueStore) -> Vec<Task> {
    let raw = match kv.get(TODO_LIST_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(err) => {
            error!(
                "event=todo_load module=repo status=error error_code=read_failed error={}",
                err
            );
            return Vec::new();
        }
    };

    match serde_json::from_str::<Option<Vec<Task>>>(&raw) {
        Ok(tasks) => tasks.unwrap_or_default(),
        Err(err) => {
            warn!(
                "event=todo_load module=repo status=degraded error_code=parse_failed bytes={} error={}",
                raw.len(),
                err
            );
            Vec::new()
        }
    }
}

/// Replaces the stored task array with `tasks`.
pub fn save_todo_list(kv: &impl KeyValueStore, tasks: &[Task]) -> RepoResult<()> {
    let encoded = serde_json::to_string(tasks)?;
    kv.set(TODO_LIST_KEY, &encoded)
}

/// Reads the explicit theme choice; unrecognized values count as absent.
pub fn load_theme_preference(kv: &impl KeyValueStore) -> RepoResult<ThemePreference> {
    let preference = match kv.get(THEME_KEY)?.as_deref().map(str::trim) {
        Some("true") => Some(true),
        Some("false") => Some(false),
        Some(other) => {
            warn!(
                "event=theme_load module=repo status=degraded error_code=parse_failed value_len={}",
                other.len()
            );
            None
        }
        None => None,
    };
    Ok(preference)
}

/// Stores an explicit theme choice.
pub fn save_theme_preference(kv: &impl KeyValueStore, is_dark: bool) -> RepoResult<()> {
    kv.set(THEME_KEY, if is_dark { "true" } else { "false" })
}

#[cfg(test)]
mod tests {
    use super::{
        load_theme_preference, load_todo_list, save_theme_preference, save_todo_list, THEME_KEY,
        TODO_LIST_KEY,
    };
    use crate::model::task::{Task, TaskId};
    use crate::repo::kv_store::{KeyValueStore, MemoryKvStore};

    #[test]
    fn todo_list_roundtrips_in_original_order() {
        let kv = MemoryKvStore::new();
        let tasks = vec![
            Task {
                id: TaskId::from("b"),
                text: "second".to_string(),
                completed: true,
            },
            Task {
                id: TaskId::from("a"),
                text: "first".to_string(),
                completed: false,
            },
        ];

        save_todo_list(&kv, &tasks).unwrap();
        assert_eq!(load_todo_list(&kv), tasks);
    }

    #[test]
    fn corrupt_or_null_todo_list_loads_empty() {
        let kv = MemoryKvStore::new();
        assert!(load_todo_list(&kv).is_empty());

        kv.set(TODO_LIST_KEY, "null").unwrap();
        assert!(load_todo_list(&kv).is_empty());

        kv.set(TODO_LIST_KEY, "[{\"id\":\"x\",\"text\":").unwrap();
        assert!(load_todo_list(&kv).is_empty());

        kv.set(TODO_LIST_KEY, "{\"id\":\"x\"}").unwrap();
        assert!(load_todo_list(&kv).is_empty());
    }

    #[test]
    fn theme_preference_parses_stringified_bool() {
        let kv = MemoryKvStore::new();
        assert_eq!(load_theme_preference(&kv).unwrap(), None);

        save_theme_preference(&kv, true).unwrap();
        assert_eq!(kv.get(THEME_KEY).unwrap().as_deref(), Some("true"));
        assert_eq!(load_theme_preference(&kv).unwrap(), Some(true));

        save_theme_preference(&kv, false).unwrap();
        assert_eq!(load_theme_preference(&kv).unwrap(), Some(false));

        kv.set(THEME_KEY, "dark").unwrap();
        assert_eq!(load_theme_preference(&kv).unwrap(), None);
    }
}
