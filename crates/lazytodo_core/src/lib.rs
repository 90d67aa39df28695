//! Core domain logic for LazyTodo.
//! This crate is the single source of truth for todo-list invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod view;

pub use config::{ConfigOverrides, CoreConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::task::{IdGenerator, LookupError, Task, TaskId, UuidIdGenerator, ValidationError};
pub use model::theme::{Theme, ThemePreference};
pub use repo::kv_store::{KeyValueStore, MemoryKvStore, RepoError, RepoResult, SqliteKvStore};
pub use service::theme_service::{ThemeError, ThemeService};
pub use service::todo_store::{StoreError, StoreResult, TodoStore};
pub use view::filter::{Filter, FilterParseError, ViewFilter};
pub use view::patch::{PatchRecorder, ViewPatch};
pub use view::sync::{items_left_label, ViewRenderer, ViewSync};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
