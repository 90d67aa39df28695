//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose one sync function per user interaction to Dart via FRB.
//! - Return the view patches the host applies to its widgets.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Calls are serialized: one interaction completes before the next starts.
//! - The active filter lives for the process and is never persisted.

use lazytodo_core::db::open_db;
use lazytodo_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    ConfigOverrides, CoreConfig, Filter, PatchRecorder, SqliteKvStore, StoreResult, TaskId,
    Theme, ThemeError, ThemeService, TodoStore, UuidIdGenerator, ViewFilter, ViewPatch, ViewSync,
};
use log::warn;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, OnceLock};

static TODO_DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static SESSION_FILTER: Mutex<Filter> = Mutex::new(Filter::All);

type TodoSession<'conn> = ViewSync<SqliteKvStore<'conn>, UuidIdGenerator, PatchRecorder>;

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// One renderer call, flattened for the host.
///
/// `kind` is one of `render_row|remove_row|set_row_completed|set_row_visible|
/// set_legend|mark_filter|show_validation_alert`; unused fields are `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoViewPatch {
    pub kind: String,
    pub task_id: Option<String>,
    /// Row text for `render_row`, legend text for `set_legend`.
    pub text: Option<String>,
    /// Completed, visible or selected flag depending on `kind`.
    pub flag: Option<bool>,
    pub filter: Option<String>,
}

/// Response envelope for todo interactions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoActionResponse {
    /// Whether the interaction was handled.
    pub ok: bool,
    /// Task created or touched by the interaction, when there is one.
    pub task_id: Option<String>,
    /// Incomplete tasks after the interaction.
    pub items_left: u32,
    /// Patches to apply, in order.
    pub patches: Vec<TodoViewPatch>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl TodoActionResponse {
    fn success(message: impl Into<String>, outcome: SessionOutcome) -> Self {
        Self {
            ok: true,
            task_id: outcome.task_id,
            items_left: outcome.items_left,
            patches: outcome.patches,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            task_id: None,
            items_left: 0,
            patches: Vec::new(),
            message: message.into(),
        }
    }
}

/// Response envelope for theme calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeResponse {
    pub ok: bool,
    /// `light|dark`, or `None` when nothing should change.
    pub theme: Option<String>,
    /// Toggle button icon (`sun|moon`) matching `theme`.
    pub icon: Option<String>,
    pub message: String,
}

impl ThemeResponse {
    fn apply(theme: Option<Theme>) -> Self {
        Self {
            ok: true,
            theme: theme.map(|value| value.as_str().to_string()),
            icon: theme.map(|value| value.icon().to_string()),
            message: String::new(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            theme: None,
            icon: None,
            message: message.into(),
        }
    }
}

/// Renders the persisted list at startup.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn todo_mount() -> TodoActionResponse {
    match with_session(|view| {
        view.mount();
        Ok(None)
    }) {
        Ok(outcome) => TodoActionResponse::success("Mounted.", outcome),
        Err(err) => TodoActionResponse::failure(format!("todo_mount failed: {err}")),
    }
}

/// Handles the add form.
///
/// Blank input is not an error: the response is `ok` and carries a
/// `show_validation_alert` patch without `task_id`.
#[flutter_rust_bridge::frb(sync)]
pub fn todo_submit(text: String) -> TodoActionResponse {
    match with_session(|view| {
        view.handle_submit(&text)
            .map(|task| task.map(|task| task.id))
    }) {
        Ok(outcome) if outcome.task_id.is_some() => {
            TodoActionResponse::success("Todo created.", outcome)
        }
        Ok(outcome) => TodoActionResponse::success("Please enter a todo.", outcome),
        Err(err) => TodoActionResponse::failure(format!("todo_submit failed: {err}")),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn todo_toggle(task_id: String) -> TodoActionResponse {
    let id = TaskId::from(task_id);
    match with_session(|view| view.handle_item_toggle(&id).map(|task| Some(task.id))) {
        Ok(outcome) => TodoActionResponse::success("Todo toggled.", outcome),
        Err(err) => TodoActionResponse::failure(format!("todo_toggle failed: {err}")),
    }
}

/// Deletes one todo; deleting an unknown id succeeds without changes.
#[flutter_rust_bridge::frb(sync)]
pub fn todo_delete(task_id: String) -> TodoActionResponse {
    let id = TaskId::from(task_id);
    match with_session(|view| view.handle_item_delete(&id).map(|()| Some(id.clone()))) {
        Ok(outcome) => TodoActionResponse::success("Todo deleted.", outcome),
        Err(err) => TodoActionResponse::failure(format!("todo_delete failed: {err}")),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn todo_clear_completed() -> TodoActionResponse {
    let mut removed = 0;
    match with_session(|view| {
        removed = view.handle_clear_completed()?;
        Ok(None)
    }) {
        Ok(outcome) => {
            TodoActionResponse::success(format!("Cleared {removed} completed todo(s)."), outcome)
        }
        Err(err) => TodoActionResponse::failure(format!("todo_clear_completed failed: {err}")),
    }
}

/// Switches the visibility filter (`all|active|completed`).
#[flutter_rust_bridge::frb(sync)]
pub fn todo_set_filter(filter: String) -> TodoActionResponse {
    let filter = match Filter::parse(&filter) {
        Ok(filter) => filter,
        Err(err) => return TodoActionResponse::failure(format!("todo_set_filter failed: {err}")),
    };
    match with_session(|view| {
        view.handle_filter_change(filter);
        Ok(None)
    }) {
        Ok(outcome) => TodoActionResponse::success(format!("Filter set to {filter}."), outcome),
        Err(err) => TodoActionResponse::failure(format!("todo_set_filter failed: {err}")),
    }
}

/// Persists the order produced by a drag-and-drop.
#[flutter_rust_bridge::frb(sync)]
pub fn todo_reorder(task_ids: Vec<String>) -> TodoActionResponse {
    let order: Vec<TaskId> = task_ids.into_iter().map(TaskId::from).collect();
    match with_session(|view| view.handle_reorder(&order).map(|()| None)) {
        Ok(outcome) => TodoActionResponse::success("Todos reordered.", outcome),
        Err(err) => TodoActionResponse::failure(format!("todo_reorder failed: {err}")),
    }
}

/// Theme to apply at startup given the OS color-scheme signal.
#[flutter_rust_bridge::frb(sync)]
pub fn theme_resolve(system_prefers_dark: bool) -> ThemeResponse {
    match with_theme_service(|themes| themes.resolve(system_prefers_dark).map(Some)) {
        Ok(theme) => ThemeResponse::apply(theme),
        Err(err) => ThemeResponse::failure(format!("theme_resolve failed: {err}")),
    }
}

/// Flips `current_theme` (`light|dark`) and stores it as the explicit choice.
#[flutter_rust_bridge::frb(sync)]
pub fn theme_toggle(current_theme: String) -> ThemeResponse {
    let current = match parse_theme(&current_theme) {
        Some(theme) => theme,
        None => {
            return ThemeResponse::failure(format!(
                "theme_toggle failed: unsupported theme `{current_theme}`; expected light|dark"
            ))
        }
    };
    match with_theme_service(|themes| themes.toggle(current).map(Some)) {
        Ok(theme) => ThemeResponse::apply(theme),
        Err(err) => ThemeResponse::failure(format!("theme_toggle failed: {err}")),
    }
}

/// OS color-scheme change; `theme` is `None` when a stored choice wins.
#[flutter_rust_bridge::frb(sync)]
pub fn theme_system_changed(prefers_dark: bool) -> ThemeResponse {
    match with_theme_service(|themes| themes.on_system_change(prefers_dark)) {
        Ok(theme) => ThemeResponse::apply(theme),
        Err(err) => ThemeResponse::failure(format!("theme_system_changed failed: {err}")),
    }
}

struct SessionOutcome {
    task_id: Option<String>,
    items_left: u32,
    patches: Vec<TodoViewPatch>,
}

fn resolve_todo_db_path() -> PathBuf {
    TODO_DB_PATH
        .get_or_init(|| CoreConfig::resolve(ConfigOverrides::default()).db_path)
        .clone()
}

fn lock_session() -> MutexGuard<'static, Filter> {
    SESSION_FILTER.lock().unwrap_or_else(|poisoned| {
        warn!("event=ffi_session module=ffi status=degraded error_code=lock_poisoned");
        poisoned.into_inner()
    })
}

fn with_session(
    f: impl FnOnce(&mut TodoSession<'_>) -> StoreResult<Option<TaskId>>,
) -> Result<SessionOutcome, String> {
    let mut filter = lock_session();
    let conn = open_db(resolve_todo_db_path()).map_err(|err| format!("todo DB open failed: {err}"))?;
    let mut view = ViewSync::new(
        TodoStore::load(SqliteKvStore::new(&conn), UuidIdGenerator),
        ViewFilter::with_filter(*filter),
        PatchRecorder::new(),
    );

    let task_id = f(&mut view).map_err(|err| err.to_string())?;
    *filter = view.filter();

    Ok(SessionOutcome {
        task_id: task_id.map(|id| id.to_string()),
        items_left: u32::try_from(view.store().count_incomplete()).unwrap_or(u32::MAX),
        patches: view
            .renderer_mut()
            .drain()
            .into_iter()
            .map(to_todo_view_patch)
            .collect(),
    })
}

fn with_theme_service(
    f: impl FnOnce(&ThemeService<SqliteKvStore<'_>>) -> Result<Option<Theme>, ThemeError>,
) -> Result<Option<Theme>, String> {
    let _guard = lock_session();
    let conn = open_db(resolve_todo_db_path()).map_err(|err| format!("todo DB open failed: {err}"))?;
    let themes = ThemeService::new(SqliteKvStore::new(&conn));
    f(&themes).map_err(|err| err.to_string())
}

fn parse_theme(value: &str) -> Option<Theme> {
    match value.trim().to_ascii_lowercase().as_str() {
        "light" => Some(Theme::Light),
        "dark" => Some(Theme::Dark),
        _ => None,
    }
}

fn to_todo_view_patch(patch: ViewPatch) -> TodoViewPatch {
    let blank = |kind: &str| TodoViewPatch {
        kind: kind.to_string(),
        task_id: None,
        text: None,
        flag: None,
        filter: None,
    };
    match patch {
        ViewPatch::RenderRow(task) => TodoViewPatch {
            task_id: Some(task.id.to_string()),
            text: Some(task.text),
            flag: Some(task.completed),
            ..blank("render_row")
        },
        ViewPatch::RemoveRow(id) => TodoViewPatch {
            task_id: Some(id.to_string()),
            ..blank("remove_row")
        },
        ViewPatch::SetRowCompleted { id, completed } => TodoViewPatch {
            task_id: Some(id.to_string()),
            flag: Some(completed),
            ..blank("set_row_completed")
        },
        ViewPatch::SetRowVisible { id, visible } => TodoViewPatch {
            task_id: Some(id.to_string()),
            flag: Some(visible),
            ..blank("set_row_visible")
        },
        ViewPatch::SetLegend(text) => TodoViewPatch {
            text: Some(text),
            ..blank("set_legend")
        },
        ViewPatch::MarkFilter { filter, selected } => TodoViewPatch {
            flag: Some(selected),
            filter: Some(filter.as_str().to_string()),
            ..blank("mark_filter")
        },
        ViewPatch::ShowValidationAlert => blank("show_validation_alert"),
    }
}
