//! Retained-mode terminal view.
//!
//! Applies renderer calls to an in-memory row model and prints the visible
//! rows once the command has been handled.

use lazytodo_core::{
    Filter, IdGenerator, KeyValueStore, StoreResult, Task, TaskId, TodoStore, ViewFilter,
    ViewRenderer, ViewSync,
};
use std::io::{self, Write};

const ALERT_TEXT: &str = "Please enter a todo";

/// One list interaction requested on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TodoAction {
    Add(String),
    Toggle(TaskId),
    Remove(TaskId),
    ClearCompleted,
    List(Filter),
    Reorder(Vec<TaskId>),
}

/// Runs `action` against `store` and returns the view to print.
///
/// A reorder is stored before mounting so rows come out in the new order;
/// every other action runs on the mounted view.
pub fn apply_action<S: KeyValueStore, G: IdGenerator>(
    store: TodoStore<S, G>,
    action: TodoAction,
) -> StoreResult<TerminalView> {
    let mut view = ViewSync::new(store, ViewFilter::new(), TerminalView::new());
    if let TodoAction::Reorder(order) = &action {
        view.handle_reorder(order)?;
    }
    view.mount();

    match action {
        TodoAction::Add(text) => {
            view.handle_submit(&text)?;
        }
        TodoAction::Toggle(id) => {
            view.handle_item_toggle(&id)?;
        }
        TodoAction::Remove(id) => view.handle_item_delete(&id)?,
        TodoAction::ClearCompleted => {
            view.handle_clear_completed()?;
        }
        TodoAction::List(filter) => view.handle_filter_change(filter),
        TodoAction::Reorder(_) => {}
    }
    Ok(view.into_renderer())
}

struct Row {
    task: Task,
    visible: bool,
}

#[derive(Default)]
pub struct TerminalView {
    rows: Vec<Row>,
    legend: String,
    selected: Option<Filter>,
    alert: bool,
}

impl TerminalView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alert_shown(&self) -> bool {
        self.alert
    }

    pub fn print(&self, out: &mut impl Write) -> io::Result<()> {
        for row in self.rows.iter().filter(|row| row.visible) {
            let mark = if row.task.completed { 'x' } else { ' ' };
            writeln!(out, "[{mark}] {}  {}", row.task.id, row.task.text)?;
        }
        let filter = self.selected.unwrap_or_default();
        writeln!(out, "-- {} ({filter})", self.legend)?;
        Ok(())
    }

    fn row_mut(&mut self, id: &TaskId) -> Option<&mut Row> {
        self.rows.iter_mut().find(|row| &row.task.id == id)
    }
}

impl ViewRenderer for TerminalView {
    fn render_row(&mut self, task: &Task) {
        self.rows.push(Row {
            task: task.clone(),
            visible: true,
        });
    }

    fn remove_row(&mut self, id: &TaskId) {
        self.rows.retain(|row| &row.task.id != id);
    }

    fn set_row_completed(&mut self, id: &TaskId, completed: bool) {
        if let Some(row) = self.row_mut(id) {
            row.task.completed = completed;
        }
    }

    fn set_row_visible(&mut self, id: &TaskId, visible: bool) {
        if let Some(row) = self.row_mut(id) {
            row.visible = visible;
        }
    }

    fn set_legend(&mut self, text: &str) {
        self.legend = text.to_string();
    }

    fn mark_filter(&mut self, filter: Filter, selected: bool) {
        if selected {
            self.selected = Some(filter);
        }
    }

    fn show_validation_alert(&mut self) {
        self.alert = true;
        eprintln!("{ALERT_TEXT}");
    }
}

#[cfg(test)]
mod tests {
    use super::{apply_action, TerminalView, TodoAction};
    use lazytodo_core::{
        Filter, IdGenerator, MemoryKvStore, StoreResult, Task, TaskId, TodoStore, ViewRenderer,
    };

    #[derive(Default)]
    struct SeqIds(u32);

    impl IdGenerator for SeqIds {
        fn generate_id(&mut self) -> TaskId {
            self.0 += 1;
            TaskId::new(format!("t{}", self.0))
        }
    }

    fn task(id: &str, text: &str) -> Task {
        Task {
            id: TaskId::from(id),
            text: text.to_string(),
            completed: false,
        }
    }

    fn printed(view: &TerminalView) -> String {
        let mut out = Vec::new();
        view.print(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    /// Loads the store afresh for every call, as one process invocation does.
    fn run(kv: &MemoryKvStore, action: TodoAction) -> StoreResult<TerminalView> {
        apply_action(TodoStore::load(kv, SeqIds::default()), action)
    }

    #[test]
    fn prints_only_visible_rows_with_legend() {
        let mut view = TerminalView::new();
        view.render_row(&task("a", "milk"));
        view.render_row(&task("b", "dog"));
        view.set_row_completed(&TaskId::from("b"), true);
        view.set_row_visible(&TaskId::from("a"), false);
        view.set_legend("0 items left");
        view.mark_filter(Filter::All, false);
        view.mark_filter(Filter::Completed, true);

        assert_eq!(printed(&view), "[x] b  dog\n-- 0 items left (completed)\n");
    }

    #[test]
    fn removed_rows_disappear() {
        let mut view = TerminalView::new();
        view.render_row(&task("a", "milk"));
        view.remove_row(&TaskId::from("a"));
        view.set_legend("0 items left");

        assert_eq!(printed(&view), "-- 0 items left (all)\n");
    }

    #[test]
    fn reorder_prints_rows_in_the_new_order() {
        let kv = MemoryKvStore::new();
        run(&kv, TodoAction::Add("one".to_string())).unwrap();
        run(&kv, TodoAction::Add("two".to_string())).unwrap();

        let order = vec![TaskId::from("t2"), TaskId::from("t1")];
        let view = run(&kv, TodoAction::Reorder(order)).unwrap();

        assert_eq!(printed(&view), "[ ] t2  two\n[ ] t1  one\n-- 2 items left (all)\n");
    }

    #[test]
    fn rejected_reorder_prints_nothing_and_keeps_order() {
        let kv = MemoryKvStore::new();
        run(&kv, TodoAction::Add("one".to_string())).unwrap();

        let order = vec![TaskId::from("intruder")];
        assert!(run(&kv, TodoAction::Reorder(order)).is_err());

        let view = run(&kv, TodoAction::List(Filter::All)).unwrap();
        assert_eq!(printed(&view), "[ ] t1  one\n-- 1 items left (all)\n");
    }

    #[test]
    fn list_with_filter_hides_other_rows() {
        let kv = MemoryKvStore::new();
        run(&kv, TodoAction::Add("open".to_string())).unwrap();
        run(&kv, TodoAction::Add("done".to_string())).unwrap();
        run(&kv, TodoAction::Toggle(TaskId::from("t2"))).unwrap();

        let view = run(&kv, TodoAction::List(Filter::Completed)).unwrap();
        assert_eq!(printed(&view), "[x] t2  done\n-- 1 items left (completed)\n");
    }

    #[test]
    fn blank_add_raises_the_alert() {
        let kv = MemoryKvStore::new();
        let view = run(&kv, TodoAction::Add("   ".to_string())).unwrap();
        assert!(view.alert_shown());
        assert_eq!(printed(&view), "-- 0 items left (all)\n");
    }
}
