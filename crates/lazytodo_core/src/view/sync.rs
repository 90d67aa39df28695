//! Reconciles the todo store and the active filter into render calls.
//!
//! # Responsibility
//! - Translate user intents into `TodoStore`/`ViewFilter` calls.
//! - Drive the `ViewRenderer` so rows mirror the store.
//!
//! # Invariants
//! - Row visibility and completed styling are pure functions of
//!   `(Task, Filter)` and are recomputed, never diffed.
//! - Exactly one filter control is marked active after any filter change.
//! - A rejected submission mutates nothing except showing the alert.

use crate::model::task::{IdGenerator, Task, TaskId, ValidationError};
use crate::repo::kv_store::KeyValueStore;
use crate::service::todo_store::{StoreError, StoreResult, TodoStore};
use crate::view::filter::{Filter, ViewFilter};
use log::debug;

/// View collaborator driven by [`ViewSync`].
pub trait ViewRenderer {
    /// Appends a row for `task` at the end of the list.
    fn render_row(&mut self, task: &Task);
    fn remove_row(&mut self, id: &TaskId);
    fn set_row_completed(&mut self, id: &TaskId, completed: bool);
    fn set_row_visible(&mut self, id: &TaskId, visible: bool);
    /// Replaces the "items left" legend text.
    fn set_legend(&mut self, text: &str);
    fn mark_filter(&mut self, filter: Filter, selected: bool);
    /// Prompts the user after a blank submission. Fire-and-forget.
    fn show_validation_alert(&mut self);
}

/// Legend text for `count` incomplete tasks.
pub fn items_left_label(count: usize) -> String {
    format!("{count} items left")
}

/// Command handlers for one application session.
pub struct ViewSync<S: KeyValueStore, G: IdGenerator, R: ViewRenderer> {
    store: TodoStore<S, G>,
    filter: ViewFilter,
    renderer: R,
}

impl<S: KeyValueStore, G: IdGenerator, R: ViewRenderer> ViewSync<S, G, R> {
    pub fn new(store: TodoStore<S, G>, filter: ViewFilter, renderer: R) -> Self {
        Self {
            store,
            filter,
            renderer,
        }
    }

    pub fn store(&self) -> &TodoStore<S, G> {
        &self.store
    }

    pub fn filter(&self) -> Filter {
        self.filter.current()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }

    /// Renders the loaded list, the filter controls and the legend.
    pub fn mount(&mut self) {
        for task in self.store.tasks() {
            self.renderer.render_row(task);
            self.renderer.set_row_visible(&task.id, self.filter.is_visible(task));
        }
        self.mark_filters();
        self.update_legend();
        debug!(
            "event=view_mount module=view status=ok rows={} filter={}",
            self.store.len(),
            self.filter.current()
        );
    }

    /// Handles the add form.
    ///
    /// Returns `Ok(None)` when the input was blank and the alert was shown.
    pub fn handle_submit(&mut self, raw_text: &str) -> StoreResult<Option<Task>> {
        let task = match self.store.add(raw_text) {
            Ok(task) => task,
            Err(StoreError::Validation(ValidationError::Empty)) => {
                self.renderer.show_validation_alert();
                return Ok(None);
            }
            Err(err) => return Err(err),
        };

        self.renderer.render_row(&task);
        self.renderer.set_row_visible(&task.id, self.filter.is_visible(&task));
        self.update_legend();
        Ok(Some(task))
    }

    pub fn handle_item_toggle(&mut self, id: &TaskId) -> StoreResult<Task> {
        let task = self.store.toggle(id)?;
        self.renderer.set_row_completed(&task.id, task.completed);
        self.renderer.set_row_visible(&task.id, self.filter.is_visible(&task));
        self.update_legend();
        Ok(task)
    }

    /// Deletes one row; an id with no row leaves the view untouched.
    pub fn handle_item_delete(&mut self, id: &TaskId) -> StoreResult<()> {
        if self.store.get(id).is_none() {
            return Ok(());
        }
        self.store.remove(id)?;
        self.renderer.remove_row(id);
        self.update_legend();
        Ok(())
    }

    /// Removes every completed row in one pass; returns the count removed.
    pub fn handle_clear_completed(&mut self) -> StoreResult<usize> {
        let completed: Vec<TaskId> = self
            .store
            .tasks()
            .iter()
            .filter(|task| task.completed)
            .map(|task| task.id.clone())
            .collect();

        let removed = self.store.clear_completed()?;
        for id in &completed {
            self.renderer.remove_row(id);
        }
        self.update_legend();
        Ok(removed)
    }

    pub fn handle_filter_change(&mut self, filter: Filter) {
        self.filter.set(filter);
        for task in self.store.tasks() {
            self.renderer.set_row_visible(&task.id, self.filter.is_visible(task));
        }
        self.mark_filters();
        debug!("event=view_filter module=view status=ok filter={filter}");
    }

    /// Persists an order the view already shows after a drag-and-drop.
    pub fn handle_reorder(&mut self, new_order: &[TaskId]) -> StoreResult<()> {
        self.store.reorder(new_order)
    }

    fn mark_filters(&mut self) {
        let current = self.filter.current();
        for filter in Filter::ALL_FILTERS {
            self.renderer.mark_filter(filter, filter == current);
        }
    }

    fn update_legend(&mut self) {
        let label = items_left_label(self.store.count_incomplete());
        self.renderer.set_legend(&label);
    }
}

#[cfg(test)]
mod tests {
    use super::items_left_label;

    #[test]
    fn legend_keeps_plain_wording() {
        assert_eq!(items_left_label(0), "0 items left");
        assert_eq!(items_left_label(1), "1 items left");
    }
}
