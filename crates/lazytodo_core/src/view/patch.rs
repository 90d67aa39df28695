//! Recorded view updates for hosts that apply rendering themselves.
//!
//! A [`PatchRecorder`] turns each `ViewRenderer` call into one [`ViewPatch`],
//! in call order, so a UI host can replay them against its own widgets.

use crate::model::task::{Task, TaskId};
use crate::view::filter::Filter;
use crate::view::sync::ViewRenderer;

/// One renderer call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewPatch {
    RenderRow(Task),
    RemoveRow(TaskId),
    SetRowCompleted { id: TaskId, completed: bool },
    SetRowVisible { id: TaskId, visible: bool },
    SetLegend(String),
    MarkFilter { filter: Filter, selected: bool },
    ShowValidationAlert,
}

#[derive(Debug, Default)]
pub struct PatchRecorder {
    patches: Vec<ViewPatch>,
}

impl PatchRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn patches(&self) -> &[ViewPatch] {
        &self.patches
    }

    /// Hands over everything recorded so far and starts a fresh batch.
    pub fn drain(&mut self) -> Vec<ViewPatch> {
        std::mem::take(&mut self.patches)
    }
}

impl ViewRenderer for PatchRecorder {
    fn render_row(&mut self, task: &Task) {
        self.patches.push(ViewPatch::RenderRow(task.clone()));
    }

    fn remove_row(&mut self, id: &TaskId) {
        self.patches.push(ViewPatch::RemoveRow(id.clone()));
    }

    fn set_row_completed(&mut self, id: &TaskId, completed: bool) {
        self.patches.push(ViewPatch::SetRowCompleted {
            id: id.clone(),
            completed,
        });
    }

    fn set_row_visible(&mut self, id: &TaskId, visible: bool) {
        self.patches.push(ViewPatch::SetRowVisible {
            id: id.clone(),
            visible,
        });
    }

    fn set_legend(&mut self, text: &str) {
        self.patches.push(ViewPatch::SetLegend(text.to_string()));
    }

    fn mark_filter(&mut self, filter: Filter, selected: bool) {
        self.patches.push(ViewPatch::MarkFilter { filter, selected });
    }

    fn show_validation_alert(&mut self) {
        self.patches.push(ViewPatch::ShowValidationAlert);
    }
}
