//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical todo record persisted under the `todoList` key.
//! - Own the text normalization applied when a task is created.
//!
//! # Invariants
//! - `id` is stable and unique within one todo list for its lifetime.
//! - `text` is non-empty after trimming at creation; it is never re-validated.
//! - Wire shape is exactly `{ "id": string, "text": string, "completed": bool }`.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of one task.
///
/// Opaque string so ids written by older clients (non-UUID) still load.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Wraps an existing identifier string.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for TaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for TaskId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Source of fresh task identifiers.
pub trait IdGenerator {
    fn generate_id(&mut self) -> TaskId;
}

/// Random UUID v4 ids rendered in simple (32 hex chars) form.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn generate_id(&mut self) -> TaskId {
        TaskId(Uuid::new_v4().simple().to_string())
    }
}

/// One todo entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    pub completed: bool,
}

impl Task {
    /// Creates an incomplete task from raw user input.
    ///
    /// # Errors
    /// - Returns [`ValidationError::Empty`] when `raw_text` is blank after trimming.
    pub fn create(id: TaskId, raw_text: &str) -> Result<Self, ValidationError> {
        let text = normalize_task_text(raw_text).ok_or(ValidationError::Empty)?;
        Ok(Self {
            id,
            text,
            completed: false,
        })
    }

    /// Flips completion state.
    pub fn toggle(&mut self) {
        self.completed = !self.completed;
    }
}

/// Trims surrounding whitespace; `None` when nothing is left.
pub fn normalize_task_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Rejected user input or an impossible reorder request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Submitted text is blank after trimming.
    Empty,
    /// Reorder request is not a permutation of the current ids.
    SetMismatch,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "todo text cannot be empty"),
            Self::SetMismatch => write!(f, "reorder ids do not match the current todo list"),
        }
    }
}

impl Error for ValidationError {}

/// Operation referenced an id that is not in the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    NotFound(TaskId),
}

impl Display for LookupError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "todo not found: {id}"),
        }
    }
}

impl Error for LookupError {}

#[cfg(test)]
mod tests {
    use super::{normalize_task_text, IdGenerator, Task, TaskId, UuidIdGenerator, ValidationError};

    #[test]
    fn create_trims_text_and_starts_incomplete() {
        let task = Task::create(TaskId::from("a1"), "  Buy milk \n").unwrap();
        assert_eq!(task.text, "Buy milk");
        assert!(!task.completed);
    }

    #[test]
    fn create_rejects_blank_input() {
        assert_eq!(
            Task::create(TaskId::from("a1"), " \t ").unwrap_err(),
            ValidationError::Empty
        );
        assert_eq!(normalize_task_text(""), None);
    }

    #[test]
    fn uuid_generator_yields_distinct_simple_ids() {
        let mut ids = UuidIdGenerator;
        let first = ids.generate_id();
        let second = ids.generate_id();
        assert_ne!(first, second);
        assert_eq!(first.as_str().len(), 32);
    }

    #[test]
    fn task_uses_expected_wire_fields() {
        let task = Task {
            id: TaskId::from("V1StGXR8_Z5jdHi6B-myT"),
            text: "walk dog".to_string(),
            completed: true,
        };
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": "V1StGXR8_Z5jdHi6B-myT", "text": "walk dog", "completed": true})
        );
    }
}
