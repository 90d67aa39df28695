//! Domain model for the todo list and its theme preference.
//!
//! # Responsibility
//! - Define the records shared by the store, the view layer and adapters.
//!
//! # Invariants
//! - Every task is identified by a `TaskId` unique within its list.
//! - `Task.completed` is the only source of truth for completion state.

pub mod task;
pub mod theme;
