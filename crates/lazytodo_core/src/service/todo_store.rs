//! Authoritative todo collection and its persistence boundary.
//!
//! # Responsibility
//! - Own the ordered task list for one application session.
//! - Persist the whole list after every mutation, before returning.
//!
//! # Invariants
//! - No two tasks share an id.
//! - The in-memory list changes only after the persisted write succeeded, so
//!   memory and storage never diverge.
//! - Operations that change nothing do not write.

use crate::model::task::{
    normalize_task_text, IdGenerator, LookupError, Task, TaskId, ValidationError,
};
use crate::repo::kv_store::{KeyValueStore, RepoError};
use crate::repo::todo_repo::{load_todo_list, save_todo_list};
use log::{debug, error, info, warn};
use std::collections::{HashMap, HashSet};
use std::error::Error;
use std::fmt::{Display, Formatter};

const MAX_ID_ATTEMPTS: usize = 8;

pub type StoreResult<T> = Result<T, StoreError>;

/// Error returned by store and view-sync operations.
#[derive(Debug)]
pub enum StoreError {
    /// Input rejected before any mutation.
    Validation(ValidationError),
    /// Referenced task does not exist.
    Lookup(LookupError),
    /// Id generator kept producing ids already in use.
    DuplicateId(TaskId),
    /// Persisted write failed; in-memory state is unchanged.
    Repo(RepoError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Lookup(err) => write!(f, "{err}"),
            Self::DuplicateId(id) => write!(f, "generated todo id already in use: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Lookup(err) => Some(err),
            Self::DuplicateId(_) => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<ValidationError> for StoreError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<LookupError> for StoreError {
    fn from(value: LookupError) -> Self {
        Self::Lookup(value)
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Ordered todo list bound to a key-value store and an id source.
pub struct TodoStore<S: KeyValueStore, G: IdGenerator> {
    kv: S,
    ids: G,
    tasks: Vec<Task>,
}

impl<S: KeyValueStore, G: IdGenerator> TodoStore<S, G> {
    /// Loads the persisted list; corrupt or missing state starts empty.
    ///
    /// Tasks repeating an earlier id are dropped so the uniqueness invariant
    /// holds from the first operation on.
    pub fn load(kv: S, ids: G) -> Self {
        let loaded = load_todo_list(&kv);
        let loaded_count = loaded.len();
        let tasks = dedupe_by_id(loaded);
        if tasks.len() != loaded_count {
            warn!(
                "event=todo_load module=store status=degraded error_code=duplicate_ids dropped={}",
                loaded_count - tasks.len()
            );
        }
        info!(
            "event=todo_load module=store status=ok count={} incomplete={}",
            tasks.len(),
            count_incomplete_in(&tasks)
        );
        Self { kv, ids, tasks }
    }

    /// Current tasks in display order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| &task.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Appends a new incomplete task built from `raw_text`.
    ///
    /// # Errors
    /// - `ValidationError::Empty` for blank input; nothing is mutated or written.
    /// - `StoreError::DuplicateId` when the generator cannot produce a free id.
    /// - `StoreError::Repo` when the write fails.
    pub fn add(&mut self, raw_text: &str) -> StoreResult<Task> {
        let Some(text) = normalize_task_text(raw_text) else {
            debug!("event=todo_add module=store status=rejected error_code=empty_text");
            return Err(ValidationError::Empty.into());
        };
        let task = Task {
            id: self.fresh_id()?,
            text,
            completed: false,
        };

        let mut next = self.tasks.clone();
        next.push(task.clone());
        self.commit(next)?;

        info!(
            "event=todo_add module=store status=ok task_id={} count={}",
            task.id,
            self.tasks.len()
        );
        Ok(task)
    }

    /// Flips completion of one task and returns its new state.
    ///
    /// # Errors
    /// - `LookupError::NotFound` when no task has `id`; ids come from the
    ///   rendered view, so this indicates a caller bug.
    pub fn toggle(&mut self, id: &TaskId) -> StoreResult<Task> {
        let Some(index) = self.position(id) else {
            error!(
                "event=todo_toggle module=store status=error error_code=not_found task_id={}",
                id
            );
            return Err(LookupError::NotFound(id.clone()).into());
        };

        let mut next = self.tasks.clone();
        next[index].toggle();
        let updated = next[index].clone();
        self.commit(next)?;

        info!(
            "event=todo_toggle module=store status=ok task_id={} completed={}",
            updated.id, updated.completed
        );
        Ok(updated)
    }

    /// Removes one task; an unknown id is a silent no-op.
    pub fn remove(&mut self, id: &TaskId) -> StoreResult<()> {
        let Some(index) = self.position(id) else {
            debug!("event=todo_remove module=store status=noop task_id={}", id);
            return Ok(());
        };

        let mut next = self.tasks.clone();
        next.remove(index);
        self.commit(next)?;

        info!(
            "event=todo_remove module=store status=ok task_id={} count={}",
            id,
            self.tasks.len()
        );
        Ok(())
    }

    /// Removes every completed task in one write and returns how many went.
    pub fn clear_completed(&mut self) -> StoreResult<usize> {
        let next: Vec<Task> = self
            .tasks
            .iter()
            .filter(|task| !task.completed)
            .cloned()
            .collect();
        let removed = self.tasks.len() - next.len();
        if removed > 0 {
            self.commit(next)?;
        }

        info!(
            "event=todo_clear_completed module=store status=ok removed={} count={}",
            removed,
            self.tasks.len()
        );
        Ok(removed)
    }

    /// Reorders the list to follow `new_order`.
    ///
    /// # Errors
    /// - `ValidationError::SetMismatch` unless `new_order` is a permutation of
    ///   the current ids; the list is left unchanged.
    pub fn reorder(&mut self, new_order: &[TaskId]) -> StoreResult<()> {
        if !is_permutation_of(&self.tasks, new_order) {
            error!(
                "event=todo_reorder module=store status=error error_code=set_mismatch expected={} got={}",
                self.tasks.len(),
                new_order.len()
            );
            return Err(ValidationError::SetMismatch.into());
        }

        let mut by_id: HashMap<&TaskId, &Task> =
            self.tasks.iter().map(|task| (&task.id, task)).collect();
        let mut next = Vec::with_capacity(new_order.len());
        for id in new_order {
            match by_id.remove(id) {
                Some(task) => next.push(task.clone()),
                None => return Err(ValidationError::SetMismatch.into()),
            }
        }
        self.commit(next)?;

        info!(
            "event=todo_reorder module=store status=ok count={}",
            self.tasks.len()
        );
        Ok(())
    }

    /// Number of tasks not yet completed.
    pub fn count_incomplete(&self) -> usize {
        count_incomplete_in(&self.tasks)
    }

    fn position(&self, id: &TaskId) -> Option<usize> {
        self.tasks.iter().position(|task| &task.id == id)
    }

    fn fresh_id(&mut self) -> StoreResult<TaskId> {
        let mut id = self.ids.generate_id();
        let mut attempts = 1;
        while self.position(&id).is_some() {
            if attempts == MAX_ID_ATTEMPTS {
                error!(
                    "event=todo_add module=store status=error error_code=duplicate_id task_id={}",
                    id
                );
                return Err(StoreError::DuplicateId(id));
            }
            id = self.ids.generate_id();
            attempts += 1;
        }
        Ok(id)
    }

    fn commit(&mut self, next: Vec<Task>) -> StoreResult<()> {
        if let Err(err) = save_todo_list(&self.kv, &next) {
            error!(
                "event=todo_persist module=store status=error error_code=write_failed error={}",
                err
            );
            return Err(err.into());
        }
        self.tasks = next;
        Ok(())
    }
}

fn count_incomplete_in(tasks: &[Task]) -> usize {
    tasks.iter().filter(|task| !task.completed).count()
}

fn dedupe_by_id(tasks: Vec<Task>) -> Vec<Task> {
    let mut seen = HashSet::with_capacity(tasks.len());
    tasks
        .into_iter()
        .filter(|task| seen.insert(task.id.clone()))
        .collect()
}

fn is_permutation_of(tasks: &[Task], new_order: &[TaskId]) -> bool {
    if tasks.len() != new_order.len() {
        return false;
    }
    let current: HashSet<&TaskId> = tasks.iter().map(|task| &task.id).collect();
    let proposed: HashSet<&TaskId> = new_order.iter().collect();
    proposed.len() == new_order.len() && proposed == current
}
