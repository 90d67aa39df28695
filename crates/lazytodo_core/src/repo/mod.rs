//! Repository layer: persistence contracts and stored layout.
//!
//! # Responsibility
//! - Define the string-keyed store used as the only persistence boundary.
//! - Isolate SQLite and JSON encoding details from service orchestration.
//!
//! # Invariants
//! - Every write replaces one whole value; there are no incremental updates.

pub mod kv_store;
pub mod todo_repo;
