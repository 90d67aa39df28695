//! Use-case services.
//!
//! # Responsibility
//! - Orchestrate domain rules over the repository layer.
//!
//! # Invariants
//! - Services never bypass repository encoding or persistence contracts.
//! - Services remain storage-agnostic through `KeyValueStore`.

pub mod theme_service;
pub mod todo_store;
