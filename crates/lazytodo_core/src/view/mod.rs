//! View layer: visibility filter and store-to-view reconciliation.
//!
//! # Responsibility
//! - Keep rendering UI-framework-agnostic behind `ViewRenderer`.
//! - Derive row styling from `Task.completed` and the active `Filter` only.

pub mod filter;
pub mod patch;
pub mod sync;
