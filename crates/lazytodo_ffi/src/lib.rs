//! Host-facing adapter over `lazytodo_core`.
//!
//! UI hosts call the functions in [`api`] once per user interaction and apply
//! the returned view patches.

pub mod api;
