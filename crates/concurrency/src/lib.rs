//! Concurrency layer for syncvar
//!
//! This crate implements the synchronization variables:
//! - [`BlockingCell`]: lock, wait and signal primitives every access mode is built from
//! - [`SyncCell`]: full/empty variable with six access modes plus reset
//! - [`SingleCell`]: single-assignment variable with a lock-free read fast path
//!
//! Waiting has no timeout and no cancellation: a task blocked on a cell that
//! never transitions stays blocked.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod primitive;
pub mod single_cell;
pub mod sync_cell;

pub use primitive::{BlockingCell, Held};
pub use single_cell::SingleCell;
pub use sync_cell::SyncCell;

// Re-export the shared types from core for convenience
pub use syncvar_core::{CellFault, CellId, Fullness, Result, SyncConfig, SyncError};
