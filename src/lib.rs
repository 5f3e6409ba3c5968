//! # syncvar
//!
//! Blocking synchronization variables for handing values between tasks.
//!
//! Two cells are provided:
//!
//! - [`SyncCell`] - a value plus a full/empty flag. Writers wait for empty,
//!   readers wait for full, and each access mode states which transition it
//!   performs.
//! - [`SingleCell`] - a write-once value. Readers block until it is assigned,
//!   a second assignment is an error.
//!
//! ## Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use std::thread;
//! use syncvar::prelude::*;
//!
//! let slot = Arc::new(SyncCell::<i64>::new());
//! let consumer = {
//!     let slot = Arc::clone(&slot);
//!     thread::spawn(move || slot.read_fe().unwrap())
//! };
//!
//! slot.write_ef(42);
//! assert_eq!(consumer.join().unwrap(), 42);
//!
//! // The value stays readable through the unsynchronized escape hatch
//! assert_eq!(slot.read_xx().unwrap(), 42);
//! ```
//!
//! ## Failure handling
//!
//! - Assigning a [`SingleCell`] twice returns [`SyncError::AlreadyAssigned`].
//! - A faulted cell lock (a task panicked inside an access, or the cell was
//!   retired) is fatal for writes and `reset`; reads follow
//!   [`ReadFaultPolicy`]. Both go through the [`Reporter`] in the cell's
//!   [`SyncConfig`].

#![warn(missing_docs)]

pub mod prelude;

pub use syncvar_concurrency::{primitive, BlockingCell, Held, SingleCell, SyncCell};
pub use syncvar_core::{
    CellFault, CellId, FatalAction, Fullness, ReadFaultPolicy, Reporter, Result, SourceLocation,
    StdReporter, SyncConfig, SyncError,
};
