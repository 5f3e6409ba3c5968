//! Core types for syncvar
//!
//! This crate holds everything the synchronization cells share:
//! - [`CellId`] and [`SourceLocation`]: identity and caller positions
//! - [`SyncError`] and [`CellFault`]: the error taxonomy
//! - [`Reporter`]: where recoverable and fatal errors go
//! - [`SyncConfig`]: per-cell configuration

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod report;
pub mod types;

pub use config::{ReadFaultPolicy, SyncConfig};
pub use error::{CellFault, Result, SyncError};
pub use report::{FatalAction, Reporter, StdReporter};
pub use types::{CellId, Fullness, SourceLocation};
