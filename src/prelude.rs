//! Convenient imports for syncvar.
//!
//! This module re-exports the most commonly used types so you can get started
//! with a single import:
//!
//! ```
//! use syncvar::prelude::*;
//!
//! let flag = SingleCell::<bool>::new();
//! flag.write_ef(true)?;
//! assert!(flag.read_ff()?);
//! # Ok::<(), SyncError>(())
//! ```

// Cells
pub use crate::{SingleCell, SyncCell};

// Error handling
pub use crate::{Result, SyncError};

// Configuration
pub use crate::{FatalAction, ReadFaultPolicy, SyncConfig};

// Core types
pub use crate::{CellId, Fullness};
