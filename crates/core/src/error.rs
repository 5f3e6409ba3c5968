//! Error types for synchronization variables
//!
//! Two kinds of failure exist:
//!
//! | Kind | Variant | Recoverable |
//! |------|---------|-------------|
//! | ProtocolViolation | [`SyncError::AlreadyAssigned`] | yes |
//! | InternalInvariantViolation | [`SyncError::Internal`] | no on write/reset paths |
//!
//! Operations that bypass the full/empty protocol (`read_xx`, `write_xf`,
//! `is_full`) never fail because of the cell's state.

use crate::types::{CellId, SourceLocation};
use thiserror::Error;

/// Fault reported by the lock-acquisition primitive
///
/// Once a cell has faulted its state machine can no longer be trusted. The
/// fault is sticky: every later acquisition reports it again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum CellFault {
    /// A task panicked while holding the cell lock
    #[error("lock poisoned by a panicking task")]
    Poisoned,

    /// The cell was retired and must no longer be used
    #[error("cell has been retired")]
    Retired,

    /// Waited for Empty on a cell that has no empty-side signal
    #[error("cell has no empty-side signal")]
    NoEmptySignal,
}

/// All synchronization variable errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    /// Second write to a single-assignment cell
    #[error("single variable already assigned ({cell}) at {location}")]
    AlreadyAssigned {
        /// The cell that was written twice
        cell: CellId,
        /// Where the offending write was issued
        location: SourceLocation,
    },

    /// The lock primitive failed underneath an access operation
    #[error("invalid cell lock in {op} ({cell}): {fault} at {location}")]
    Internal {
        /// Name of the access operation that hit the fault
        op: &'static str,
        /// The faulted cell
        cell: CellId,
        /// What the primitive reported
        fault: CellFault,
        /// Where the operation was issued
        location: SourceLocation,
    },
}

/// Result type for synchronization variable operations
pub type Result<T> = std::result::Result<T, SyncError>;

impl SyncError {
    /// Build an internal error for `op`
    pub fn internal(
        op: &'static str,
        cell: CellId,
        fault: CellFault,
        location: SourceLocation,
    ) -> Self {
        SyncError::Internal {
            op,
            cell,
            fault,
            location,
        }
    }

    /// Check if this is a recoverable protocol violation
    pub fn is_protocol_violation(&self) -> bool {
        matches!(self, SyncError::AlreadyAssigned { .. })
    }

    /// Check if this is a serious/unrecoverable error
    pub fn is_serious(&self) -> bool {
        matches!(self, SyncError::Internal { .. })
    }

    /// The cell this error is about
    pub fn cell(&self) -> CellId {
        match self {
            SyncError::AlreadyAssigned { cell, .. } | SyncError::Internal { cell, .. } => *cell,
        }
    }

    /// Where the failing operation was issued
    pub fn location(&self) -> SourceLocation {
        match self {
            SyncError::AlreadyAssigned { location, .. }
            | SyncError::Internal { location, .. } => *location,
        }
    }

    /// The underlying lock fault, if any
    pub fn fault(&self) -> Option<CellFault> {
        match self {
            SyncError::Internal { fault, .. } => Some(*fault),
            SyncError::AlreadyAssigned { .. } => None,
        }
    }
}
