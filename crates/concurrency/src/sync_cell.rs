//! Full/empty synchronization variable
//!
//! A [`SyncCell`] holds a value plus a full/empty flag. Access modes are
//! named after the state they require before and the state they leave
//! behind:
//!
//! | Operation | Waits for | Leaves | Wakes |
//! |-----------|-----------|--------|-------|
//! | `read_fe` | full | empty | empty-waiters |
//! | `read_ff` | full | full | full-waiters |
//! | `read_xx` | - | unchanged | - |
//! | `write_ef` | empty | full | full-waiters |
//! | `write_ff` | full | full | full-waiters |
//! | `write_xf` | - | full | full-waiters |
//! | `reset` | - | empty | empty-waiters |
//!
//! `read_fe`/`write_ef` hand a value from producer to consumer exactly once.
//! `read_ff`/`write_ff` work on a value that stays published. `read_xx` and
//! `write_xf` ignore the protocol and leave race avoidance to the caller.
//!
//! ## Faults
//!
//! If the lock primitive reports a fault, write operations and `reset`
//! report a fatal error naming the operation. Reads follow the configured
//! [`ReadFaultPolicy`]: by default they are skipped and the error is
//! returned.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use std::thread;
//! use syncvar_concurrency::SyncCell;
//!
//! let cell = Arc::new(SyncCell::<u64>::new());
//! let producer = {
//!     let cell = Arc::clone(&cell);
//!     thread::spawn(move || cell.write_ef(42))
//! };
//!
//! assert_eq!(cell.read_fe().unwrap(), 42);
//! producer.join().unwrap();
//! assert!(!cell.is_full(false));
//! ```

use crate::primitive::BlockingCell;
use std::fmt;
use syncvar_core::{
    CellFault, CellId, Fullness, ReadFaultPolicy, Result, SourceLocation, SyncConfig, SyncError,
};
use tracing::{trace, warn};

/// Full/empty variable
pub struct SyncCell<T> {
    id: CellId,
    inner: BlockingCell<T>,
    config: SyncConfig,
}

impl<T: Default> SyncCell<T> {
    /// Create an empty cell holding `T::default()`
    pub fn new() -> Self {
        Self::with_config(SyncConfig::default())
    }

    /// Create an empty cell with explicit configuration
    pub fn with_config(config: SyncConfig) -> Self {
        Self {
            id: CellId::next(),
            inner: BlockingCell::new(T::default()),
            config,
        }
    }

    /// Empty the cell and restore the default value
    ///
    /// Never waits for a state. Wakes every task blocked in `write_ef`.
    #[track_caller]
    pub fn reset(&self) {
        let location = SourceLocation::caller();
        let mut held = match self.inner.lock() {
            Ok(held) => held,
            Err(fault) => self.write_fault("reset", fault, location),
        };
        *held = T::default();
        trace!(cell = %self.id, op = "reset", "-> empty");
        held.mark_and_signal_empty();
    }
}

impl<T> SyncCell<T> {
    /// Create a cell that starts full with `value`
    pub fn full(value: T) -> Self {
        Self::full_with_config(value, SyncConfig::default())
    }

    /// Create a full cell with explicit configuration
    pub fn full_with_config(value: T, config: SyncConfig) -> Self {
        Self {
            id: CellId::next(),
            inner: BlockingCell::new_full(value),
            config,
        }
    }

    /// Get the cell's id
    pub fn id(&self) -> CellId {
        self.id
    }

    /// Get the cell's configuration
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Check whether the cell is full
    ///
    /// With `non_blocking` the answer is read without taking the lock and
    /// may already be stale.
    pub fn is_full(&self, non_blocking: bool) -> bool {
        self.inner.is_full(non_blocking)
    }

    /// Current state, read under the lock
    pub fn state(&self) -> Fullness {
        Fullness::from_flag(self.is_full(false))
    }

    /// Retire the cell
    ///
    /// Every blocked task wakes up and fails; every later access fails the
    /// same way.
    pub fn retire(&self) {
        warn!(cell = %self.id, "retiring cell");
        self.inner.retire();
    }

    /// Wait until empty, store `value`, mark full
    #[track_caller]
    pub fn write_ef(&self, value: T) {
        let location = SourceLocation::caller();
        let mut held = match self.inner.wait_empty_and_lock() {
            Ok(held) => held,
            Err(fault) => self.write_fault("write_ef", fault, location),
        };
        *held = value;
        trace!(cell = %self.id, op = "write_ef", "empty -> full");
        held.mark_and_signal_full();
    }

    /// Wait until full, overwrite the value, stay full
    #[track_caller]
    pub fn write_ff(&self, value: T) {
        let location = SourceLocation::caller();
        let mut held = match self.inner.wait_full_and_lock() {
            Ok(held) => held,
            Err(fault) => self.write_fault("write_ff", fault, location),
        };
        *held = value;
        trace!(cell = %self.id, op = "write_ff", "full -> full");
        held.mark_and_signal_full();
    }

    /// Store `value` and mark full regardless of the current state
    #[track_caller]
    pub fn write_xf(&self, value: T) {
        let location = SourceLocation::caller();
        let mut held = match self.inner.lock() {
            Ok(held) => held,
            Err(fault) => self.write_fault("write_xf", fault, location),
        };
        *held = value;
        trace!(cell = %self.id, op = "write_xf", "-> full");
        held.mark_and_signal_full();
    }

    /// Consume the cell and return whatever value it holds
    pub fn into_inner(self) -> T {
        self.inner.into_payload()
    }

    fn write_fault(&self, op: &'static str, fault: CellFault, location: SourceLocation) -> ! {
        self.config
            .report_fatal(&SyncError::internal(op, self.id, fault, location))
    }

    fn read_fault(&self, op: &'static str, fault: CellFault, location: SourceLocation) -> SyncError {
        let err = SyncError::internal(op, self.id, fault, location);
        match self.config.read_fault_policy() {
            ReadFaultPolicy::Skip => {
                warn!(cell = %self.id, op, %fault, %location, "read skipped on faulted cell");
                err
            }
            ReadFaultPolicy::Fatal => self.config.report_fatal(&err),
        }
    }
}

impl<T: Clone> SyncCell<T> {
    /// Wait until full, take a copy of the value, mark empty
    ///
    /// The stored value is left in place; only the state changes.
    #[track_caller]
    pub fn read_fe(&self) -> Result<T> {
        let location = SourceLocation::caller();
        match self.inner.wait_full_and_lock() {
            Ok(held) => {
                let value = (*held).clone();
                trace!(cell = %self.id, op = "read_fe", "full -> empty");
                held.mark_and_signal_empty();
                Ok(value)
            }
            Err(fault) => Err(self.read_fault("read_fe", fault, location)),
        }
    }

    /// Wait until full, read the value, stay full
    ///
    /// Re-broadcasts to full-waiters so every concurrent reader proceeds.
    #[track_caller]
    pub fn read_ff(&self) -> Result<T> {
        let location = SourceLocation::caller();
        match self.inner.wait_full_and_lock() {
            Ok(held) => {
                let value = (*held).clone();
                held.mark_and_signal_full();
                Ok(value)
            }
            Err(fault) => Err(self.read_fault("read_ff", fault, location)),
        }
    }

    /// Read the value as-is, ignoring the state
    #[track_caller]
    pub fn read_xx(&self) -> Result<T> {
        let location = SourceLocation::caller();
        match self.inner.lock() {
            Ok(held) => Ok((*held).clone()),
            Err(fault) => Err(self.read_fault("read_xx", fault, location)),
        }
    }
}

impl<T: Default> Default for SyncCell<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for SyncCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncCell")
            .field("id", &self.id)
            .field("inner", &self.inner)
            .finish()
    }
}
