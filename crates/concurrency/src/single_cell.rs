//! Single-assignment synchronization variable
//!
//! A [`SingleCell`] is written at most once. Readers block until the write
//! happens; after that every read returns the same value without touching
//! the lock.
//!
//! ## Fast path
//!
//! The value lives outside the mutex. The writer stores it while holding the
//! lock and then publishes the fullness flag with `Release`. A reader that
//! loads the flag with `Acquire` and sees `true` may read the value
//! directly: full is monotonic and the value is immutable while full. The
//! only way back to empty is [`SingleCell::reset`], which takes `&mut self`,
//! so no reader can be active at that point.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use std::thread;
//! use syncvar_concurrency::SingleCell;
//!
//! let done = Arc::new(SingleCell::<String>::new());
//! let waiter = {
//!     let done = Arc::clone(&done);
//!     thread::spawn(move || done.read_ff().unwrap())
//! };
//!
//! done.write_ef("done".to_string()).unwrap();
//! assert_eq!(waiter.join().unwrap(), "done");
//! assert!(done.write_ef("again".to_string()).is_err());
//! ```

use crate::primitive::BlockingCell;
use std::cell::UnsafeCell;
use std::fmt;
use syncvar_core::{
    CellFault, CellId, ReadFaultPolicy, Result, SourceLocation, SyncConfig, SyncError,
};
use tracing::{trace, warn};

/// Write-once variable
pub struct SingleCell<T> {
    id: CellId,
    lock: BlockingCell<()>,
    value: UnsafeCell<T>,
    config: SyncConfig,
}

// SAFETY: `value` is written only while the lock is held and the flag is
// clear, or through `&mut self`. Shared readers only form `&T` after seeing
// the flag set, after which the value is never written through `&self`.
// Concurrent `&T` access requires `T: Sync`; moving values in from one
// thread and cloning them out on another requires `T: Send`.
unsafe impl<T: Send + Sync> Sync for SingleCell<T> {}

impl<T: Default> SingleCell<T> {
    /// Create an empty cell holding `T::default()`
    pub fn new() -> Self {
        Self::with_config(SyncConfig::default())
    }

    /// Create an empty cell with explicit configuration
    pub fn with_config(config: SyncConfig) -> Self {
        Self {
            id: CellId::next(),
            lock: BlockingCell::full_signal_only(()),
            value: UnsafeCell::new(T::default()),
            config,
        }
    }

    /// Restore the default value and mark the cell empty
    ///
    /// Recycles the cell for an unrelated use. Taking `&mut self` guarantees
    /// no other task observes the cell during the reset.
    pub fn reset(&mut self) {
        *self.value.get_mut() = T::default();
        self.lock.reset_mut(());
        trace!(cell = %self.id, op = "reset", "-> empty");
    }
}

impl<T> SingleCell<T> {
    /// Get the cell's id
    pub fn id(&self) -> CellId {
        self.id
    }

    /// Get the cell's configuration
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Check whether the cell has been assigned
    ///
    /// With `non_blocking` the flag is read without the lock. Because full is
    /// monotonic, a `true` answer is final; a `false` answer may be stale.
    pub fn is_full(&self, non_blocking: bool) -> bool {
        self.lock.is_full(non_blocking)
    }

    /// Retire the cell
    ///
    /// Blocked readers wake up and fail. Reads that find the cell already
    /// full keep succeeding through the fast path.
    pub fn retire(&self) {
        warn!(cell = %self.id, "retiring cell");
        self.lock.retire();
    }

    /// Assign the value
    ///
    /// Fails with [`SyncError::AlreadyAssigned`] if the cell is already full;
    /// the stored value is left unchanged and the error is also handed to the
    /// configured reporter.
    #[track_caller]
    pub fn write_ef(&self, value: T) -> Result<()> {
        let location = SourceLocation::caller();
        let held = match self.lock.lock() {
            Ok(held) => held,
            Err(fault) => self.write_fault("write_ef", fault, location),
        };

        if held.is_full() {
            drop(held);
            let err = SyncError::AlreadyAssigned {
                cell: self.id,
                location,
            };
            self.config.report_error(&err);
            return Err(err);
        }

        // SAFETY: lock held and flag clear; no reader forms `&T` until the
        // flag is published below.
        unsafe {
            *self.value.get() = value;
        }
        trace!(cell = %self.id, op = "write_ef", "empty -> full");
        held.mark_and_signal_full();
        Ok(())
    }

    /// Consume the cell and return its value
    pub fn into_inner(self) -> T {
        self.value.into_inner()
    }

    /// Reference to the value
    ///
    /// # Safety
    ///
    /// The caller must have observed the cell full, either through an
    /// `Acquire` load of the flag or under the lock.
    unsafe fn published(&self) -> &T {
        &*self.value.get()
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

impl<T: Clone> SingleCell<T> {
    /// Wait until assigned and return the value
    ///
    /// Returns without locking if the cell is already full. Otherwise blocks
    /// on the full signal and re-broadcasts it so other blocked readers also
    /// proceed.
    #[track_caller]
    pub fn read_ff(&self) -> Result<T> {
        let location = SourceLocation::caller();
        if self.lock.is_full(true) {
            // SAFETY: flag observed with Acquire.
            return Ok(unsafe { self.published() }.clone());
        }

        match self.lock.wait_full_and_lock() {
            Ok(held) => {
                // SAFETY: flag observed under the lock.
                let value = unsafe { self.published() }.clone();
                held.mark_and_signal_full();
                Ok(value)
            }
            Err(fault) => Err(self.read_fault("read_ff", fault, location)),
        }
    }

    /// Return the value if already assigned, without blocking
    pub fn peek(&self) -> Option<T> {
        if self.lock.is_full(true) {
            // SAFETY: flag observed with Acquire.
            Some(unsafe { self.published() }.clone())
        } else {
            None
        }
    }
}

impl<T: Default> Default for SingleCell<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for SingleCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_struct("SingleCell");
        d.field("id", &self.id);
        if self.lock.is_full(true) {
            // SAFETY: flag observed with Acquire.
            d.field("value", unsafe { self.published() });
        } else {
            d.field("value", &"<empty>");
        }
        d.finish()
    }
}
