//! Blocking primitive library
//!
//! Every access mode of [`SyncCell`](crate::SyncCell) and
//! [`SingleCell`](crate::SingleCell) is a composition of four operations:
//!
//! ```text
//! lock / unlock              plain mutual exclusion
//! wait_full_and_lock         lock, then sleep on `full` until the flag is set
//! wait_empty_and_lock        lock, then sleep on `empty` until the flag is clear
//! mark_and_signal_{full,empty}   set the flag, broadcast, release
//! ```
//!
//! ## Fullness flag
//!
//! The flag lives in an `AtomicBool` next to the mutex rather than inside it.
//! It is only ever written while the lock is held (or through `&mut self`),
//! with `Release` ordering, so a task that observes `true` with `Acquire`
//! also observes every write made under the lock before the transition.
//! This is what lets `SingleCell::read_ff` skip the lock once full.
//!
//! ## Faults
//!
//! parking_lot locks never poison, so the library tracks faults itself. A
//! [`Held`] guard dropped during a panic marks the cell
//! [`CellFault::Poisoned`]; [`BlockingCell::retire`] marks it
//! [`CellFault::Retired`]. Faults are sticky and wake every waiter.

use parking_lot::{Condvar, Mutex, MutexGuard};
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use syncvar_core::{CellFault, Fullness};

/// Lock-protected part of a cell
struct Slot<S> {
    payload: S,
    fault: Option<CellFault>,
}

/// Mutex, condition variables and fullness flag of one cell
///
/// `S` is the payload guarded by the lock. A cell that keeps its value
/// outside the lock uses `()`.
pub struct BlockingCell<S> {
    slot: Mutex<Slot<S>>,
    full: AtomicBool,
    signal_full: Condvar,
    /// Absent for cells nothing ever waits on to become empty
    signal_empty: Option<Condvar>,
}

impl<S> BlockingCell<S> {
    /// Create an empty cell with both condition variables
    pub fn new(payload: S) -> Self {
        Self::build(payload, false, true)
    }

    /// Create a cell that starts full
    pub fn new_full(payload: S) -> Self {
        Self::build(payload, true, true)
    }

    /// Create an empty cell without an empty-side condition variable
    ///
    /// [`wait_empty_and_lock`](Self::wait_empty_and_lock) on such a cell
    /// fails with [`CellFault::NoEmptySignal`].
    pub fn full_signal_only(payload: S) -> Self {
        Self::build(payload, false, false)
    }

    fn build(payload: S, full: bool, with_empty: bool) -> Self {
        Self {
            slot: Mutex::new(Slot {
                payload,
                fault: None,
            }),
            full: AtomicBool::new(full),
            signal_full: Condvar::new(),
            signal_empty: with_empty.then(Condvar::new),
        }
    }

    /// Acquire the lock
    ///
    /// Blocks until the lock is free. Fails if the cell has faulted.
    pub fn lock(&self) -> Result<Held<'_, S>, CellFault> {
        let guard = self.slot.lock();
        if let Some(fault) = guard.fault {
            return Err(fault);
        }
        Ok(Held {
            cell: self,
            guard,
            panicking: thread::panicking(),
        })
    }

    /// Release a lock obtained from this cell
    pub fn unlock(&self, held: Held<'_, S>) {
        debug_assert!(std::ptr::eq(held.cell, self));
        drop(held);
    }

    /// Acquire the lock once the cell is full
    ///
    /// Loops on `signal_full` until the flag is observed set, so spurious
    /// wakeups and wakeups stolen by another waiter are harmless. Returns with
    /// the lock held. Fails only if the cell faults, before or during the wait.
    pub fn wait_full_and_lock(&self) -> Result<Held<'_, S>, CellFault> {
        let mut held = self.lock()?;
        while !held.is_full() {
            self.signal_full.wait(&mut held.guard);
            held.check()?;
        }
        Ok(held)
    }

    /// Acquire the lock once the cell is empty
    pub fn wait_empty_and_lock(&self) -> Result<Held<'_, S>, CellFault> {
        let signal_empty = self
            .signal_empty
            .as_ref()
            .ok_or(CellFault::NoEmptySignal)?;
        let mut held = self.lock()?;
        while held.is_full() {
            signal_empty.wait(&mut held.guard);
            held.check()?;
        }
        Ok(held)
    }

    /// Read the fullness flag
    ///
    /// With `non_blocking` the flag is read without touching the lock and
    /// may be stale by the time the caller acts on it. Otherwise the lock is
    /// taken for the read. Never fails, even on a faulted cell.
    pub fn is_full(&self, non_blocking: bool) -> bool {
        if non_blocking {
            return self.full.load(Ordering::Acquire);
        }
        let _guard = self.slot.lock();
        self.full.load(Ordering::Acquire)
    }

    /// Current fault, if any
    pub fn fault(&self) -> Option<CellFault> {
        self.slot.lock().fault
    }

    /// Mark the cell retired and wake every waiter
    ///
    /// Waiters return [`CellFault::Retired`]; later acquisitions fail the
    /// same way. Retiring an already faulted cell keeps the first fault.
    pub fn retire(&self) {
        let mut guard = self.slot.lock();
        guard.fault.get_or_insert(CellFault::Retired);
        self.wake_all();
    }

    /// Overwrite payload and flag through exclusive access
    pub fn reset_mut(&mut self, payload: S) {
        let slot = self.slot.get_mut();
        slot.payload = payload;
        *self.full.get_mut() = false;
    }

    /// Consume the cell and return its payload
    pub fn into_payload(self) -> S {
        self.slot.into_inner().payload
    }

    fn wake_all(&self) {
        self.signal_full.notify_all();
        if let Some(signal_empty) = &self.signal_empty {
            signal_empty.notify_all();
        }
    }
}

impl<S: fmt::Debug> fmt::Debug for BlockingCell<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_struct("BlockingCell");
        d.field("state", &Fullness::from_flag(self.full.load(Ordering::Acquire)));
        match self.slot.try_lock() {
            Some(slot) => d
                .field("payload", &slot.payload)
                .field("fault", &slot.fault),
            None => d.field("payload", &"<locked>"),
        };
        d.finish()
    }
}

/// Lock on a [`BlockingCell`]
///
/// Dereferences to the payload. Dropping the guard releases the lock; the
/// `mark_and_signal_*` methods publish a transition before releasing it.
#[must_use = "dropping the guard releases the cell lock"]
pub struct Held<'a, S> {
    cell: &'a BlockingCell<S>,
    guard: MutexGuard<'a, Slot<S>>,
    /// Whether the thread was already unwinding when the lock was taken
    panicking: bool,
}

impl<S> Held<'_, S> {
    /// Read the fullness flag under the lock
    pub fn is_full(&self) -> bool {
        self.cell.full.load(Ordering::Acquire)
    }

    /// Current state under the lock
    pub fn state(&self) -> Fullness {
        Fullness::from_flag(self.is_full())
    }

    /// Set the cell full, wake all full-waiters, release the lock
    pub fn mark_and_signal_full(self) {
        self.cell.full.store(true, Ordering::Release);
        self.cell.signal_full.notify_all();
    }

    /// Set the cell empty, wake all empty-waiters, release the lock
    pub fn mark_and_signal_empty(self) {
        self.cell.full.store(false, Ordering::Release);
        if let Some(signal_empty) = &self.cell.signal_empty {
            signal_empty.notify_all();
        }
    }

    fn check(&self) -> Result<(), CellFault> {
        match self.guard.fault {
            Some(fault) => Err(fault),
            None => Ok(()),
        }
    }
}

impl<S> Deref for Held<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        &self.guard.payload
    }
}

impl<S> DerefMut for Held<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        &mut self.guard.payload
    }
}

impl<S> Drop for Held<'_, S> {
    fn drop(&mut self) {
        // Only a panic that started while the lock was held poisons it
        if !self.panicking && thread::panicking() && self.guard.fault.is_none() {
            self.guard.fault = Some(CellFault::Poisoned);
            self.cell.wake_all();
        }
    }
}
