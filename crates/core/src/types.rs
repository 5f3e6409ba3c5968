//! Core types shared by every synchronization variable
//!
//! This module defines the identity and location types used throughout the
//! workspace:
//! - [`CellId`]: Stable numeric handle naming a cell
//! - [`SourceLocation`]: Caller position attached to reported errors
//! - [`Fullness`]: The binary full/empty state of a cell

use std::fmt;
use std::panic::Location;
use std::sync::atomic::{AtomicU64, Ordering};

/// Next id handed out by [`CellId::next`]
static NEXT_CELL_ID: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a synchronization cell
///
/// Every cell gets a fresh id when it is created. The id is what logs and
/// errors use to name a cell; it is never derived from the cell's address.
///
/// # Examples
///
/// ```
/// use syncvar_core::types::CellId;
///
/// let a = CellId::next();
/// let b = CellId::next();
/// assert_ne!(a, b);
/// assert!(b.as_u64() > a.as_u64());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellId(u64);

impl CellId {
    /// Allocate the next process-wide id
    pub fn next() -> Self {
        CellId(NEXT_CELL_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Wrap a raw id
    pub const fn from_u64(raw: u64) -> Self {
        CellId(raw)
    }

    /// Get the raw numeric id
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cell#{}", self.0)
    }
}

/// Position in caller source code
///
/// Captured with `#[track_caller]` by every public access operation so that
/// reported errors point at the caller, not at this library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceLocation {
    /// Source file path
    pub file: &'static str,
    /// Line number (1-based)
    pub line: u32,
    /// Column number (1-based)
    pub column: u32,
}

impl SourceLocation {
    /// Location of the caller of the enclosing `#[track_caller]` function
    #[track_caller]
    pub fn caller() -> Self {
        Self::from(Location::caller())
    }
}

impl From<&'static Location<'static>> for SourceLocation {
    fn from(loc: &'static Location<'static>) -> Self {
        Self {
            file: loc.file(),
            line: loc.line(),
            column: loc.column(),
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// Full/empty state of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fullness {
    /// No value has been published (or it was consumed)
    Empty,
    /// A value is published
    Full,
}

impl Fullness {
    /// Convert from the boolean flag kept by the primitive library
    pub fn from_flag(full: bool) -> Self {
        if full {
            Fullness::Full
        } else {
            Fullness::Empty
        }
    }

    /// Check if this is [`Fullness::Full`]
    pub fn is_full(self) -> bool {
        matches!(self, Fullness::Full)
    }
}

impl fmt::Display for Fullness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fullness::Empty => f.write_str("empty"),
            Fullness::Full => f.write_str("full"),
        }
    }
}
