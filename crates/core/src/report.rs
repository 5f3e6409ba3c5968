//! Error reporters
//!
//! Access operations never decide on their own how a failure surfaces. They
//! hand the error to a [`Reporter`]: recoverable errors return control to
//! the caller, fatal ones never return.

use crate::error::SyncError;
use tracing::{error, warn};

/// What a [`StdReporter`] does after logging a fatal error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FatalAction {
    /// Terminate the process immediately
    #[default]
    Abort,
    /// Unwind the current task with a panic
    Panic,
}

/// Sink for errors raised by access operations
pub trait Reporter: Send + Sync {
    /// Report a recoverable error; control returns to the caller afterwards
    fn error(&self, err: &SyncError);

    /// Report an unrecoverable error; must not return
    fn fatal(&self, err: &SyncError) -> !;
}

/// Reporter that logs through `tracing`
///
/// Fatal errors are logged at `error` level and then handled according to
/// the configured [`FatalAction`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StdReporter {
    action: FatalAction,
}

impl StdReporter {
    /// Create a reporter with an explicit fatal action
    pub const fn new(action: FatalAction) -> Self {
        Self { action }
    }

    /// Reporter that aborts the process on fatal errors
    pub const fn aborting() -> Self {
        Self::new(FatalAction::Abort)
    }

    /// Reporter that panics on fatal errors
    pub const fn panicking() -> Self {
        Self::new(FatalAction::Panic)
    }

    /// Get the configured fatal action
    pub fn action(&self) -> FatalAction {
        self.action
    }
}

impl Reporter for StdReporter {
    fn error(&self, err: &SyncError) {
        warn!(cell = %err.cell(), location = %err.location(), "{}", err);
    }

    fn fatal(&self, err: &SyncError) -> ! {
        error!(cell = %err.cell(), location = %err.location(), "internal error: {}", err);
        match self.action {
            FatalAction::Abort => std::process::abort(),
            FatalAction::Panic => panic!("internal error: {}", err),
        }
    }
}
