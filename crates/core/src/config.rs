//! Configuration for synchronization cells
//!
//! ```
//! use syncvar_core::config::{ReadFaultPolicy, SyncConfig};
//! use syncvar_core::report::FatalAction;
//!
//! let config = SyncConfig::new()
//!     .read_fault(ReadFaultPolicy::Fatal)
//!     .fatal_action(FatalAction::Panic);
//! assert_eq!(config.read_fault_policy(), ReadFaultPolicy::Fatal);
//! ```

use crate::error::SyncError;
use crate::report::{FatalAction, Reporter, StdReporter};
use once_cell::sync::Lazy;
use std::fmt;
use std::sync::Arc;

/// Shared default reporter (aborts on fatal errors)
static DEFAULT_REPORTER: Lazy<Arc<dyn Reporter>> =
    Lazy::new(|| Arc::new(StdReporter::aborting()) as Arc<dyn Reporter>);

/// How read operations react to a lock fault
///
/// Write operations and `reset` always treat a lock fault as fatal. Reads
/// default to skipping: no value is produced and the fault is returned to
/// the caller as [`SyncError::Internal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadFaultPolicy {
    /// Skip the read and return the error
    #[default]
    Skip,
    /// Treat the fault as fatal, like writes do
    Fatal,
}

/// Per-cell configuration
#[derive(Clone)]
pub struct SyncConfig {
    read_fault: ReadFaultPolicy,
    reporter: Arc<dyn Reporter>,
}

impl SyncConfig {
    /// Default configuration: skip faulted reads, abort on fatal errors
    pub fn new() -> Self {
        Self {
            read_fault: ReadFaultPolicy::default(),
            reporter: Arc::clone(&DEFAULT_REPORTER),
        }
    }

    /// Set the read fault policy
    pub fn read_fault(mut self, policy: ReadFaultPolicy) -> Self {
        self.read_fault = policy;
        self
    }

    /// Use a custom reporter
    pub fn reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Use a [`StdReporter`] with the given fatal action
    pub fn fatal_action(self, action: FatalAction) -> Self {
        self.reporter(Arc::new(StdReporter::new(action)))
    }

    /// Get the read fault policy
    pub fn read_fault_policy(&self) -> ReadFaultPolicy {
        self.read_fault
    }

    /// Report a recoverable error
    pub fn report_error(&self, err: &SyncError) {
        self.reporter.error(err)
    }

    /// Report a fatal error
    pub fn report_fatal(&self, err: &SyncError) -> ! {
        self.reporter.fatal(err)
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SyncConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncConfig")
            .field("read_fault", &self.read_fault)
            .finish_non_exhaustive()
    }
}
