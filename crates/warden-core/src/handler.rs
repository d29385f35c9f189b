//! Fault detection and correction contract.

use crate::error::HandlerError;
use std::path::Path;

/// A detected fault signature: a pattern in the job's on-disk state that
/// indicates a specific known failure mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fault {
    /// What was detected, e.g. "convergence stalled for 40 steps".
    pub reason: String,
}

impl Fault {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// A named detector/corrector pair bound to one fault signature.
///
/// Handlers are supplied to the engine in priority order (highest first)
/// and the order is fixed for the engine's lifetime. At most one handler's
/// fix is applied per inspection pass: the first match wins, and every
/// lower-priority match is re-checked on the next attempt.
pub trait ErrorHandler: Send + Sync {
    /// Unique name within a handler set.
    fn name(&self) -> &str;

    /// Whether `check` may run while the supervised process is still alive.
    fn is_monitor(&self) -> bool {
        false
    }

    /// Whether the process must be stopped before the fix is applied,
    /// because the fault corrupts further execution if left running. Only
    /// consulted for monitor-class handlers.
    fn is_terminating(&self) -> bool {
        true
    }

    /// Inspect the working directory for this handler's fault signature.
    ///
    /// Transient read failures are not faults: implementations swallow
    /// incidental I/O noise (a half-written output file, a directory still
    /// being populated) and report `None` for that cycle.
    fn check(&self, directory: &Path) -> Option<Fault>;

    /// Apply the fix and describe what changed.
    ///
    /// May return [`HandlerError::Unrecoverable`] when the signature has no
    /// known fix; that fails the whole run immediately, remaining budget or
    /// not.
    fn correct(&self, directory: &Path) -> Result<String, HandlerError>;
}
