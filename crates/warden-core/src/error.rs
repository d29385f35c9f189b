//! Engine error taxonomy.
//!
//! Every post-launch terminal failure carries the partial corrections
//! ledger so diagnostic history is never lost. Callers branch on the
//! variant, never on message text.

use crate::ledger::Correction;

/// Errors raised by [`crate::handler::ErrorHandler`] implementations while
/// applying a correction.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    /// The fault signature has no known fix; the job is a lost cause.
    #[error("job is unrecoverable: {0}")]
    Unrecoverable(String),

    /// Unexpected internal failure inside the handler.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Terminal outcomes of a supervised run.
#[derive(Debug, thiserror::Error)]
pub enum SuperviseError {
    /// The engine requires an input payload and the job carried none.
    /// Raised before any process is launched.
    #[error("job input is required but none was supplied")]
    MissingRequiredInput,

    /// The command exited non-zero outside any recognized fault signature.
    /// Not retried: this is assumed to be a configuration or environment
    /// problem the handler set was not designed to classify.
    #[error("command exited with code {code} outside any recognized fault signature: {stderr}")]
    AbnormalExit {
        code: i32,
        stderr: String,
        corrections: Vec<Correction>,
    },

    /// The correction budget ran out while faults kept recurring. The last
    /// detected fault was never corrected; it is named here instead.
    #[error("correction budget of {budget} exhausted; last fault `{last_fault}` (handler {last_handler}) left uncorrected")]
    BudgetExceeded {
        budget: usize,
        last_handler: String,
        last_fault: String,
        corrections: Vec<Correction>,
    },

    /// A handler declared the job unrecoverable, bypassing the remaining
    /// budget.
    #[error("handler {handler} declared the job unrecoverable: {reason}")]
    Unrecoverable {
        handler: String,
        reason: String,
        corrections: Vec<Correction>,
    },

    /// A handler failed unexpectedly while applying its correction.
    /// Propagated rather than swallowed; a silent handler bug would mask
    /// real faults.
    #[error("handler {handler} failed while applying its correction")]
    HandlerFailed {
        handler: String,
        corrections: Vec<Correction>,
        #[source]
        source: anyhow::Error,
    },

    /// The setup hook failed before the first attempt.
    #[error("setup hook failed")]
    SetupFailed(#[source] anyhow::Error),

    /// The workup hook failed after a clean completion.
    #[error("workup hook failed")]
    WorkupFailed(#[source] anyhow::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl SuperviseError {
    /// The corrections applied before the run failed, when the failure
    /// occurred after launch.
    pub fn corrections(&self) -> &[Correction] {
        match self {
            SuperviseError::AbnormalExit { corrections, .. }
            | SuperviseError::BudgetExceeded { corrections, .. }
            | SuperviseError::Unrecoverable { corrections, .. }
            | SuperviseError::HandlerFailed { corrections, .. } => corrections,
            _ => &[],
        }
    }
}

/// Result type for supervised runs.
pub type Result<T> = std::result::Result<T, SuperviseError>;
