//! Warden core: supervised execution of long-running external jobs.
//!
//! Launches a job as a child process, optionally watches it while it runs,
//! detects fault signatures in the job's on-disk artifacts with a
//! priority-ordered set of [`ErrorHandler`]s, applies corrective edits and
//! retries until the job completes cleanly or the correction budget is
//! exhausted. A zero exit code alone is never taken as proof of
//! correctness: the jobs this engine supervises can silently stall or
//! produce malformed output while exiting happily.

pub mod archive;
pub mod config;
pub mod engine;
pub mod error;
pub mod handler;
pub mod hooks;
pub mod job;
pub mod ledger;
pub mod process;
pub mod telemetry;

// Re-export key types
pub use archive::{compress_directory, empty_directory};
pub use config::SupervisorConfig;
pub use engine::{AttemptStatus, RunOutput, Supervisor};
pub use error::{HandlerError, Result, SuperviseError};
pub use handler::{ErrorHandler, Fault};
pub use hooks::{JobHooks, NoHooks};
pub use job::JobSpec;
pub use ledger::{Correction, CorrectionsLedger, CORRECTIONS_FILENAME};
pub use process::{ProcessHandle, ProcessStatus};
pub use telemetry::init_tracing;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
