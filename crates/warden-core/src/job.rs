//! Job specification supplied by the caller.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;

/// One external job to supervise. Immutable for the duration of a run; the
/// engine only borrows it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSpec {
    /// Working directory the command runs in. Fault checks and corrections
    /// operate on this directory, and it is exclusively owned by the single
    /// in-flight attempt.
    pub directory: PathBuf,

    /// Command line, interpreted by `sh -c`.
    pub command: String,

    /// Opaque input payload handed to the setup hook (a structure, a
    /// parameter set, whatever the hook expects).
    pub input: Option<Value>,
}

impl JobSpec {
    /// Create a job with no input payload.
    pub fn new(directory: impl Into<PathBuf>, command: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            command: command.into(),
            input: None,
        }
    }

    /// Attach an input payload.
    pub fn with_input(mut self, input: Value) -> Self {
        self.input = Some(input);
        self
    }
}
