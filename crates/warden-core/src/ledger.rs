//! Append-only record of applied corrections.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Fixed artifact filename written inside the job's working directory.
pub const CORRECTIONS_FILENAME: &str = "warden_corrections.csv";

/// One applied fix: which handler, what it did, on which attempt.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Correction {
    pub handler: String,
    pub description: String,
    pub attempt: u32,
    pub applied_at: DateTime<Utc>,
}

/// Ordered audit trail for one run.
///
/// Entries are appended exactly once per applied fix and the table is
/// rewritten to [`CORRECTIONS_FILENAME`] after every append, so an operator
/// can inspect progress by reading the working directory without waiting
/// for the run to return.
#[derive(Debug)]
pub struct CorrectionsLedger {
    entries: Vec<Correction>,
    artifact: PathBuf,
}

impl CorrectionsLedger {
    pub fn new(directory: &Path) -> Self {
        Self {
            entries: Vec::new(),
            artifact: directory.join(CORRECTIONS_FILENAME),
        }
    }

    /// Append one record and flush the artifact.
    pub fn append(
        &mut self,
        handler: &str,
        description: String,
        attempt: u32,
    ) -> std::io::Result<()> {
        self.entries.push(Correction {
            handler: handler.to_string(),
            description,
            attempt,
            applied_at: Utc::now(),
        });
        self.flush()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Correction] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<Correction> {
        self.entries
    }

    fn flush(&self) -> std::io::Result<()> {
        let mut table = String::from("attempt,handler,correction\n");
        for correction in &self.entries {
            table.push_str(&format!(
                "{},{},{}\n",
                correction.attempt,
                csv_field(&correction.handler),
                csv_field(&correction.description),
            ));
        }
        std::fs::write(&self.artifact, table)
    }
}

/// Quote a field when it contains a delimiter, quote or newline.
fn csv_field(raw: &str) -> String {
    if raw.contains(|c| c == ',' || c == '"' || c == '\n') {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_string()
    }
}
