//! Setup and workup extension points bracketing the correction loop.

use serde_json::Value;
use std::path::Path;

/// Caller-overridable steps run at most once each per supervised run.
///
/// `setup` stages the working directory before the first attempt; `workup`
/// extracts the final result after the correction loop succeeds. Workup is
/// skipped entirely when the loop never reaches success, so both sides must
/// tolerate the other never running.
pub trait JobHooks: Send + Sync {
    /// Stage input artifacts before the first attempt.
    fn setup(&self, _directory: &Path, _input: Option<&Value>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Extract the job result from the directory after a clean completion.
    fn workup(&self, _directory: &Path) -> anyhow::Result<Value> {
        Ok(Value::Null)
    }
}

/// Hook pair that stages nothing and reports a null result.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHooks;

impl JobHooks for NoHooks {}
