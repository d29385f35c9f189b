//! Engine configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Per-instance supervision settings.
///
/// Every engine owns its own copy; there is no process-wide default state
/// to read or mutate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SupervisorConfig {
    /// How often the monitor loop re-checks process liveness.
    pub polling_interval: Duration,

    /// Monitor handlers run only every Nth liveness poll. Liveness polling
    /// stays cheap and frequent while the comparatively expensive artifact
    /// inspection is throttled independently.
    pub monitor_cadence: u32,

    /// Total corrections allowed across the whole job, not per handler.
    pub max_corrections: usize,

    /// Whether monitor-class handlers run while the process is alive.
    /// When disabled the engine just waits for natural completion.
    pub monitor: bool,

    /// Fail fast when a job arrives without an input payload.
    pub requires_input: bool,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            polling_interval: Duration::from_secs(10),
            monitor_cadence: 30,
            max_corrections: 5,
            monitor: true,
            requires_input: false,
        }
    }
}
