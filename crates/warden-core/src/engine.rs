//! The correction loop: run, watch, diagnose, fix, retry.
//!
//! This module provides:
//! - the outer retry state machine bounded by the correction budget
//! - the cooperative monitor loop that watches a live process
//! - uniform application of handler fixes with ledger recording

use std::path::Path;

use serde_json::Value;
use tokio::time::sleep;
use tracing::{debug, info, warn, Instrument};
use uuid::Uuid;

use crate::config::SupervisorConfig;
use crate::error::{HandlerError, Result, SuperviseError};
use crate::handler::ErrorHandler;
use crate::hooks::JobHooks;
use crate::job::JobSpec;
use crate::ledger::{Correction, CorrectionsLedger};
use crate::process::{ProcessHandle, ProcessStatus};

/// Terminal status of one launch attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptStatus {
    /// Exited zero with no fault signature on disk.
    CompletedOk,
    /// Exited naturally but a handler matched along the way.
    CompletedWithFault,
    /// A terminating monitor handler stopped it mid-flight.
    KilledByMonitor,
    /// Exited non-zero outside any recognized fault signature.
    NonZeroExit,
}

/// Success value of [`Supervisor::run`].
#[derive(Debug, Clone)]
pub struct RunOutput {
    /// Whatever the workup hook extracted from the directory.
    pub output: Value,

    /// Every fix applied across all attempts, in order.
    pub corrections: Vec<Correction>,
}

/// What the monitor loop observed before handing control back.
enum MonitorOutcome {
    /// The process exited naturally with no fault seen.
    ProcessExited,
    /// A non-terminating fault was corrected in place; the process is
    /// still running.
    FaultCorrected,
    /// A terminating fault was seen and the process group was killed.
    ProcessKilled,
}

/// Supervised execution engine.
///
/// Owns a fixed, priority-ordered handler set and per-instance
/// configuration. `run` invocations share no mutable state, so one engine
/// can supervise many independent jobs concurrently. Each run owns its own
/// process handle, ledger and working directory.
///
/// External cancellation is the caller's concern: kill the process through
/// its own wrapper and the run surfaces as an abnormal exit. A terminated
/// attempt is never resumed; every retry starts from a fresh launch.
pub struct Supervisor {
    config: SupervisorConfig,
    handlers: Vec<Box<dyn ErrorHandler>>,
}

impl Supervisor {
    /// Create an engine from explicit configuration and a handler set
    /// ordered by priority, highest first.
    pub fn new(config: SupervisorConfig, handlers: Vec<Box<dyn ErrorHandler>>) -> Self {
        Self { config, handlers }
    }

    /// Supervise one job to completion: setup, the correction loop, workup.
    ///
    /// Returns the workup result together with the full corrections ledger.
    /// Terminal failures carry whatever ledger was accumulated (see
    /// [`SuperviseError::corrections`]).
    pub async fn run(&self, job: &JobSpec, hooks: &dyn JobHooks) -> Result<RunOutput> {
        let run_id = Uuid::new_v4();
        self.run_inner(job, hooks)
            .instrument(tracing::info_span!("warden.run", run_id = %run_id))
            .await
    }

    async fn run_inner(&self, job: &JobSpec, hooks: &dyn JobHooks) -> Result<RunOutput> {
        if self.config.requires_input && job.input.is_none() {
            return Err(SuperviseError::MissingRequiredInput);
        }

        info!(
            event = "run.started",
            command = %job.command,
            directory = %job.directory.display(),
        );

        std::fs::create_dir_all(&job.directory)?;
        hooks
            .setup(&job.directory, job.input.as_ref())
            .map_err(SuperviseError::SetupFailed)?;

        let ledger = self.execute(&job.directory, &job.command).await?;

        let output = hooks
            .workup(&job.directory)
            .map_err(SuperviseError::WorkupFailed)?;

        info!(event = "run.finished", corrections = ledger.len());

        Ok(RunOutput {
            output,
            corrections: ledger.into_entries(),
        })
    }

    /// The outer retry state machine. Launches attempts until the job
    /// completes with no fault signature on disk, a hard failure surfaces,
    /// or the correction budget runs out.
    async fn execute(&self, directory: &Path, command: &str) -> Result<CorrectionsLedger> {
        let mut ledger = CorrectionsLedger::new(directory);
        let monitors: Vec<&dyn ErrorHandler> = self
            .handlers
            .iter()
            .filter(|handler| handler.is_monitor())
            .map(|handler| handler.as_ref())
            .collect();

        let mut attempt: u32 = 1;
        loop {
            let mut handle = ProcessHandle::launch(command, directory)?;
            debug!(event = "attempt.launched", attempt);

            let outcome = if self.config.monitor && !monitors.is_empty() {
                self.watch(&mut handle, &monitors, directory, &mut ledger, attempt)
                    .await?
            } else {
                MonitorOutcome::ProcessExited
            };

            let mut fault_found = !matches!(outcome, MonitorOutcome::ProcessExited);
            let killed = matches!(outcome, MonitorOutcome::ProcessKilled);

            let (code, stderr) = handle.wait_and_collect().await?;

            // A non-zero exit outside any recognized signature is not
            // retried. Termination by the monitor also exits non-zero, so
            // only flag it when no fault was seen.
            if code != 0 && !fault_found {
                info!(
                    event = "attempt.finished",
                    attempt,
                    status = ?AttemptStatus::NonZeroExit,
                    code,
                );
                return Err(SuperviseError::AbnormalExit {
                    code,
                    stderr,
                    corrections: ledger.into_entries(),
                });
            }

            // Post-exit pass over the FULL handler set, monitors included:
            // a higher-priority non-monitor may detect a fault that outranks
            // whatever the monitor loop acted on, and priority wins
            // regardless of when detection occurred. First match only.
            for handler in &self.handlers {
                let Some(fault) = handler.check(directory) else {
                    continue;
                };
                fault_found = true;

                if ledger.len() >= self.config.max_corrections {
                    warn!(
                        event = "budget.exhausted",
                        attempt,
                        handler = handler.name(),
                        fault = %fault.reason,
                    );
                    return Err(SuperviseError::BudgetExceeded {
                        budget: self.config.max_corrections,
                        last_handler: handler.name().to_string(),
                        last_fault: fault.reason,
                        corrections: ledger.into_entries(),
                    });
                }

                let description = self.apply_correction(handler.as_ref(), directory, &ledger)?;
                ledger.append(handler.name(), description, attempt)?;
                info!(
                    event = "correction.applied",
                    attempt,
                    handler = handler.name(),
                    fault = %fault.reason,
                );
                break;
            }

            let status = if killed {
                AttemptStatus::KilledByMonitor
            } else if fault_found {
                AttemptStatus::CompletedWithFault
            } else {
                AttemptStatus::CompletedOk
            };
            info!(event = "attempt.finished", attempt, status = ?status, code);

            if !fault_found {
                return Ok(ledger);
            }
            attempt += 1;
        }
    }

    /// Cooperative monitor loop: poll liveness every interval, inspect
    /// artifacts only every `monitor_cadence`-th cycle.
    async fn watch(
        &self,
        handle: &mut ProcessHandle,
        monitors: &[&dyn ErrorHandler],
        directory: &Path,
        ledger: &mut CorrectionsLedger,
        attempt: u32,
    ) -> Result<MonitorOutcome> {
        let cadence = self.config.monitor_cadence.max(1);
        let mut cycle: u32 = 0;

        loop {
            sleep(self.config.polling_interval).await;

            if handle.poll()? != ProcessStatus::Running {
                return Ok(MonitorOutcome::ProcessExited);
            }

            cycle += 1;
            if cycle % cadence != 0 {
                continue;
            }

            for handler in monitors {
                let Some(fault) = handler.check(directory) else {
                    continue;
                };
                info!(
                    event = "monitor.fault_detected",
                    attempt,
                    handler = handler.name(),
                    fault = %fault.reason,
                    terminating = handler.is_terminating(),
                );

                if handler.is_terminating() {
                    // Kill now; the fix is applied in the uniform post-exit
                    // pass alongside non-terminating faults.
                    handle.terminate();
                    return Ok(MonitorOutcome::ProcessKilled);
                }

                // Fixable in place while the process keeps running, e.g. a
                // control file the job rereads.
                if ledger.len() >= self.config.max_corrections {
                    handle.terminate();
                    return Err(SuperviseError::BudgetExceeded {
                        budget: self.config.max_corrections,
                        last_handler: handler.name().to_string(),
                        last_fault: fault.reason,
                        corrections: ledger.entries().to_vec(),
                    });
                }

                let description = self.apply_correction(*handler, directory, ledger)?;
                ledger.append(handler.name(), description, attempt)?;
                info!(event = "correction.applied", attempt, handler = handler.name());
                return Ok(MonitorOutcome::FaultCorrected);
            }
        }
    }

    /// Apply one handler's fix, mapping handler failures into the engine
    /// taxonomy with the partial ledger attached.
    fn apply_correction(
        &self,
        handler: &dyn ErrorHandler,
        directory: &Path,
        ledger: &CorrectionsLedger,
    ) -> Result<String> {
        match handler.correct(directory) {
            Ok(description) => Ok(description),
            Err(HandlerError::Unrecoverable(reason)) => Err(SuperviseError::Unrecoverable {
                handler: handler.name().to_string(),
                reason,
                corrections: ledger.entries().to_vec(),
            }),
            Err(HandlerError::Other(source)) => Err(SuperviseError::HandlerFailed {
                handler: handler.name().to_string(),
                corrections: ledger.entries().to_vec(),
                source,
            }),
        }
    }
}
