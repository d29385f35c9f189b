//! Child process launch, non-blocking polling and group-wide termination.

use std::path::Path;
use std::process::Stdio;
use tokio::io::AsyncReadExt;
use tokio::process::{Child, Command};

/// Non-blocking status of a supervised child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessStatus {
    Running,
    Exited(i32),
}

/// A live child process rooted in a job's working directory.
///
/// The child is placed in its own process group so fan-out commands
/// (mpirun and friends) can be terminated as a unit rather than leaving
/// orphans behind.
#[derive(Debug)]
pub struct ProcessHandle {
    child: Child,
    pgid: Option<i32>,
    terminated: bool,
}

impl ProcessHandle {
    /// Spawn `sh -c <command>` with `directory` as its working directory.
    /// Stderr is captured for diagnostic reporting; stdout goes nowhere,
    /// supervised jobs write their real output to disk.
    pub fn launch(command: &str, directory: &Path) -> std::io::Result<Self> {
        let mut cmd = Command::new("sh");
        cmd.arg("-c")
            .arg(command)
            .current_dir(directory)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        #[cfg(unix)]
        cmd.process_group(0);

        let child = cmd.spawn()?;
        // With process_group(0) the group id equals the leader's pid.
        let pgid = child.id().map(|pid| pid as i32);

        Ok(Self {
            child,
            pgid,
            terminated: false,
        })
    }

    /// Non-blocking status query. Never suspends the caller.
    pub fn poll(&mut self) -> std::io::Result<ProcessStatus> {
        match self.child.try_wait()? {
            Some(status) => Ok(ProcessStatus::Exited(status.code().unwrap_or(-1))),
            None => Ok(ProcessStatus::Running),
        }
    }

    /// SIGKILL the entire process group. Idempotent.
    ///
    /// Used when a terminating-class fault is detected: the process cannot
    /// be trusted to continue even one more step, so this is forceful, not
    /// graceful.
    pub fn terminate(&mut self) {
        if self.terminated {
            return;
        }
        self.terminated = true;

        #[cfg(unix)]
        if let Some(pgid) = self.pgid {
            unsafe {
                libc::kill(-pgid, libc::SIGKILL);
            }
        }
    }

    /// Whether [`ProcessHandle::terminate`] was called on this handle.
    pub fn was_terminated(&self) -> bool {
        self.terminated
    }

    /// Block until the child exits and collect `(exit_code, stderr)`.
    ///
    /// Stderr is drained to EOF before waiting; a chatty child with a full
    /// pipe would otherwise deadlock against us. A signal-terminated child
    /// reports exit code -1.
    pub async fn wait_and_collect(mut self) -> std::io::Result<(i32, String)> {
        let mut stderr = String::new();
        if let Some(mut pipe) = self.child.stderr.take() {
            let mut buf = Vec::new();
            pipe.read_to_end(&mut buf).await?;
            stderr = String::from_utf8_lossy(&buf).to_string();
        }
        let status = self.child.wait().await?;
        Ok((status.code().unwrap_or(-1), stderr))
    }
}
