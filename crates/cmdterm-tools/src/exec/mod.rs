//! Exec capability - running a command line through the OS shell

pub mod runner;

#[cfg(test)]
mod tests;

pub use runner::ShellRunner;

use crate::error::Result;
use std::path::Path;
use std::time::Duration;

/// Captured result of a finished process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Standard output (lossy UTF-8)
    pub stdout: String,
    /// Standard error (lossy UTF-8)
    pub stderr: String,
    /// Exit code, `-1` when terminated by a signal
    pub exit_code: i32,
}

impl ProcessOutput {
    /// Whether the process exited with status zero
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Runs a raw command line to completion or until the deadline passes.
///
/// Implementations must not leave the process running once `Error::Timeout`
/// has been returned.
#[async_trait::async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Run `command_line` with `cwd` as working directory
    async fn run(&self, command_line: &str, cwd: &Path, timeout: Duration)
        -> Result<ProcessOutput>;
}
