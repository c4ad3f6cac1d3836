use super::{ProcessOutput, ProcessRunner};
use crate::error::{Error, Result};
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

/// Spawns command lines through the platform shell (`sh -c` / `cmd /C`).
#[derive(Debug, Clone)]
pub struct ShellRunner {
    shell: String,
    flag: String,
}

impl ShellRunner {
    /// Use the platform default shell
    #[must_use]
    pub fn new() -> Self {
        if cfg!(windows) {
            Self::with_shell("cmd", "/C")
        } else {
            Self::with_shell("sh", "-c")
        }
    }

    /// Use a specific shell binary and its "run this string" flag
    #[must_use]
    pub fn with_shell(shell: impl Into<String>, flag: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
            flag: flag.into(),
        }
    }
}

impl Default for ShellRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ProcessRunner for ShellRunner {
    async fn run(
        &self,
        command_line: &str,
        cwd: &Path,
        timeout: Duration,
    ) -> Result<ProcessOutput> {
        let mut cmd = Command::new(&self.shell);
        cmd.arg(&self.flag)
            .arg(command_line)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // the shell is killed when the wait future is dropped on timeout
            .kill_on_drop(true);
        // shell leads its own group so forked children can be killed with it
        #[cfg(unix)]
        cmd.process_group(0);

        debug!(command = %command_line, cwd = %cwd.display(), "Spawning shell command");
        let child = cmd.spawn().map_err(|e| Error::Execution(e.to_string()))?;
        let pgid = child.id();

        let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(output) => output.map_err(|e| Error::Execution(e.to_string()))?,
            Err(_) => {
                kill_process_group(pgid).await;
                return Err(Error::Timeout(timeout.as_millis() as u64));
            }
        };

        Ok(ProcessOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            exit_code: output.status.code().unwrap_or(-1),
        })
    }
}

/// SIGKILL every process left in the timed-out command's group
#[cfg(unix)]
async fn kill_process_group(pgid: Option<u32>) {
    let Some(pgid) = pgid else {
        return;
    };

    let status = Command::new("kill")
        .arg("-KILL")
        .arg("--")
        .arg(format!("-{}", pgid))
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await;

    match status {
        Ok(status) if status.success() => debug!(pgid, "Killed timed-out process group"),
        // group already empty
        Ok(_) => {}
        Err(e) => warn!(pgid, error = %e, "Failed to kill timed-out process group"),
    }
}

#[cfg(not(unix))]
async fn kill_process_group(_pgid: Option<u32>) {}
