//! Execution Gate
//!
//! Checks a passthrough command line against the denylist (and, in
//! allowlisted deployments, the verb allowlist) before handing it to the
//! [`ProcessRunner`] with a hard deadline.
//!
//! The denylist is a best-effort guard against obviously catastrophic input.
//! It trusts the operator, not the input: simple spacing variants get past
//! it, and it is no substitute for running cmdterm under a restricted user.

use crate::config::{EngineConfig, ExecMode};
use crate::error::{DenyReason, Error, Result};
use cmdterm_tools::ProcessRunner;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Output of a passthrough command that ran to completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecReport {
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
    /// Process exit code
    pub exit_code: i32,
}

impl ExecReport {
    /// Combine both streams into the transcript text
    #[must_use]
    pub fn render(&self) -> String {
        let mut output = self.stdout.clone();
        if !self.stderr.is_empty() {
            output.push_str("\n❌ Error: ");
            output.push_str(&self.stderr);
        }
        if output.is_empty() {
            "✅ Command executed successfully".to_string()
        } else {
            output
        }
    }
}

/// Denylist/allowlist check plus deadline around a [`ProcessRunner`]
pub struct ExecutionGate {
    runner: Arc<dyn ProcessRunner>,
    denylist: Vec<String>,
    mode: ExecMode,
    allowed_verbs: BTreeSet<String>,
    timeout: Duration,
}

impl ExecutionGate {
    /// Create a gate from the engine configuration
    pub fn new(runner: Arc<dyn ProcessRunner>, config: &EngineConfig) -> Self {
        Self {
            runner,
            denylist: config.denylist.iter().map(|d| d.to_lowercase()).collect(),
            mode: config.exec_mode,
            allowed_verbs: config.allowed_verbs.clone(),
            timeout: config.exec_timeout,
        }
    }

    /// Decide whether `command_line` may run. No process is involved.
    pub fn check(&self, command_line: &str) -> Result<()> {
        let lowered = command_line.to_lowercase();
        if let Some(pattern) = self.denylist.iter().find(|d| lowered.contains(d.as_str())) {
            return Err(Error::Denied(DenyReason::Denylisted(pattern.clone())));
        }

        if self.mode == ExecMode::Allowlisted {
            let verb = lowered.split_whitespace().next().unwrap_or_default();
            if !self.allowed_verbs.contains(verb) {
                return Err(Error::Denied(DenyReason::NotAllowlisted(verb.to_string())));
            }
        }

        Ok(())
    }

    /// Check and run `command_line` in `cwd`
    pub async fn run(&self, cwd: &Path, command_line: &str) -> Result<ExecReport> {
        if let Err(e) = self.check(command_line) {
            warn!(command = %command_line, reason = ?e, "Passthrough command denied");
            return Err(e);
        }

        debug!(command = %command_line, cwd = %cwd.display(), "Running passthrough command");
        let start = Instant::now();

        let output = self
            .runner
            .run(command_line, cwd, self.timeout)
            .await
            .map_err(|e| match e {
                cmdterm_tools::Error::Timeout(_) => {
                    warn!(command = %command_line, timeout_secs = self.timeout.as_secs(), "Passthrough command timed out");
                    Error::TimedOut {
                        secs: self.timeout.as_secs(),
                    }
                }
                other => Error::failed("executing command", other),
            })?;

        info!(
            command = %command_line,
            exit_code = output.exit_code,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Passthrough command finished"
        );

        Ok(ExecReport {
            stdout: output.stdout,
            stderr: output.stderr,
            exit_code: output.exit_code,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Profile;
    use cmdterm_tools::ProcessOutput;
    use std::sync::Mutex;

    /// Records every command it is asked to run
    #[derive(Default)]
    struct RecordingRunner {
        calls: Mutex<Vec<String>>,
        fail_with_timeout: bool,
    }

    #[async_trait::async_trait]
    impl ProcessRunner for RecordingRunner {
        async fn run(
            &self,
            command_line: &str,
            _cwd: &Path,
            timeout: Duration,
        ) -> cmdterm_tools::Result<ProcessOutput> {
            self.calls.lock().unwrap().push(command_line.to_string());
            if self.fail_with_timeout {
                return Err(cmdterm_tools::Error::Timeout(timeout.as_millis() as u64));
            }
            Ok(ProcessOutput {
                stdout: format!("ran {}", command_line),
                stderr: String::new(),
                exit_code: 0,
            })
        }
    }

    fn gate(profile: Profile, runner: Arc<RecordingRunner>) -> ExecutionGate {
        ExecutionGate::new(runner, &EngineConfig::for_profile(profile))
    }

    #[tokio::test]
    async fn test_denylist_is_case_insensitive_substring() {
        let runner = Arc::new(RecordingRunner::default());
        let gate = gate(Profile::Full, runner.clone());

        let err = gate.run(Path::new("/"), "sudo RM -RF /tmp").await.unwrap_err();
        assert!(matches!(err, Error::Denied(DenyReason::Denylisted(ref p)) if p == "rm -rf"));

        assert!(gate.check("echo please Reboot now").is_err());
        assert!(runner.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_allowed_command_runs() {
        let runner = Arc::new(RecordingRunner::default());
        let gate = gate(Profile::Full, runner.clone());

        let report = gate.run(Path::new("/"), "git status").await.unwrap();
        assert_eq!(report.stdout, "ran git status");
        assert_eq!(*runner.calls.lock().unwrap(), vec!["git status".to_string()]);
    }

    #[tokio::test]
    async fn test_allowlist_in_restricted_mode() {
        let runner = Arc::new(RecordingRunner::default());
        let gate = gate(Profile::Restricted, runner.clone());

        let err = gate.run(Path::new("/"), "Git status").await.unwrap_err();
        assert!(matches!(err, Error::Denied(DenyReason::NotAllowlisted(ref v)) if v == "git"));

        assert!(gate.run(Path::new("/"), "uname -a").await.is_ok());
        assert_eq!(runner.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_timeout_maps_to_timed_out() {
        let runner = Arc::new(RecordingRunner {
            fail_with_timeout: true,
            ..RecordingRunner::default()
        });
        let gate = gate(Profile::Full, runner);

        let err = gate.run(Path::new("/"), "sleep 100").await.unwrap_err();
        assert!(matches!(err, Error::TimedOut { secs: 30 }));
    }

    #[test]
    fn test_render_combines_streams() {
        let report = ExecReport {
            stdout: "out\n".to_string(),
            stderr: "bad flag".to_string(),
            exit_code: 2,
        };
        assert_eq!(report.render(), "out\n\n❌ Error: bad flag");

        let empty = ExecReport {
            stdout: String::new(),
            stderr: String::new(),
            exit_code: 0,
        };
        assert_eq!(empty.render(), "✅ Command executed successfully");
    }
}
