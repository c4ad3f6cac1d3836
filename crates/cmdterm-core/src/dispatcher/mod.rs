//! Command Dispatcher
//!
//! Ties the engine together. For every submitted line:
//!
//! 1. record it in history (blank lines too, when configured)
//! 2. let the [`Rewriter`] substitute canonical syntax for known phrasings
//! 3. split on whitespace and look the case-folded verb up in the built-in table
//! 4. run the built-in, or hand the working text to the [`ExecutionGate`]
//!
//! [`Dispatcher::dispatch`] is total: handler errors are rendered through
//! [`UserFriendlyError`] and every input produces an [`Outcome`].

mod builtins;

#[cfg(test)]
mod tests;

pub use builtins::Builtin;

use crate::config::{EngineConfig, FilesystemMode};
use crate::error::UserFriendlyError;
use crate::gate::ExecutionGate;
use crate::monitor::{MonitoringAssembler, MonitoringSnapshot};
use crate::rewriter::Rewriter;
use crate::session::{Session, SystemInfo};
use cmdterm_tools::{
    Filesystem, LocalFilesystem, ProcessRunner, ShellRunner, SimulatedFilesystem, SysinfoProbe,
    SystemProbe, UnavailableProbe,
};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

/// Marker the web surface sends instead of prose for `clear`
pub const CLEAR_MARKER: &str = "CLEAR_TERMINAL";

/// Maximum number of autocomplete suggestions
pub const AUTOCOMPLETE_LIMIT: usize = 10;

/// Reply text for a blank submission
pub const NO_COMMAND: &str = "❌ No command entered";

/// Result of dispatching one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Transcript text
    Text(String),
    /// Reset the visible transcript
    Clear,
    /// End the session after printing the farewell (CLI only)
    Exit(String),
}

impl Outcome {
    /// Flatten into transcript text; `Clear` becomes [`CLEAR_MARKER`]
    #[must_use]
    pub fn into_text(self) -> String {
        match self {
            Outcome::Text(text) | Outcome::Exit(text) => text,
            Outcome::Clear => CLEAR_MARKER.to_string(),
        }
    }
}

/// Response of the request/response boundary
#[derive(Debug, Clone, Serialize)]
pub struct Reply {
    /// Transcript text (or [`CLEAR_MARKER`])
    pub output: String,
    /// Current directory after the command
    pub current_dir: String,
    /// Session system description
    pub system_info: SystemInfo,
}

/// The OS collaborators an engine runs against
#[derive(Clone)]
pub struct Capabilities {
    /// Directory listing and mutation
    pub fs: Arc<dyn Filesystem>,
    /// Passthrough execution
    pub runner: Arc<dyn ProcessRunner>,
    /// Resource statistics
    pub probe: Arc<dyn SystemProbe>,
}

impl Capabilities {
    /// Real or simulated collaborators as selected by `config`
    pub fn for_config(config: &EngineConfig) -> Self {
        let fs: Arc<dyn Filesystem> = match config.filesystem_mode {
            FilesystemMode::Real => Arc::new(LocalFilesystem::new()),
            FilesystemMode::Simulated => {
                let root = config.start_directory().unwrap_or_else(std::env::temp_dir);
                Arc::new(SimulatedFilesystem::new(root))
            }
        };
        let probe: Arc<dyn SystemProbe> = if config.live_monitoring {
            Arc::new(SysinfoProbe::new())
        } else {
            Arc::new(UnavailableProbe::new(
                "host statistics are disabled in this deployment",
            ))
        };

        Self {
            fs,
            runner: Arc::new(ShellRunner::new()),
            probe,
        }
    }
}

/// The command engine
pub struct Dispatcher {
    config: EngineConfig,
    fs: Arc<dyn Filesystem>,
    gate: ExecutionGate,
    rewriter: Rewriter,
    monitor: MonitoringAssembler,
}

impl Dispatcher {
    /// Create an engine over explicit collaborators
    pub fn new(config: EngineConfig, capabilities: Capabilities) -> Self {
        let gate = ExecutionGate::new(capabilities.runner, &config);
        let rewriter = Rewriter::new(config.filesystem_mode == FilesystemMode::Real);
        let monitor = MonitoringAssembler::new(capabilities.probe, config.cpu_sample);

        info!(
            profile = ?config.profile,
            filesystem = ?config.filesystem_mode,
            exec = ?config.exec_mode,
            "Command engine ready"
        );

        Self {
            config,
            fs: capabilities.fs,
            gate,
            rewriter,
            monitor,
        }
    }

    /// Create an engine with the collaborators `config` selects
    pub fn from_config(config: EngineConfig) -> Self {
        let capabilities = Capabilities::for_config(&config);
        Self::new(config, capabilities)
    }

    /// Active configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Start a session in the configured directory (process cwd by default)
    pub fn new_session(&self) -> Session {
        let start = self
            .config
            .start_directory()
            .or_else(|| self.fs.home_dir())
            .unwrap_or_else(|| PathBuf::from("/"));

        let system_info = SystemInfo::from_host(self.monitor.probe().host_info());
        let session = Session::new(start, system_info, self.config.history_capacity);
        info!(
            session_id = %session.id(),
            cwd = %session.current_dir().display(),
            "Session started"
        );
        session
    }

    /// Interpret one submitted line. Never fails.
    pub async fn dispatch(&self, session: &mut Session, line: &str) -> Outcome {
        let command = line.trim();
        if command.is_empty() {
            if self.config.record_blank_lines {
                session.history_mut().record(command);
            }
            return Outcome::Text(NO_COMMAND.to_string());
        }
        session.history_mut().record(command);

        let working = match self.rewriter.rewrite(command) {
            Some(rewritten) => {
                debug!(session_id = %session.id(), command, rewritten = %rewritten, "Rewrote natural-language input");
                rewritten
            }
            None => command.to_string(),
        };

        let mut tokens = working.split_whitespace();
        let verb = tokens.next().unwrap_or_default().to_lowercase();
        let args: Vec<&str> = tokens.collect();

        let result = match Builtin::lookup(&verb, &self.config) {
            Some(builtin) => {
                debug!(session_id = %session.id(), verb = %verb, "Running built-in");
                self.run_builtin(builtin, session, &args).await
            }
            None => self
                .gate
                .run(session.current_dir(), &working)
                .await
                .map(|report| Outcome::Text(report.render())),
        };

        result.unwrap_or_else(|e| {
            debug!(session_id = %session.id(), verb = %verb, error = %e, "Command failed");
            Outcome::Text(e.user_message())
        })
    }

    /// Request/response boundary: dispatch and package the new state
    pub async fn execute(&self, session: &mut Session, line: &str) -> Reply {
        let output = self.dispatch(session, line).await.into_text();
        Reply {
            output,
            current_dir: session.current_dir().display().to_string(),
            system_info: session.system_info().clone(),
        }
    }

    /// Resource snapshot; a labelled fallback when statistics are unavailable
    pub async fn monitor(&self, session: &Session) -> MonitoringSnapshot {
        self.monitor.snapshot(session).await
    }

    /// Up to [`AUTOCOMPLETE_LIMIT`] completions for `prefix`: built-in verbs
    /// first, then entries of the current directory
    pub async fn autocomplete(&self, session: &Session, prefix: &str) -> Vec<String> {
        let needle = prefix.to_lowercase();
        let mut suggestions: Vec<String> = Builtin::verbs(&self.config)
            .filter(|verb| verb.starts_with(&needle))
            .map(str::to_string)
            .collect();

        if !needle.is_empty() {
            match self.fs.list_dir(session.current_dir()).await {
                Ok(mut entries) => {
                    entries.sort_by(|a, b| a.name.cmp(&b.name));
                    suggestions.extend(
                        entries
                            .into_iter()
                            .filter(|e| e.name.to_lowercase().starts_with(&needle))
                            .map(|e| e.name),
                    );
                }
                Err(e) => debug!(error = %e, "Directory entries unavailable for completion"),
            }
        }

        suggestions.truncate(AUTOCOMPLETE_LIMIT);
        suggestions
    }
}
