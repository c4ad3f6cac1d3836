//! Engine configuration
//!
//! One engine serves every deployment; a [`Profile`] picks the capability set
//! and [`EngineSettings`] overrides individual knobs on top of it.

use crate::resolver::normalize;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Duration;

/// Default passthrough denylist (case-insensitive substrings)
pub const DEFAULT_DENYLIST: &[&str] = &["rm -rf", "format", "del /f", "shutdown", "reboot"];

/// Verbs allowed through the gate in the restricted profile
pub const RESTRICTED_ALLOWED_VERBS: &[&str] =
    &["ls", "cat", "echo", "date", "whoami", "pwd", "uname"];

/// Timeout for passthrough commands in the full profile
pub const FULL_EXEC_TIMEOUT_SECS: u64 = 30;

/// Timeout for passthrough commands in the restricted profile
pub const RESTRICTED_EXEC_TIMEOUT_SECS: u64 = 5;

/// Maximum number of history entries kept per session
pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

/// Number of history entries `history` prints
pub const DEFAULT_HISTORY_DISPLAY: usize = 10;

/// CPU sampling window for `monitor`
pub const DEFAULT_CPU_SAMPLE_MS: u64 = 500;

/// Deployment preset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// Real filesystem, unrestricted passthrough behind the denylist
    #[default]
    Full,
    /// Simulated filesystem, allowlisted passthrough, no host statistics
    Restricted,
}

/// Whether directory mutations touch real storage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilesystemMode {
    /// The real disk
    Real,
    /// Fixed demo tree, mutations only reported
    Simulated,
}

/// How the execution gate treats passthrough commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecMode {
    /// Anything not on the denylist runs
    Unrestricted,
    /// Only verbs on the allowlist run (the denylist still applies)
    Allowlisted,
}

/// Which front end hosts the engine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Surface {
    /// Interactive terminal; `exit`/`quit` end the session
    Cli,
    /// Request/response endpoint
    #[default]
    Web,
}

/// Fully resolved engine configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Preset this configuration was derived from
    pub profile: Profile,
    /// Real or simulated directory operations
    pub filesystem_mode: FilesystemMode,
    /// Passthrough policy
    pub exec_mode: ExecMode,
    /// Verbs honoured when `exec_mode` is allowlisted (lowercase)
    pub allowed_verbs: BTreeSet<String>,
    /// Case-insensitive substrings that refuse a passthrough command
    pub denylist: Vec<String>,
    /// Hard wall-clock limit for passthrough commands
    pub exec_timeout: Duration,
    /// Bounded history size
    pub history_capacity: usize,
    /// Entries printed by `history`
    pub history_display: usize,
    /// Record blank submissions in history
    pub record_blank_lines: bool,
    /// Initial current directory; process cwd when unset
    pub start_dir: Option<PathBuf>,
    /// Enable `echo`, `date` and `whoami` built-ins
    pub extras: bool,
    /// Use live host statistics for `monitor`
    pub live_monitoring: bool,
    /// CPU sampling window for `monitor`
    pub cpu_sample: Duration,
    /// Front end hosting the engine
    pub surface: Surface,
}

impl EngineConfig {
    /// Configuration preset for `profile`
    #[must_use]
    pub fn for_profile(profile: Profile) -> Self {
        let denylist = DEFAULT_DENYLIST.iter().map(|s| (*s).to_string()).collect();
        match profile {
            Profile::Full => Self {
                profile,
                filesystem_mode: FilesystemMode::Real,
                exec_mode: ExecMode::Unrestricted,
                allowed_verbs: BTreeSet::new(),
                denylist,
                exec_timeout: Duration::from_secs(FULL_EXEC_TIMEOUT_SECS),
                history_capacity: DEFAULT_HISTORY_CAPACITY,
                history_display: DEFAULT_HISTORY_DISPLAY,
                record_blank_lines: true,
                start_dir: None,
                extras: false,
                live_monitoring: true,
                cpu_sample: Duration::from_millis(DEFAULT_CPU_SAMPLE_MS),
                surface: Surface::default(),
            },
            Profile::Restricted => Self {
                profile,
                filesystem_mode: FilesystemMode::Simulated,
                exec_mode: ExecMode::Allowlisted,
                allowed_verbs: RESTRICTED_ALLOWED_VERBS
                    .iter()
                    .map(|s| (*s).to_string())
                    .collect(),
                denylist,
                exec_timeout: Duration::from_secs(RESTRICTED_EXEC_TIMEOUT_SECS),
                history_capacity: DEFAULT_HISTORY_CAPACITY,
                history_display: DEFAULT_HISTORY_DISPLAY,
                record_blank_lines: true,
                start_dir: Some(std::env::temp_dir()),
                extras: true,
                live_monitoring: false,
                cpu_sample: Duration::from_millis(DEFAULT_CPU_SAMPLE_MS),
                surface: Surface::default(),
            },
        }
    }

    /// Builder: set the hosting surface
    #[must_use]
    pub fn with_surface(mut self, surface: Surface) -> Self {
        self.surface = surface;
        self
    }

    /// Builder: set the initial directory
    #[must_use]
    pub fn with_start_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.start_dir = Some(dir.into());
        self
    }

    /// Absolute initial directory.
    ///
    /// A relative `start_dir` is taken against the process cwd; without one the cwd
    /// itself is used. `None` only when the cwd is unknown and nothing absolute is set.
    #[must_use]
    pub fn start_directory(&self) -> Option<PathBuf> {
        let dir = match (&self.start_dir, std::env::current_dir().ok()) {
            (Some(dir), Some(cwd)) => cwd.join(dir),
            (Some(dir), None) if dir.is_absolute() => dir.clone(),
            (None, Some(cwd)) => cwd,
            _ => return None,
        };
        Some(normalize(&dir))
    }

    /// Whether directory operations are simulated
    #[must_use]
    pub fn is_simulated(&self) -> bool {
        self.filesystem_mode == FilesystemMode::Simulated
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::for_profile(Profile::Full)
    }
}

/// Engine section of the application configuration (`[engine]` in TOML).
///
/// Unset fields keep the profile's value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Preset to start from
    #[serde(default)]
    pub profile: Profile,
    /// Override the filesystem mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filesystem_mode: Option<FilesystemMode>,
    /// Override the passthrough policy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exec_mode: Option<ExecMode>,
    /// Override the allowlist
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_verbs: Option<Vec<String>>,
    /// Override the denylist
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub denylist: Option<Vec<String>>,
    /// Override the passthrough timeout
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exec_timeout_secs: Option<u64>,
    /// Override the history bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history_capacity: Option<usize>,
    /// Override how many entries `history` prints
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history_display: Option<usize>,
    /// Override blank-line recording
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_blank_lines: Option<bool>,
    /// Override the start directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_dir: Option<String>,
    /// Override the extra built-ins
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extras: Option<bool>,
    /// Override live monitoring
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub live_monitoring: Option<bool>,
    /// Override the CPU sampling window
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_sample_ms: Option<u64>,
}

impl EngineSettings {
    /// Apply the overrides on top of the selected profile
    #[must_use]
    pub fn resolve(&self) -> EngineConfig {
        let mut config = EngineConfig::for_profile(self.profile);

        if let Some(mode) = self.filesystem_mode {
            config.filesystem_mode = mode;
        }
        if let Some(mode) = self.exec_mode {
            config.exec_mode = mode;
        }
        if let Some(verbs) = &self.allowed_verbs {
            config.allowed_verbs = verbs.iter().map(|v| v.trim().to_lowercase()).collect();
        }
        if let Some(denylist) = &self.denylist {
            config.denylist = denylist.clone();
        }
        if let Some(secs) = self.exec_timeout_secs {
            config.exec_timeout = Duration::from_secs(secs.max(1));
        }
        if let Some(capacity) = self.history_capacity {
            config.history_capacity = capacity.max(1);
        }
        if let Some(display) = self.history_display {
            config.history_display = display;
        }
        if let Some(record) = self.record_blank_lines {
            config.record_blank_lines = record;
        }
        if let Some(dir) = self.start_dir.as_deref().filter(|d| !d.is_empty()) {
            config.start_dir = Some(PathBuf::from(dir));
        }
        if let Some(extras) = self.extras {
            config.extras = extras;
        }
        if let Some(live) = self.live_monitoring {
            config.live_monitoring = live;
        }
        if let Some(ms) = self.cpu_sample_ms {
            config.cpu_sample = Duration::from_millis(ms);
        }

        config
    }
}
