//! Session state
//!
//! A [`Session`] is the whole mutable state of one interpreter instance:
//! current directory, command history and the system description captured
//! when it was created. Every dispatcher operation takes it explicitly.

use crate::history::HistoryStore;
use cmdterm_tools::HostInfo;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Immutable description of the host, captured at session creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemInfo {
    /// Operating system name
    pub platform: String,
    /// Operating system version
    pub platform_version: String,
    /// CPU architecture
    pub architecture: String,
    /// Processor label
    pub processor: String,
    /// Interpreter name and version
    pub runtime_version: String,
}

impl SystemInfo {
    /// Combine a probe's host description with this build's version
    #[must_use]
    pub fn from_host(host: HostInfo) -> Self {
        Self {
            platform: host.platform,
            platform_version: host.platform_version,
            architecture: host.architecture,
            processor: host.processor,
            runtime_version: format!("cmdterm {}", crate::VERSION),
        }
    }
}

/// Interpreter state for one CLI process or one web server
#[derive(Debug, Clone)]
pub struct Session {
    id: Uuid,
    current_dir: PathBuf,
    history: HistoryStore,
    system_info: SystemInfo,
}

impl Session {
    /// Create a session starting in `current_dir`
    #[must_use]
    pub fn new(current_dir: impl Into<PathBuf>, system_info: SystemInfo, history_capacity: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            current_dir: current_dir.into(),
            history: HistoryStore::new(history_capacity),
            system_info,
        }
    }

    /// Session identifier (used in logs)
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Absolute current directory
    #[must_use]
    pub fn current_dir(&self) -> &Path {
        &self.current_dir
    }

    pub(crate) fn set_current_dir(&mut self, dir: PathBuf) {
        self.current_dir = dir;
    }

    /// Command history
    #[must_use]
    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub(crate) fn history_mut(&mut self) -> &mut HistoryStore {
        &mut self.history
    }

    /// System description captured at creation
    #[must_use]
    pub fn system_info(&self) -> &SystemInfo {
        &self.system_info
    }
}
