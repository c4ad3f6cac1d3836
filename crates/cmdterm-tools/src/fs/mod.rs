//! Filesystem capability - directory listing and mutation
//!
//! Two implementations share the [`Filesystem`] trait:
//! - [`LocalFilesystem`]: the real disk
//! - [`SimulatedFilesystem`]: a fixed demo tree whose mutations report success
//!   without touching storage (restricted deployments)

mod local;
mod simulated;


pub use local::LocalFilesystem;
pub use simulated::SimulatedFilesystem;

use crate::error::Result;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Kind of a directory entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Sub-directory (sorts first)
    Directory,
    /// Regular file (or anything that is not a directory)
    File,
}

impl EntryKind {
    /// Lowercase label used in listings
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Directory => "directory",
            Self::File => "file",
        }
    }
}

/// One row of a directory listing. Produced on demand, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirEntryInfo {
    /// File name (no directory part)
    pub name: String,
    /// File or directory
    pub kind: EntryKind,
    /// Size in bytes, `0` for directories
    pub size_bytes: u64,
    /// Last modification time, when the platform reports one
    pub modified_at: Option<DateTime<Local>>,
}

/// What `remove` deleted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removed {
    /// A file was removed
    File,
    /// An (empty) directory was removed
    Directory,
}

/// Filesystem operations the engine needs.
#[async_trait::async_trait]
pub trait Filesystem: Send + Sync {
    /// Kind of the entry at `path`, `None` when nothing exists there
    async fn kind(&self, path: &Path) -> Result<Option<EntryKind>>;

    /// Entries of the directory at `path`, in platform order
    async fn list_dir(&self, path: &Path) -> Result<Vec<DirEntryInfo>>;

    /// Create `path` and any missing parents; existing directories are fine
    async fn create_dir(&self, path: &Path) -> Result<()>;

    /// Remove a file or an empty directory
    async fn remove(&self, path: &Path) -> Result<Removed>;

    /// The user's home directory
    fn home_dir(&self) -> Option<PathBuf>;

    /// Whether mutations are only pretended
    fn is_simulated(&self) -> bool {
        false
    }
}
