use super::{DirEntryInfo, EntryKind, Filesystem, Removed};
use crate::error::{Error, Result};
use chrono::{Local, TimeZone};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Demo tree shown under the simulated root: (name, kind, size, y, m, d, h, min)
const DEMO_ENTRIES: &[(&str, EntryKind, u64, (i32, u32, u32, u32, u32))] = &[
    ("app.py", EntryKind::File, 15_420, (2025, 9, 21, 10, 30)),
    ("templates", EntryKind::Directory, 0, (2025, 9, 21, 10, 25)),
    ("static", EntryKind::Directory, 0, (2025, 9, 21, 10, 25)),
    ("README.md", EntryKind::File, 8_742, (2025, 9, 21, 10, 20)),
    ("requirements.txt", EntryKind::File, 256, (2025, 9, 21, 10, 15)),
];

/// A read-only demo filesystem rooted at one scratch directory.
///
/// Listing the root always shows the same demo entries; creating and
/// removing report success without touching real storage.
#[derive(Debug, Clone)]
pub struct SimulatedFilesystem {
    root: PathBuf,
}

impl SimulatedFilesystem {
    /// Create a simulated tree rooted at `root`
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn demo_entries() -> Vec<DirEntryInfo> {
        DEMO_ENTRIES
            .iter()
            .map(|(name, kind, size, (y, m, d, h, min))| DirEntryInfo {
                name: (*name).to_string(),
                kind: *kind,
                size_bytes: *size,
                modified_at: Local.with_ymd_and_hms(*y, *m, *d, *h, *min, 0).single(),
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl Filesystem for SimulatedFilesystem {
    async fn kind(&self, path: &Path) -> Result<Option<EntryKind>> {
        if path == self.root {
            return Ok(Some(EntryKind::Directory));
        }
        if path.parent() != Some(self.root.as_path()) {
            return Ok(None);
        }
        let name = path.file_name().map(|n| n.to_string_lossy().to_string());
        Ok(DEMO_ENTRIES
            .iter()
            .find(|(entry, _, _, _)| Some(*entry) == name.as_deref())
            .map(|(_, kind, _, _)| *kind))
    }

    async fn list_dir(&self, path: &Path) -> Result<Vec<DirEntryInfo>> {
        match self.kind(path).await? {
            None => Err(Error::NotFound(path.to_path_buf())),
            Some(EntryKind::File) => Err(Error::NotADirectory(path.to_path_buf())),
            Some(EntryKind::Directory) if path == self.root => Ok(Self::demo_entries()),
            Some(EntryKind::Directory) => Ok(Vec::new()),
        }
    }

    async fn create_dir(&self, path: &Path) -> Result<()> {
        debug!(path = %path.display(), "Simulated directory creation");
        Ok(())
    }

    async fn remove(&self, path: &Path) -> Result<Removed> {
        debug!(path = %path.display(), "Simulated removal");
        match self.kind(path).await? {
            Some(EntryKind::Directory) => Ok(Removed::Directory),
            _ => Ok(Removed::File),
        }
    }

    fn home_dir(&self) -> Option<PathBuf> {
        Some(self.root.clone())
    }

    fn is_simulated(&self) -> bool {
        true
    }
}
