use super::{DirEntryInfo, EntryKind, Filesystem, Removed};
use crate::error::{Error, Result};
use chrono::{DateTime, Local};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// The real disk, through `tokio::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem handle
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl Filesystem for LocalFilesystem {
    async fn kind(&self, path: &Path) -> Result<Option<EntryKind>> {
        match tokio::fs::metadata(path).await {
            Ok(meta) if meta.is_dir() => Ok(Some(EntryKind::Directory)),
            Ok(_) => Ok(Some(EntryKind::File)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::Io(e)),
        }
    }

    async fn list_dir(&self, path: &Path) -> Result<Vec<DirEntryInfo>> {
        match self.kind(path).await? {
            None => return Err(Error::NotFound(path.to_path_buf())),
            Some(EntryKind::File) => return Err(Error::NotADirectory(path.to_path_buf())),
            Some(EntryKind::Directory) => {}
        }

        debug!(path = %path.display(), "Listing directory");
        let mut entries = Vec::new();
        let mut dir = tokio::fs::read_dir(path).await?;

        while let Some(entry) = dir.next_entry().await? {
            // follow symlinks like a plain stat would; dangling links fall back to lstat
            let meta = match tokio::fs::metadata(entry.path()).await {
                Ok(meta) => meta,
                Err(_) => entry.metadata().await?,
            };
            let kind = if meta.is_dir() {
                EntryKind::Directory
            } else {
                EntryKind::File
            };
            entries.push(DirEntryInfo {
                name: entry.file_name().to_string_lossy().to_string(),
                kind,
                size_bytes: if meta.is_dir() { 0 } else { meta.len() },
                modified_at: meta.modified().ok().map(DateTime::<Local>::from),
            });
        }

        Ok(entries)
    }

    async fn create_dir(&self, path: &Path) -> Result<()> {
        tokio::fs::create_dir_all(path).await?;
        Ok(())
    }

    async fn remove(&self, path: &Path) -> Result<Removed> {
        match self.kind(path).await? {
            None => Err(Error::NotFound(path.to_path_buf())),
            Some(EntryKind::Directory) => {
                tokio::fs::remove_dir(path).await?;
                Ok(Removed::Directory)
            }
            Some(EntryKind::File) => {
                tokio::fs::remove_file(path).await?;
                Ok(Removed::File)
            }
        }
    }

    fn home_dir(&self) -> Option<PathBuf> {
        dirs::home_dir()
    }
}
