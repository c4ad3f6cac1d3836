//! Path Resolver
//!
//! Resolves a user-supplied path token against the session's current
//! directory. Normalisation is lexical (`a/./b/../c` → `a/c`); symlinks are
//! not followed, so the current directory keeps the form the user navigated.

use crate::error::{Error, Result};
use crate::session::Session;
use cmdterm_tools::{EntryKind, Filesystem};
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Lexically normalise an absolute path. `..` at the root stays at the root.
#[must_use]
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                // pop() refuses to remove the root
                out.pop();
            }
            Component::Normal(part) => out.push(part),
        }
    }
    out
}

/// Resolves tokens against one filesystem capability
pub struct PathResolver<'a> {
    fs: &'a dyn Filesystem,
}

impl<'a> PathResolver<'a> {
    /// Create a resolver over `fs`
    pub fn new(fs: &'a dyn Filesystem) -> Self {
        Self { fs }
    }

    /// Turn `token` into an absolute path without touching the filesystem.
    ///
    /// `..` is the parent of `cwd`, `~` (and `~/...`) the home directory,
    /// absolute tokens are taken verbatim, anything else is joined to `cwd`.
    pub fn resolve(&self, cwd: &Path, token: &str) -> Result<PathBuf> {
        let resolved = if token == ".." {
            cwd.parent().unwrap_or(cwd).to_path_buf()
        } else if token == "~" || token.starts_with("~/") {
            let home = self.fs.home_dir().ok_or_else(|| Error::NotFound {
                path: token.to_string(),
            })?;
            match token.strip_prefix("~/") {
                Some(rest) => home.join(rest),
                None => home,
            }
        } else if Path::new(token).is_absolute() {
            PathBuf::from(token)
        } else {
            cwd.join(token)
        };
        Ok(normalize(&resolved))
    }

    /// Resolve `token` and require an existing directory there
    pub async fn resolve_dir(&self, cwd: &Path, token: &str) -> Result<PathBuf> {
        let path = self.resolve(cwd, token)?;
        match self.fs.kind(&path).await {
            Ok(Some(EntryKind::Directory)) => Ok(path),
            Ok(Some(EntryKind::File)) => Err(Error::NotADirectory {
                path: token.to_string(),
            }),
            Ok(None) => Err(Error::NotFound {
                path: token.to_string(),
            }),
            Err(e) => Err(Error::failed(format!("accessing '{}'", token), e)),
        }
    }

    /// `cd`: move the session to `token` when it names a directory.
    ///
    /// On failure the session is left untouched.
    pub async fn change_directory(&self, session: &mut Session, token: &str) -> Result<PathBuf> {
        let target = self.resolve_dir(session.current_dir(), token).await?;
        debug!(session_id = %session.id(), cwd = %target.display(), "Changed directory");
        session.set_current_dir(target.clone());
        Ok(target)
    }

    /// `ls`: the directory to list, defaulting to the current directory
    pub async fn listing_target(&self, session: &Session, token: Option<&str>) -> Result<PathBuf> {
        match token {
            Some(token) => self.resolve_dir(session.current_dir(), token).await,
            None => Ok(session.current_dir().to_path_buf()),
        }
    }
}
