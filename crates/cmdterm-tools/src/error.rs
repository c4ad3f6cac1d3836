//! Error types for cmdterm-tools

use std::path::PathBuf;
use thiserror::Error;

/// Capability error type
#[derive(Debug, Error)]
pub enum Error {
    /// Path does not exist
    #[error("not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Path exists but is not a directory
    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// Process could not be spawned or awaited
    #[error("execution failed: {0}")]
    Execution(String),

    /// Timeout
    #[error("timeout after {0}ms")]
    Timeout(u64),

    /// The data source is not available in this deployment
    #[error("unavailable: {0}")]
    Unavailable(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
