//! cmdterm Tools - OS capabilities used by the command engine
//!
//! This crate provides the collaborators the engine calls as opaque capabilities:
//! - Filesystem: listing, creating and removing entries (real or simulated)
//! - Exec: running a command line through the OS shell with a hard timeout
//! - Probe: CPU, memory, disk and process statistics

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod exec;
pub mod fs;
pub mod probe;

pub use error::{Error, Result};
pub use exec::{ProcessOutput, ProcessRunner, ShellRunner};
pub use fs::{DirEntryInfo, EntryKind, Filesystem, LocalFilesystem, Removed, SimulatedFilesystem};
pub use probe::{
    DiskUsage, HostInfo, MemoryUsage, ProcessSample, SysinfoProbe, SystemProbe, UnavailableProbe,
};
