//! cmdterm Core - command interpretation and execution engine
//!
//! This crate turns a raw line of user text into an effect and a textual result:
//! - Session: current directory, bounded history and system description
//! - Rewriter: natural-language phrasings to canonical commands
//! - Dispatcher: built-in table with passthrough to the execution gate
//! - Gate: denylist/allowlist and deadline around shell execution
//! - Monitor: resource snapshots with a labelled fallback

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod gate;
pub mod history;
pub mod monitor;
pub mod report;
pub mod resolver;
pub mod rewriter;
pub mod session;

pub use config::{EngineConfig, EngineSettings, ExecMode, FilesystemMode, Profile, Surface};
pub use dispatcher::{
    Builtin, Capabilities, Dispatcher, Outcome, Reply, AUTOCOMPLETE_LIMIT, CLEAR_MARKER,
};
pub use error::{DenyReason, Error, Result, UserFriendlyError};
pub use gate::{ExecReport, ExecutionGate};
pub use history::{HistoryEntry, HistoryStore};
pub use monitor::{MonitoringAssembler, MonitoringSnapshot, SnapshotSource};
pub use resolver::PathResolver;
pub use rewriter::{PatternRule, Rewriter, RuleKind};
pub use session::{Session, SystemInfo};

/// Crate version, reported as the runtime version of every session
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
