//! Error types for cmdterm-core
//!
//! Every failure a built-in can hit is one of these variants. None of them
//! escape the dispatcher: [`UserFriendlyError::user_message`] turns each into
//! the transcript line the user sees.

use thiserror::Error;

/// Why a passthrough command was refused
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DenyReason {
    /// The command line contains a denylisted substring
    Denylisted(String),
    /// The verb is not on the allowlist of a restricted deployment
    NotAllowlisted(String),
}

/// Core error type
#[derive(Debug, Error)]
pub enum Error {
    /// Path resolution found nothing
    #[error("not found: {path}")]
    NotFound {
        /// The path or token the user gave
        path: String,
    },

    /// Path exists but a directory was required
    #[error("not a directory: {path}")]
    NotADirectory {
        /// The path or token the user gave
        path: String,
    },

    /// Missing required argument
    #[error("usage: {0}")]
    Usage(String),

    /// Passthrough command refused by the execution gate
    #[error("command denied: {0:?}")]
    Denied(DenyReason),

    /// Passthrough command exceeded its deadline
    #[error("command timed out after {secs}s")]
    TimedOut {
        /// Deadline that was exceeded
        secs: u64,
    },

    /// An external data source failed or is not available
    #[error("{0}")]
    CollaboratorUnavailable(String),

    /// A capability call failed while performing `action`
    #[error("{action} failed: {source}")]
    Failed {
        /// What the handler was doing ("creating directory", ...)
        action: String,
        /// Underlying capability error
        #[source]
        source: cmdterm_tools::Error,
    },
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Wrap a capability error raised while performing `action`
    pub fn failed(action: impl Into<String>, source: cmdterm_tools::Error) -> Self {
        Self::Failed {
            action: action.into(),
            source,
        }
    }
}

/// Trait for user-friendly error messages
///
/// Provides the prefixed, human-readable line shown in the transcript.
pub trait UserFriendlyError {
    /// Get a user-friendly error message
    fn user_message(&self) -> String;
}

impl UserFriendlyError for Error {
    fn user_message(&self) -> String {
        match self {
            Error::NotFound { path } => format!("❌ Error: '{}' not found", path),
            Error::NotADirectory { path } => format!("❌ Error: '{}' is not a directory", path),
            Error::Usage(msg) => format!("❌ Error: {}", msg),
            Error::Denied(DenyReason::Denylisted(_)) => {
                "❌ Error: Command not allowed for security reasons".to_string()
            }
            Error::Denied(DenyReason::NotAllowlisted(verb)) => format!(
                "❌ Command '{}' not available in this environment. Type 'help' for available commands.",
                verb
            ),
            Error::TimedOut { secs } => format!("❌ Error: Command timed out after {}s", secs),
            Error::CollaboratorUnavailable(msg) => format!("⚠️  Unavailable: {}", msg),
            Error::Failed { action, source } => format!("❌ Error {}: {}", action, source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_prefixed() {
        let errors = [
            Error::NotFound {
                path: "docs".to_string(),
            },
            Error::NotADirectory {
                path: "a.txt".to_string(),
            },
            Error::Usage("Please specify directory name".to_string()),
            Error::Denied(DenyReason::Denylisted("rm -rf".to_string())),
            Error::TimedOut { secs: 30 },
        ];

        for err in &errors {
            assert!(err.user_message().starts_with("❌"), "{:?}", err);
        }
    }

    #[test]
    fn test_not_found_names_path() {
        let err = Error::NotFound {
            path: "nonexistent_xyz".to_string(),
        };
        assert!(err.user_message().contains("nonexistent_xyz"));
    }

    #[test]
    fn test_not_allowlisted_message() {
        let err = Error::Denied(DenyReason::NotAllowlisted("git".to_string()));
        let msg = err.user_message();
        assert!(msg.contains("'git'"));
        assert!(msg.contains("not available"));
    }

    #[test]
    fn test_failed_wraps_source() {
        let err = Error::failed(
            "removing 'x'",
            cmdterm_tools::Error::Execution("boom".to_string()),
        );
        assert_eq!(err.user_message(), "❌ Error removing 'x': execution failed: boom");
    }

    #[test]
    fn test_collaborator_unavailable_keeps_reason() {
        let err = Error::CollaboratorUnavailable("unavailable: off".to_string());
        assert_eq!(err.to_string(), "unavailable: off");
        assert_eq!(err.user_message(), "⚠️  Unavailable: unavailable: off");
    }
}
