//! Built-in command table and handlers

use super::{Dispatcher, Outcome};
use crate::config::{EngineConfig, Surface};
use crate::error::{Error, Result};
use crate::report;
use crate::resolver::PathResolver;
use crate::session::Session;
use chrono::Utc;
use cmdterm_tools::Removed;

/// Built-in commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    /// `pwd`
    Pwd,
    /// `cd [path]`
    Cd,
    /// `ls|dir [path]`
    List,
    /// `mkdir <name>`
    Mkdir,
    /// `rm|rmdir|del <name>`
    Remove,
    /// `monitor|system`
    Monitor,
    /// `help`
    Help,
    /// `clear`
    Clear,
    /// `history`
    History,
    /// `echo [text]`
    Echo,
    /// `date`
    Date,
    /// `whoami`
    Whoami,
    /// `exit|quit`
    Exit,
}

/// When a verb is available
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Availability {
    Always,
    Extras,
    CliOnly,
}

const TABLE: &[(&str, Builtin, Availability)] = &[
    ("pwd", Builtin::Pwd, Availability::Always),
    ("cd", Builtin::Cd, Availability::Always),
    ("ls", Builtin::List, Availability::Always),
    ("dir", Builtin::List, Availability::Always),
    ("mkdir", Builtin::Mkdir, Availability::Always),
    ("rm", Builtin::Remove, Availability::Always),
    ("rmdir", Builtin::Remove, Availability::Always),
    ("del", Builtin::Remove, Availability::Always),
    ("help", Builtin::Help, Availability::Always),
    ("clear", Builtin::Clear, Availability::Always),
    ("history", Builtin::History, Availability::Always),
    ("monitor", Builtin::Monitor, Availability::Always),
    ("system", Builtin::Monitor, Availability::Always),
    ("echo", Builtin::Echo, Availability::Extras),
    ("date", Builtin::Date, Availability::Extras),
    ("whoami", Builtin::Whoami, Availability::Extras),
    ("exit", Builtin::Exit, Availability::CliOnly),
    ("quit", Builtin::Exit, Availability::CliOnly),
];

impl Availability {
    fn enabled(self, config: &EngineConfig) -> bool {
        match self {
            Availability::Always => true,
            Availability::Extras => config.extras,
            Availability::CliOnly => config.surface == Surface::Cli,
        }
    }
}

impl Builtin {
    /// Built-in for a case-folded `verb`, if enabled under `config`
    #[must_use]
    pub fn lookup(verb: &str, config: &EngineConfig) -> Option<Self> {
        TABLE
            .iter()
            .find(|(name, _, availability)| *name == verb && availability.enabled(config))
            .map(|(_, builtin, _)| *builtin)
    }

    /// Enabled verbs in table order
    pub fn verbs(config: &EngineConfig) -> impl Iterator<Item = &'static str> + '_ {
        TABLE
            .iter()
            .filter(move |(_, _, availability)| availability.enabled(config))
            .map(|(name, _, _)| *name)
    }
}

const FAREWELL: &str = "\n👋 Thank you for using cmdterm!\nGoodbye!";

fn required<'a>(args: &[&'a str], usage: &str) -> Result<&'a str> {
    args.first()
        .copied()
        .ok_or_else(|| Error::Usage(usage.to_string()))
}

fn current_user() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string())
}

/// Map a capability error about `token` onto the resolution taxonomy
fn path_error(token: &str, action: &str, e: cmdterm_tools::Error) -> Error {
    match e {
        cmdterm_tools::Error::NotFound(_) => Error::NotFound {
            path: token.to_string(),
        },
        cmdterm_tools::Error::NotADirectory(_) => Error::NotADirectory {
            path: token.to_string(),
        },
        other => Error::failed(action, other),
    }
}

impl Dispatcher {
    pub(super) async fn run_builtin(
        &self,
        builtin: Builtin,
        session: &mut Session,
        args: &[&str],
    ) -> Result<Outcome> {
        let simulated = self.config.is_simulated();
        let marker = if simulated { " (simulated)" } else { "" };
        let resolver = PathResolver::new(self.fs.as_ref());

        let text = match builtin {
            Builtin::Pwd => format!(
                "📍 Current directory: {}{}",
                session.current_dir().display(),
                marker
            ),

            Builtin::Cd => {
                let token = args.first().copied().unwrap_or("~");
                let dir = resolver.change_directory(session, token).await?;
                format!("✅ Changed directory to: {}", dir.display())
            }

            Builtin::List => {
                let token = args.first().copied();
                let target = resolver.listing_target(session, token).await?;
                let shown = token.map_or_else(|| target.display().to_string(), str::to_string);
                let entries = self
                    .fs
                    .list_dir(&target)
                    .await
                    .map_err(|e| path_error(&shown, "listing directory", e))?;
                report::listing(&target, entries, simulated)
            }

            Builtin::Mkdir => {
                let name = required(args, "Please specify directory name")?;
                let path = resolver.resolve(session.current_dir(), name)?;
                self.fs
                    .create_dir(&path)
                    .await
                    .map_err(|e| Error::failed("creating directory", e))?;
                format!("✅ Directory '{}' created successfully{}", path.display(), marker)
            }

            Builtin::Remove => {
                let name = required(args, "Please specify file or directory name")?;
                let path = resolver.resolve(session.current_dir(), name)?;
                let removed = self
                    .fs
                    .remove(&path)
                    .await
                    .map_err(|e| path_error(name, &format!("removing '{}'", name), e))?;
                let what = match removed {
                    Removed::File => "File",
                    Removed::Directory => "Directory",
                };
                format!("✅ {} '{}' removed successfully{}", what, name, marker)
            }

            Builtin::Monitor => report::snapshot(&self.monitor(session).await),

            Builtin::Help => report::help(&self.config),

            Builtin::Clear => return Ok(Outcome::Clear),

            Builtin::History => report::history(session.history(), self.config.history_display),

            Builtin::Echo => format!("🔊 {}", args.join(" ")),

            Builtin::Date => format!("📅 {}", Utc::now().format("%Y-%m-%d %H:%M:%S UTC")),

            Builtin::Whoami => format!("👤 {}{}", current_user(), marker),

            Builtin::Exit => return Ok(Outcome::Exit(FAREWELL.to_string())),
        };

        Ok(Outcome::Text(text))
    }
}
