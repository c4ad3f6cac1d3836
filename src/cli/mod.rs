//! CLI module for cmdterm
//!
//! Provides the commands:
//! - `repl`: interactive terminal (default)
//! - `serve`: HTTP server
//! - `run`: dispatch a single line and print the result
//! - `config`: print the effective configuration

use crate::server::config::AppConfig;
use clap::{Parser, Subcommand, ValueEnum};
use cmdterm_core::{Dispatcher, Outcome, Profile, Surface};

pub mod repl;

/// Shell-like command interpreter
#[derive(Parser, Debug)]
#[command(name = "cmdterm")]
#[command(about = "Shell-like command interpreter with natural-language shortcuts")]
#[command(version)]
pub struct Cli {
    /// Capability profile (overrides the configured one)
    #[arg(long, global = true, value_enum)]
    pub profile: Option<ProfileArg>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Interactive terminal (default)
    Repl,
    /// Start the HTTP server
    Serve {
        /// Address to bind
        #[arg(long)]
        host: Option<String>,
        /// Port to bind
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run one command line and print the result
    Run {
        /// Command words, joined with spaces
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        words: Vec<String>,
    },
    /// Print the effective configuration as TOML
    Config,
}

/// `--profile` values
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProfileArg {
    Full,
    Restricted,
}

impl From<ProfileArg> for Profile {
    fn from(arg: ProfileArg) -> Self {
        match arg {
            ProfileArg::Full => Profile::Full,
            ProfileArg::Restricted => Profile::Restricted,
        }
    }
}

impl Cli {
    /// Whether this invocation is the interactive REPL
    pub fn is_interactive(&self) -> bool {
        matches!(self.command, None | Some(Commands::Repl))
    }
}

/// Run the CLI command
pub async fn run(cli: Cli, config: AppConfig) -> anyhow::Result<()> {
    let mut config = config.with_profile(cli.profile.map(Profile::from));

    match cli.command {
        None | Some(Commands::Repl) => repl::run(&config).await,
        Some(Commands::Serve { host, port }) => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            crate::server::run(config).await
        }
        Some(Commands::Run { words }) => {
            let engine = Dispatcher::from_config(config.engine_config().with_surface(Surface::Cli));
            let mut session = engine.new_session();
            match engine.dispatch(&mut session, &words.join(" ")).await {
                Outcome::Text(text) | Outcome::Exit(text) => println!("{}", text),
                Outcome::Clear => repl::clear_screen()?,
            }
            Ok(())
        }
        Some(Commands::Config) => {
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_repl() {
        let cli = Cli::parse_from(["cmdterm"]);
        assert!(cli.is_interactive());
        assert!(cli.profile.is_none());
    }

    #[test]
    fn test_serve_flags_and_global_profile() {
        let cli = Cli::parse_from(["cmdterm", "serve", "--port", "8080", "--profile", "restricted"]);
        assert!(!cli.is_interactive());
        assert_eq!(cli.profile, Some(ProfileArg::Restricted));
        match cli.command {
            Some(Commands::Serve { host, port }) => {
                assert_eq!(host, None);
                assert_eq!(port, Some(8080));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_run_collects_words() {
        let cli = Cli::parse_from(["cmdterm", "run", "ls", "-la", "/tmp"]);
        match cli.command {
            Some(Commands::Run { words }) => assert_eq!(words, vec!["ls", "-la", "/tmp"]),
            other => panic!("unexpected {other:?}"),
        }
    }
}
