//! cmdterm - shell-like command interpreter
//!
//! CLI entry point for the REPL, the HTTP server and one-shot commands.

#![forbid(unsafe_code)]

use anyhow::Result;
use clap::Parser;
use server::config::LoggingConfig;
use tracing::info;
use tracing_subscriber::{fmt::writer::BoxMakeWriter, layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod cli;
mod server;

const DEFAULT_FILTER: &str = "cmdterm=info,cmdterm_core=info,tower_http=info";
const INTERACTIVE_FILTER: &str = "cmdterm=warn,cmdterm_core=warn";

fn init_tracing(logging: &LoggingConfig, interactive: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if interactive {
            INTERACTIVE_FILTER.into()
        } else {
            logging.filter.as_deref().unwrap_or(DEFAULT_FILTER).into()
        }
    });

    // keep stdout clean for the transcript
    let writer = if interactive {
        BoxMakeWriter::new(std::io::stderr)
    } else {
        BoxMakeWriter::new(std::io::stdout)
    };

    let (json, plain) = if logging.json {
        (Some(tracing_subscriber::fmt::layer().json().with_writer(writer)), None)
    } else {
        (None, Some(tracing_subscriber::fmt::layer().with_writer(writer)))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(json)
        .with(plain)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    let cli = cli::Cli::parse();
    let config = server::load_config()?;

    // `run` prints its result on stdout as well
    let quiet = !matches!(cli.command, Some(cli::Commands::Serve { .. }));
    init_tracing(&config.logging, quiet);

    if !cli.is_interactive() {
        info!("Starting cmdterm v{}", env!("CARGO_PKG_VERSION"));
    }

    cli::run(cli, config).await
}
