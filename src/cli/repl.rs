//! Interactive REPL
//!
//! Line editing, tab completion and the persistent line history come from
//! `rustyline`. Completion candidates are the engine's autocomplete results.

use crate::server::config::{AppConfig, ReplConfig};
use anyhow::{Context as _, Result};
use cmdterm_core::{Dispatcher, Outcome, Session, Surface, SystemInfo};
use crossterm::{
    cursor::MoveTo,
    execute,
    terminal::{Clear, ClearType},
};
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Config, Context, Editor, Helper};
use std::io;
use std::path::Path;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::Mutex;
use tracing::{debug, warn};

const EXIT_MESSAGE: &str = "\n👋 Exiting cmdterm...\nGoodbye!";

/// rustyline helper completing through the engine
struct ReplHelper {
    dispatcher: Arc<Dispatcher>,
    session: Arc<Mutex<Session>>,
    runtime: Handle,
}

impl Helper for ReplHelper {}
impl Hinter for ReplHelper {
    type Hint = String;
}
impl Highlighter for ReplHelper {}
impl Validator for ReplHelper {}

impl Completer for ReplHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let head = &line[..pos];
        let start = head
            .rfind(char::is_whitespace)
            .map(|i| i + 1)
            .unwrap_or(0);
        let word = &head[start..];

        // readline runs inside block_in_place, so blocking on the runtime is allowed
        let suggestions = self.runtime.block_on(async {
            let session = self.session.lock().await;
            self.dispatcher.autocomplete(&session, word).await
        });

        let candidates = suggestions
            .into_iter()
            .map(|s| Pair {
                display: s.clone(),
                replacement: s,
            })
            .collect();
        Ok((start, candidates))
    }
}

/// Clear the visible terminal
pub fn clear_screen() -> Result<()> {
    execute!(io::stdout(), Clear(ClearType::All), MoveTo(0, 0))
        .context("Failed to clear terminal")
}

fn print_banner(info: &SystemInfo) {
    let rule = "=".repeat(70);
    println!("{}", rule);
    println!("🖥️  CMDTERM - COMMAND TERMINAL");
    println!("{}", rule);
    println!("System: {} {}", info.platform, info.platform_version);
    println!("Runtime: {}", info.runtime_version);
    println!("Architecture: {}", info.architecture);
    println!();
    println!("📋 Available Commands:");
    println!("  pwd, cd, ls/dir, mkdir, rm/del, monitor, help, clear, history, exit");
    println!();
    println!("🤖 Natural Language Support:");
    println!("  'create folder test', 'list files', 'show system info'");
    println!("{}", rule);
    println!();
}

/// Prompt path: home shown as `~`, long paths cut to their tail
fn prompt_dir(dir: &Path, home: Option<&Path>, width: usize) -> String {
    let shown = match home.and_then(|home| dir.strip_prefix(home).ok()) {
        Some(rest) if rest.as_os_str().is_empty() => "~".to_string(),
        Some(rest) => format!("~/{}", rest.display()),
        None => dir.display().to_string(),
    };

    let len = shown.chars().count();
    if width > 3 && len > width {
        let tail: String = shown.chars().skip(len - (width - 3)).collect();
        format!("...{}", tail)
    } else {
        shown
    }
}

fn open_editor(
    repl: &ReplConfig,
    helper: ReplHelper,
) -> Result<Editor<ReplHelper, DefaultHistory>> {
    let config = Config::builder()
        .max_history_size(repl.history_limit)
        .context("Invalid history limit")?
        .auto_add_history(false)
        .build();
    let mut editor = Editor::with_config(config).context("Failed to initialise line editor")?;
    editor.set_helper(Some(helper));

    if let Some(path) = repl.history_path() {
        if let Err(e) = editor.load_history(&path) {
            debug!(path = %path.display(), error = %e, "No line history loaded");
        }
    }
    Ok(editor)
}

/// Run the interactive terminal until `exit`, Ctrl-C or Ctrl-D
pub async fn run(config: &AppConfig) -> Result<()> {
    let dispatcher = Arc::new(Dispatcher::from_config(
        config.engine_config().with_surface(Surface::Cli),
    ));
    let session = Arc::new(Mutex::new(dispatcher.new_session()));
    let home = dirs::home_dir();

    let helper = ReplHelper {
        dispatcher: dispatcher.clone(),
        session: session.clone(),
        runtime: Handle::current(),
    };
    let mut editor = open_editor(&config.repl, helper)?;

    let system_info = session.lock().await.system_info().clone();
    print_banner(&system_info);

    loop {
        let prompt = {
            let session = session.lock().await;
            format!(
                "\ncmdterm {} $ ",
                prompt_dir(session.current_dir(), home.as_deref(), config.repl.prompt_width)
            )
        };

        match tokio::task::block_in_place(|| editor.readline(&prompt)) {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                if let Err(e) = editor.add_history_entry(line.as_str()) {
                    debug!(error = %e, "Line not added to history");
                }

                let outcome = {
                    let mut session = session.lock().await;
                    dispatcher.dispatch(&mut session, &line).await
                };

                match outcome {
                    Outcome::Text(text) => println!("{}", text),
                    Outcome::Clear => {
                        clear_screen()?;
                        print_banner(&system_info);
                    }
                    Outcome::Exit(farewell) => {
                        println!("{}", farewell);
                        break;
                    }
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                println!("{}", EXIT_MESSAGE);
                break;
            }
            Err(e) => {
                warn!(error = %e, "Line editor failed");
                break;
            }
        }
    }

    if let Some(path) = config.repl.history_path() {
        if let Err(e) = editor.save_history(&path) {
            warn!(path = %path.display(), error = %e, "Failed to save line history");
        }
    }
    Ok(())
}
