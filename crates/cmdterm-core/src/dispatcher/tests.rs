use super::*;
use crate::config::{Profile, Surface};
use cmdterm_tools::{
    DiskUsage, HostInfo, MemoryUsage, ProcessOutput, ProcessSample, Result as ToolResult,
};
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;
use tempfile::TempDir;

/// Runner double that records command lines and echoes them back
#[derive(Default)]
struct MockRunner {
    calls: Mutex<Vec<(String, PathBuf)>>,
}

#[async_trait::async_trait]
impl ProcessRunner for MockRunner {
    async fn run(&self, command_line: &str, cwd: &Path, _timeout: Duration) -> ToolResult<ProcessOutput> {
        self.calls
            .lock()
            .unwrap()
            .push((command_line.to_string(), cwd.to_path_buf()));
        Ok(ProcessOutput {
            stdout: format!("ran: {}", command_line),
            stderr: String::new(),
            exit_code: 0,
        })
    }
}

/// Probe double with fixed readings
struct MockProbe;

#[async_trait::async_trait]
impl SystemProbe for MockProbe {
    fn host_info(&self) -> HostInfo {
        HostInfo {
            platform: "TestOS".to_string(),
            platform_version: "1.0".to_string(),
            architecture: "x86_64".to_string(),
            processor: "test-cpu".to_string(),
        }
    }

    async fn cpu_percent(&self, _window: Duration) -> ToolResult<f32> {
        Ok(42.0)
    }

    async fn memory(&self) -> ToolResult<MemoryUsage> {
        Ok(MemoryUsage {
            total_bytes: 4 * 1024 * 1024 * 1024,
            available_bytes: 3 * 1024 * 1024 * 1024,
            used_bytes: 1024 * 1024 * 1024,
        })
    }

    async fn disk(&self, _path: &Path) -> ToolResult<DiskUsage> {
        Ok(DiskUsage {
            total_bytes: 100,
            used_bytes: 25,
            free_bytes: 75,
        })
    }

    async fn processes(&self, _window: Duration) -> ToolResult<Vec<ProcessSample>> {
        Ok(vec![ProcessSample {
            pid: 7,
            name: "busy".to_string(),
            cpu_percent: Some(90.0),
            memory_percent: Some(3.0),
        }])
    }
}

struct Harness {
    dispatcher: Dispatcher,
    runner: Arc<MockRunner>,
    session: Session,
    _tmp: TempDir,
}

fn harness(profile: Profile, surface: Surface) -> Harness {
    let tmp = TempDir::new().unwrap();
    let config = EngineConfig::for_profile(profile)
        .with_surface(surface)
        .with_start_dir(tmp.path());
    let runner = Arc::new(MockRunner::default());
    let fs: Arc<dyn Filesystem> = match config.filesystem_mode {
        FilesystemMode::Real => Arc::new(LocalFilesystem::new()),
        FilesystemMode::Simulated => Arc::new(SimulatedFilesystem::new(tmp.path())),
    };
    let capabilities = Capabilities {
        fs,
        runner: runner.clone(),
        probe: Arc::new(MockProbe),
    };
    let dispatcher = Dispatcher::new(config, capabilities);
    let session = dispatcher.new_session();
    Harness {
        dispatcher,
        runner,
        session,
        _tmp: tmp,
    }
}

impl Harness {
    async fn text(&mut self, line: &str) -> String {
        match self.dispatcher.dispatch(&mut self.session, line).await {
            Outcome::Text(text) => text,
            other => panic!("expected text for {line:?}, got {other:?}"),
        }
    }

    fn cwd(&self) -> PathBuf {
        self.session.current_dir().to_path_buf()
    }
}

#[tokio::test]
async fn test_pwd_reports_current_directory() {
    let mut h = harness(Profile::Full, Surface::Web);
    let out = h.text("pwd").await;
    assert_eq!(out, format!("📍 Current directory: {}", h.cwd().display()));
}

#[tokio::test]
async fn test_verbs_are_case_insensitive() {
    let mut h = harness(Profile::Full, Surface::Web);
    assert!(h.text("PWD").await.starts_with("📍"));
    assert!(h.runner.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_blank_line_is_recorded() {
    let mut h = harness(Profile::Full, Surface::Web);
    assert_eq!(h.text("   ").await, NO_COMMAND);
    assert_eq!(h.session.history().len(), 1);
}

#[tokio::test]
async fn test_history_records_pre_rewrite_text() {
    let mut h = harness(Profile::Full, Surface::Web);
    h.text("create folder reports").await;

    let last = h.session.history().iter().last().unwrap();
    assert_eq!(last.command, "create folder reports");
    assert!(h.cwd().join("reports").is_dir());
}

#[tokio::test]
async fn test_mkdir_and_rm_usage_errors() {
    let mut h = harness(Profile::Full, Surface::Web);
    assert_eq!(h.text("mkdir").await, "❌ Error: Please specify directory name");
    assert_eq!(
        h.text("rm").await,
        "❌ Error: Please specify file or directory name"
    );
}

#[tokio::test]
async fn test_cd_and_back() {
    let mut h = harness(Profile::Full, Surface::Web);
    let start = h.cwd();
    std::fs::create_dir(start.join("src")).unwrap();

    let out = h.text("cd src").await;
    assert_eq!(out, format!("✅ Changed directory to: {}", start.join("src").display()));

    h.text("cd ..").await;
    assert_eq!(h.cwd(), start);
}

#[tokio::test]
async fn test_cd_into_file_is_rejected() {
    let mut h = harness(Profile::Full, Surface::Web);
    std::fs::write(h.cwd().join("notes.txt"), "hi").unwrap();

    let out = h.text("cd notes.txt").await;
    assert_eq!(out, "❌ Error: 'notes.txt' is not a directory");
}

#[tokio::test]
async fn test_rm_file_and_directory() {
    let mut h = harness(Profile::Full, Surface::Web);
    std::fs::write(h.cwd().join("a.txt"), "x").unwrap();
    std::fs::create_dir(h.cwd().join("empty")).unwrap();

    assert_eq!(h.text("rm a.txt").await, "✅ File 'a.txt' removed successfully");
    assert_eq!(
        h.text("rmdir empty").await,
        "✅ Directory 'empty' removed successfully"
    );
    assert_eq!(h.text("del ghost").await, "❌ Error: 'ghost' not found");
}

#[tokio::test]
async fn test_ls_missing_target() {
    let mut h = harness(Profile::Full, Surface::Web);
    assert_eq!(h.text("ls nowhere").await, "❌ Error: 'nowhere' not found");
}

#[tokio::test]
async fn test_passthrough_uses_working_text_and_cwd() {
    let mut h = harness(Profile::Full, Surface::Web);
    let out = h.text("git   Status --short").await;
    assert_eq!(out, "ran: git   Status --short");

    let calls = h.runner.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].1, h.cwd());
}

#[tokio::test]
async fn test_move_phrase_becomes_passthrough_mv() {
    let mut h = harness(Profile::Full, Surface::Web);
    let out = h.text("move file notes.txt to archive").await;
    assert_eq!(out, "ran: mv notes.txt archive");
}

#[tokio::test]
async fn test_denied_passthrough_never_runs() {
    let mut h = harness(Profile::Full, Surface::Web);
    let out = h.text("sudo RM -RF /tmp").await;
    assert_eq!(out, "❌ Error: Command not allowed for security reasons");
    assert!(h.runner.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_clear_and_exit_outcomes() {
    let mut web = harness(Profile::Full, Surface::Web);
    assert_eq!(
        web.dispatcher.dispatch(&mut web.session, "clear").await,
        Outcome::Clear
    );
    // exit is not a built-in on the web surface
    assert_eq!(web.text("exit").await, "ran: exit");

    let mut cli = harness(Profile::Full, Surface::Cli);
    assert!(matches!(
        cli.dispatcher.dispatch(&mut cli.session, "QUIT").await,
        Outcome::Exit(_)
    ));
}

#[tokio::test]
async fn test_execute_reply_renders_clear_marker() {
    let mut h = harness(Profile::Full, Surface::Web);
    let reply = h.dispatcher.execute(&mut h.session, "clear").await;
    assert_eq!(reply.output, CLEAR_MARKER);
    assert_eq!(reply.current_dir, h.cwd().display().to_string());
    assert_eq!(reply.system_info.platform, "TestOS");
}

#[tokio::test]
async fn test_monitor_uses_probe() {
    let mut h = harness(Profile::Full, Surface::Web);
    let snapshot = h.dispatcher.monitor(&h.session).await;
    assert!(!snapshot.is_fallback());
    assert_eq!(snapshot.cpu_percent, 42.0);
    assert_eq!(snapshot.memory.percent, 25.0);
    assert_eq!(snapshot.disk.percent, 25.0);

    let out = h.text("system").await;
    assert!(out.contains("🔥 CPU Usage: 42.0%"));
    assert!(out.contains("1. busy"));
}

#[tokio::test]
async fn test_history_command_lists_recent() {
    let mut h = harness(Profile::Full, Surface::Web);
    h.text("pwd").await;
    let out = h.text("history").await;
    assert!(out.contains("📚 COMMAND HISTORY:"));
    assert!(out.contains(" 1. "));
    assert!(out.contains("- pwd\n"));
    assert!(out.contains(" 2. "));
}

#[tokio::test]
async fn test_autocomplete_verbs_then_entries() {
    let h = harness(Profile::Full, Surface::Web);
    std::fs::create_dir(h.cwd().join("hello_dir")).unwrap();

    let suggestions = h.dispatcher.autocomplete(&h.session, "H").await;
    assert_eq!(suggestions, vec!["help", "history", "hello_dir"]);

    let all = h.dispatcher.autocomplete(&h.session, "").await;
    assert_eq!(all.len(), AUTOCOMPLETE_LIMIT);
    assert!(!all.contains(&"hello_dir".to_string()));
}

#[tokio::test]
async fn test_restricted_profile_behaviour() {
    let mut h = harness(Profile::Restricted, Surface::Web);

    assert!(h.text("pwd").await.ends_with("(simulated)"));
    assert_eq!(h.text("echo hello   world").await, "🔊 hello world");
    assert!(h.text("date").await.ends_with(" UTC"));

    let listing = h.text("ls").await;
    assert!(listing.contains("app.py"));
    assert!(listing.contains("15,420 bytes"));

    let out = h.text("mkdir reports").await;
    assert!(out.contains("created successfully (simulated)"));
    assert!(!h.cwd().join("reports").exists());

    let out = h.text("git status").await;
    assert_eq!(
        out,
        "❌ Command 'git' not available in this environment. Type 'help' for available commands."
    );
    assert!(h.runner.calls.lock().unwrap().is_empty());

    assert_eq!(h.text("uname -a").await, "ran: uname -a");
}

#[tokio::test]
async fn test_restricted_has_no_move_rewrite() {
    let mut h = harness(Profile::Restricted, Surface::Web);
    // not rewritten to mv, so the allowlist sees the verb "move"
    let out = h.text("move file a.txt to b").await;
    assert!(out.contains("'move' not available"));
}

#[tokio::test]
async fn test_relative_start_dir_is_resolved_once() {
    let settings = crate::config::EngineSettings {
        profile: Profile::Restricted,
        start_dir: Some("scratch".to_string()),
        ..Default::default()
    };
    let dispatcher = Dispatcher::from_config(settings.resolve());
    let mut session = dispatcher.new_session();

    let start = session.current_dir().to_path_buf();
    assert!(start.is_absolute());
    assert!(start.ends_with("scratch"));

    // the simulated root and the session agree on where they start
    let listing = dispatcher.dispatch(&mut session, "ls").await.into_text();
    assert!(listing.contains("app.py"), "{}", listing);

    dispatcher.dispatch(&mut session, "cd ~").await;
    assert_eq!(session.current_dir(), start.as_path());
}
