use super::*;
use crate::error::Error;
use std::time::{Duration, Instant};

#[cfg(unix)]
#[tokio::test]
async fn test_runner_captures_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let runner = ShellRunner::new();

    let output = runner
        .run("echo hello", dir.path(), Duration::from_secs(5))
        .await
        .unwrap();

    assert_eq!(output.stdout, "hello\n");
    assert!(output.stderr.is_empty());
    assert!(output.success());
}

#[cfg(unix)]
#[tokio::test]
async fn test_runner_captures_stderr_and_exit_code() {
    let dir = tempfile::tempdir().unwrap();
    let runner = ShellRunner::new();

    let output = runner
        .run("echo oops 1>&2; exit 3", dir.path(), Duration::from_secs(5))
        .await
        .unwrap();

    assert_eq!(output.stderr.trim(), "oops");
    assert_eq!(output.exit_code, 3);
    assert!(!output.success());
}

#[cfg(unix)]
#[tokio::test]
async fn test_runner_uses_working_directory() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("marker.txt"), "x").unwrap();
    let runner = ShellRunner::new();

    let output = runner
        .run("ls", dir.path(), Duration::from_secs(5))
        .await
        .unwrap();

    assert!(output.stdout.contains("marker.txt"));
}

#[cfg(unix)]
#[tokio::test]
async fn test_runner_times_out() {
    let dir = tempfile::tempdir().unwrap();
    let runner = ShellRunner::new();

    let start = Instant::now();
    let result = runner
        .run("sleep 5", dir.path(), Duration::from_millis(200))
        .await;

    assert!(matches!(result, Err(Error::Timeout(200))));
    assert!(start.elapsed() < Duration::from_secs(4));
}

#[cfg(unix)]
#[tokio::test]
async fn test_runner_timeout_kills_forked_children() {
    let dir = tempfile::tempdir().unwrap();
    let marker = dir.path().join("still_running");
    let runner = ShellRunner::new();

    // the subshell keeps stdout open, so the shell alone being killed is not enough
    let line = format!("(sleep 1; touch '{}'); true", marker.display());
    let result = runner
        .run(&line, dir.path(), Duration::from_millis(200))
        .await;
    assert!(matches!(result, Err(Error::Timeout(200))));

    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert!(!marker.exists(), "forked child outlived the timeout");
}

#[tokio::test]
async fn test_runner_reports_spawn_failure() {
    let dir = tempfile::tempdir().unwrap();
    let runner = ShellRunner::with_shell("cmdterm-no-such-shell", "-c");

    let result = runner
        .run("echo hi", dir.path(), Duration::from_secs(1))
        .await;

    assert!(matches!(result, Err(Error::Execution(_))));
}
