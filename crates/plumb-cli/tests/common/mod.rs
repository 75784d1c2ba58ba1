//! Shared test harness for plumb-cli integration tests.
//!
//! Provides process runners and repo setup utilities used by all test
//! files. Environment variables are fully pinned for deterministic output
//! across machines and CI runners.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

// ──────────────────────────── Types ────────────────────────────

/// Captured output from running a command.
pub struct CommandResult {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

// ──────────────────────────── Binary Discovery ────────────────────────────

/// Discover the path to the compiled `plumb` binary.
pub fn plumb_bin() -> PathBuf {
    let mut path = std::env::current_exe()
        .unwrap()
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .to_path_buf();
    path.push("plumb");
    path
}

// ──────────────────────────── Process Runners ────────────────────────────

/// Apply the full set of pinned environment variables to a `Command`.
fn pin_env(cmd: &mut Command) {
    cmd.env("PLUMB_AUTHOR_NAME", "Test Author")
        .env("PLUMB_AUTHOR_EMAIL", "test@example.com")
        .env("PLUMB_AUTHOR_DATE", "1234567890 +0000")
        .env("TZ", "UTC")
        .env("LC_ALL", "C")
        .env_remove("PLUMB_DIR")
        .env_remove("PLUMB_LOG");
}

fn collect(output: std::process::Output) -> CommandResult {
    CommandResult {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        exit_code: output.status.code().unwrap_or(128),
    }
}

/// Run the plumb binary in `dir` with the given arguments.
pub fn plumb(dir: &Path, args: &[&str]) -> CommandResult {
    let mut cmd = Command::new(plumb_bin());
    cmd.args(args).current_dir(dir);
    pin_env(&mut cmd);
    collect(cmd.output().expect("failed to run plumb"))
}

/// Run plumb with piped stdin in `dir`.
pub fn plumb_stdin(dir: &Path, args: &[&str], stdin_bytes: &[u8]) -> CommandResult {
    let mut cmd = Command::new(plumb_bin());
    cmd.args(args)
        .current_dir(dir)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    pin_env(&mut cmd);
    let mut child = cmd.spawn().expect("failed to spawn plumb");
    {
        use std::io::Write;
        // The child may exit before reading stdin (e.g. outside a repository).
        if let Err(e) = child.stdin.take().unwrap().write_all(stdin_bytes) {
            assert_eq!(e.kind(), std::io::ErrorKind::BrokenPipe, "writing stdin: {e}");
        }
    }
    collect(child.wait_with_output().expect("failed to wait on plumb"))
}

/// Run plumb and assert success, returning trimmed stdout.
pub fn plumb_ok(dir: &Path, args: &[&str]) -> String {
    let result = plumb(dir, args);
    assert_eq!(
        result.exit_code, 0,
        "plumb {:?} failed (exit {}):\nstdout: {}\nstderr: {}",
        args, result.exit_code, result.stdout, result.stderr,
    );
    result.stdout.trim_end().to_string()
}

// ──────────────────────────── Repo Setup Helpers ────────────────────────────

/// Write `content` to `rel` under `dir`, creating parent directories.
pub fn write_file(dir: &Path, rel: &str, content: &str) {
    let path = dir.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}

/// Initialize an empty repo. No objects.
pub fn setup_empty_repo(dir: &Path) {
    plumb_ok(dir, &["init", "-q"]);
}

/// Initialize a repo holding `a.txt` = "1" and `b.txt` = "2".
pub fn setup_two_files(dir: &Path) {
    setup_empty_repo(dir);
    write_file(dir, "b.txt", "2");
    write_file(dir, "a.txt", "1");
}

/// Collect every stored object id under the repo's object directory.
pub fn stored_objects(dir: &Path) -> Vec<String> {
    let objects_dir = dir.join(".plumb/objects");
    let mut oids = Vec::new();
    for entry in std::fs::read_dir(&objects_dir).unwrap().flatten() {
        let bucket = entry.file_name().to_string_lossy().to_string();
        if !entry.path().is_dir() || bucket.len() != 2 {
            continue;
        }
        for sub in std::fs::read_dir(entry.path()).unwrap().flatten() {
            oids.push(format!("{bucket}{}", sub.file_name().to_string_lossy()));
        }
    }
    oids.sort();
    oids
}
