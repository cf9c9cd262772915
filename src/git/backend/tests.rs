// gitbackup: Git Clone Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{GitBackend, ShellBackend};
use crate::core::process::builder::ProcessBuilder;
use crate::error::{BackupError, GitError};
use std::path::Path;
use std::process::Command;
use std::time::Duration;
use tempfile::TempDir;

const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("failed to create temp dir")
}

fn git_available() -> bool {
    ProcessBuilder::find("git").is_some()
}

/// Helper to run git commands in a directory
fn run_git(args: &[&str], cwd: &Path) -> bool {
    Command::new("git")
        .args(args)
        .current_dir(cwd)
        .env("GIT_AUTHOR_NAME", "Test")
        .env("GIT_AUTHOR_EMAIL", "test@test.com")
        .env("GIT_COMMITTER_NAME", "Test")
        .env("GIT_COMMITTER_EMAIL", "test@test.com")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Create a repo with a single committed README.md
fn init_source_repo(dir: &Path) {
    assert!(run_git(&["init", "-q"], dir));
    std::fs::write(dir.join("README.md"), "# Test").expect("write README");
    assert!(run_git(&["add", "README.md"], dir));
    assert!(run_git(&["commit", "-q", "-m", "Initial commit"], dir));
}

fn url_of(path: &Path) -> String {
    path.to_str().expect("utf-8 temp path").to_string()
}

#[tokio::test]
async fn test_probe_reachable_local_repository() {
    if !git_available() {
        return;
    }
    let source = temp_dir();
    init_source_repo(source.path());

    let reachable = ShellBackend::default()
        .probe(&url_of(source.path()), PROBE_TIMEOUT)
        .await
        .expect("probe should run");
    assert!(reachable);
}

#[tokio::test]
async fn test_probe_missing_repository_is_unreachable() {
    if !git_available() {
        return;
    }
    let temp = temp_dir();
    let missing = temp.path().join("does-not-exist");

    let reachable = ShellBackend::default()
        .probe(&url_of(&missing), PROBE_TIMEOUT)
        .await
        .expect("probe should run");
    assert!(!reachable);
}

#[tokio::test]
async fn test_probe_option_like_url_is_not_an_option() {
    if !git_available() {
        return;
    }
    let reachable = ShellBackend::default()
        .probe("--upload-pack=touch /tmp/gitbackup-pwned", PROBE_TIMEOUT)
        .await
        .expect("probe should run");
    assert!(!reachable);
}

#[tokio::test]
async fn test_clone_local_repository() {
    if !git_available() {
        return;
    }
    let source = temp_dir();
    init_source_repo(source.path());
    let dest = temp_dir();
    let target = dest.path().join("copy");

    ShellBackend::default()
        .clone_repo(&url_of(source.path()), &target)
        .await
        .expect("clone should succeed");

    assert!(target.join(".git").is_dir());
    assert_eq!(
        std::fs::read_to_string(target.join("README.md")).expect("read README"),
        "# Test"
    );
}

#[tokio::test]
async fn test_clone_repo_non_empty_directory_fails() {
    if !git_available() {
        return;
    }
    let source = temp_dir();
    init_source_repo(source.path());
    let dest = temp_dir();
    std::fs::write(dest.path().join("occupied.txt"), "x").expect("write file");

    let err = ShellBackend::default()
        .clone_repo(&url_of(source.path()), dest.path())
        .await
        .expect_err("clone should fail");

    match err {
        BackupError::Git(git) => match *git {
            GitError::CloneFailed {
                exit_status,
                captured_output,
                ..
            } => {
                assert_ne!(exit_status, 0);
                assert!(
                    captured_output.contains("already exists"),
                    "unexpected output: {captured_output}"
                );
            }
            other => panic!("unexpected git error: {other}"),
        },
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_missing_program_is_launch_failure() {
    let backend = ShellBackend::new("gitbackup-no-such-git-12345");

    let err = backend
        .probe("https://example.com/r.git", PROBE_TIMEOUT)
        .await
        .expect_err("probe should fail to launch");
    assert!(matches!(err, BackupError::Git(ref g) if matches!(**g, GitError::Launch(_))));

    let temp = temp_dir();
    let err = backend
        .clone_repo("https://example.com/r.git", &temp.path().join("r"))
        .await
        .expect_err("clone should fail to launch");
    assert!(matches!(err, BackupError::Git(ref g) if matches!(**g, GitError::Launch(_))));
}

#[cfg(unix)]
#[tokio::test]
async fn test_probe_timeout_is_unreachable() {
    use std::os::unix::fs::PermissionsExt;

    let temp = temp_dir();
    let script = temp.path().join("hanging-git");
    std::fs::write(&script, "#!/bin/sh\nsleep 30\n").expect("write script");
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755))
        .expect("chmod script");

    let started = std::time::Instant::now();
    let reachable = ShellBackend::new(url_of(&script))
        .probe("https://example.com/r.git", Duration::from_secs(1))
        .await
        .expect("timeout is not a launch failure");

    assert!(!reachable);
    assert!(started.elapsed() < Duration::from_secs(10));
}
