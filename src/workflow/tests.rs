// gitbackup: Git Clone Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{
    CloneRequest, CloneWorkflow, FailureKind, MSG_MISSING_FIELDS, MSG_SUCCESS, MSG_UNREACHABLE,
    WorkflowState, compute_target_directory, repository_name,
};
use crate::error::{BackupResult, GitError, ProcessError, ValidationError};
use crate::git::GitBackend;
use crate::logging::activity::ActivityLog;
use crate::settings::{LastUsedSettings, SettingsStore};
use chrono::{NaiveDate, NaiveDateTime};
use futures_util::future::BoxFuture;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;
use tempfile::TempDir;

const URL: &str = "https://github.com/owner/repo.git";

#[derive(Debug, Clone, Copy)]
enum ProbeOutcome {
    Reachable,
    Unreachable,
    LaunchFails,
    Panics,
}

#[derive(Debug, Clone, Copy)]
enum CloneOutcome {
    Succeeds,
    /// Writes a partial checkout, then exits non-zero
    ExitsWith(i32),
}

/// Records calls and produces scripted outcomes
#[derive(Debug)]
struct FakeBackend {
    probe: ProbeOutcome,
    clone: CloneOutcome,
    probed: Mutex<Vec<String>>,
    cloned: Mutex<Vec<(String, PathBuf)>>,
}

impl FakeBackend {
    fn new(probe: ProbeOutcome, clone: CloneOutcome) -> Self {
        Self {
            probe,
            clone,
            probed: Mutex::new(Vec::new()),
            cloned: Mutex::new(Vec::new()),
        }
    }

    fn probed(&self) -> Vec<String> {
        self.probed.lock().unwrap().clone()
    }

    fn cloned(&self) -> Vec<(String, PathBuf)> {
        self.cloned.lock().unwrap().clone()
    }
}

impl GitBackend for FakeBackend {
    fn probe<'a>(&'a self, url: &'a str, _timeout: Duration) -> BoxFuture<'a, BackupResult<bool>> {
        Box::pin(async move {
            self.probed.lock().unwrap().push(url.to_string());
            match self.probe {
                ProbeOutcome::Reachable => Ok(true),
                ProbeOutcome::Unreachable => Ok(false),
                ProbeOutcome::LaunchFails => Err(GitError::Launch(ProcessError::ExecutableNotFound {
                    name: "git".to_string(),
                })
                .into()),
                ProbeOutcome::Panics => panic!("probe exploded"),
            }
        })
    }

    fn clone_repo<'a>(
        &'a self,
        url: &'a str,
        target: &'a Path,
    ) -> BoxFuture<'a, BackupResult<()>> {
        Box::pin(async move {
            self.cloned
                .lock()
                .unwrap()
                .push((url.to_string(), target.to_path_buf()));
            std::fs::create_dir_all(target.join(".git")).unwrap();
            std::fs::write(target.join(".git/HEAD"), "ref: refs/heads/main\n").unwrap();
            match self.clone {
                CloneOutcome::Succeeds => {
                    std::fs::write(target.join("README.md"), "# repo\n").unwrap();
                    Ok(())
                }
                CloneOutcome::ExitsWith(exit_status) => Err(GitError::CloneFailed {
                    url: url.to_string(),
                    exit_status,
                    captured_output: "fatal: early EOF".to_string(),
                }
                .into()),
            }
        })
    }
}

struct Fixture {
    temp: TempDir,
    workflow: CloneWorkflow<FakeBackend>,
}

impl Fixture {
    fn new(probe: ProbeOutcome, clone: CloneOutcome) -> Self {
        let temp = tempfile::tempdir().expect("failed to create temp dir");
        let workflow = CloneWorkflow::new(
            FakeBackend::new(probe, clone),
            SettingsStore::new(temp.path().join("last_used_repo.json")),
            ActivityLog::new(temp.path().join("log.txt")),
        );
        Self { temp, workflow }
    }

    fn reachable() -> Self {
        Self::new(ProbeOutcome::Reachable, CloneOutcome::Succeeds)
    }

    fn destination(&self) -> PathBuf {
        self.temp.path().join("backups")
    }

    fn request(&self) -> CloneRequest {
        CloneRequest::builder()
            .with_repository_url(URL)
            .with_folder_name("repo")
            .with_destination_directory(self.destination().to_string_lossy())
            .build()
    }

    /// Activity lines with the timestamp prefix stripped
    fn log_entries(&self) -> Vec<String> {
        std::fs::read_to_string(self.temp.path().join("log.txt"))
            .unwrap_or_default()
            .lines()
            .map(|line| {
                line.split_once(" - ")
                    .map_or(line, |(_, message)| message)
                    .to_string()
            })
            .collect()
    }

    fn settings_file(&self) -> PathBuf {
        self.temp.path().join("last_used_repo.json")
    }
}

fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, mo, d)
        .unwrap()
        .and_hms_opt(h, mi, s)
        .unwrap()
}

// --- Request ---

#[test]
fn test_validate_reports_missing_fields() {
    let request = CloneRequest::builder()
        .with_repository_url("   ")
        .with_folder_name("repo")
        .with_destination_directory("")
        .build();

    let err = request.validate().expect_err("blank fields must fail");
    let ValidationError::MissingFields { fields } = &err;
    assert_eq!(fields, &vec!["repository URL", "destination directory"]);
    insta::assert_snapshot!(
        err.to_string(),
        @"Please fill in all fields (missing: repository URL, destination directory)"
    );
}

#[test]
fn test_validate_trims_values() {
    let request = CloneRequest::builder()
        .with_repository_url(format!("  {URL}\n"))
        .with_folder_name(" repo ")
        .with_destination_directory("\t/backups ")
        .with_archive(true)
        .build();

    let trimmed = request.validate().expect("valid request");
    assert_eq!(trimmed.repository_url(), URL);
    assert_eq!(trimmed.folder_name(), "repo");
    assert_eq!(trimmed.destination_directory(), "/backups");
    assert!(trimmed.create_archive());
    assert!(!trimmed.add_timestamp_suffix());
}

#[test]
fn test_target_directory_without_suffix_ignores_clock() {
    let request = CloneRequest::builder()
        .with_repository_url(URL)
        .with_folder_name("repo")
        .with_destination_directory("/backups")
        .build();

    for now in [at(2024, 3, 5, 14, 30, 0), at(1999, 12, 31, 23, 59, 59)] {
        assert_eq!(
            compute_target_directory(&request, now),
            Path::new("/backups").join("repo")
        );
    }
}

#[test]
fn test_target_directory_with_suffix() {
    let request = CloneRequest::builder()
        .with_repository_url(URL)
        .with_folder_name("repo")
        .with_destination_directory("/backups")
        .with_backup_suffix(true)
        .build();

    assert_eq!(
        compute_target_directory(&request, at(2024, 3, 5, 14, 30, 0)),
        Path::new("/backups").join("repo_backup_20240305_143000")
    );
}

// --- Workflow ---

#[test]
fn test_repository_name_from_url() {
    assert_eq!(repository_name(URL), Some("repo"));
    assert_eq!(repository_name("git@github.com:owner/dotted.name.git"), Some("dotted.name"));
    assert_eq!(repository_name(" /srv/git/project/ "), Some("project"));
    assert_eq!(repository_name("https://github.com/owner/"), Some("owner"));
    assert_eq!(repository_name(".git"), None);
    assert_eq!(repository_name(""), None);
}

#[tokio::test]
async fn test_validation_failure_has_no_side_effects() {
    let fx = Fixture::reachable();
    let request = CloneRequest::builder()
        .with_repository_url(URL)
        .with_folder_name("  ")
        .with_destination_directory(fx.destination().to_string_lossy())
        .build();

    let completion = fx.workflow.run(request).await;

    assert!(!completion.success);
    assert_eq!(completion.failure, Some(FailureKind::Validation));
    assert_eq!(completion.message, MSG_MISSING_FIELDS);
    assert!(fx.workflow.backend().probed().is_empty());
    assert!(!fx.destination().exists());
    assert!(!fx.temp.path().join("log.txt").exists());
    assert!(!fx.settings_file().exists());
}

#[tokio::test]
async fn test_unreachable_repository() {
    let fx = Fixture::new(ProbeOutcome::Unreachable, CloneOutcome::Succeeds);

    let completion = fx.workflow.run(fx.request()).await;

    assert!(!completion.success);
    assert_eq!(completion.failure, Some(FailureKind::UnreachableRepository));
    assert_eq!(completion.message, MSG_UNREACHABLE);
    assert_eq!(fx.log_entries(), vec![format!("Invalid GitHub URL: {URL}")]);
    assert!(!fx.destination().exists());
    assert!(fx.workflow.backend().cloned().is_empty());
    assert!(!fx.settings_file().exists());
}

#[tokio::test]
async fn test_probe_launch_failure_is_not_unreachable() {
    let fx = Fixture::new(ProbeOutcome::LaunchFails, CloneOutcome::Succeeds);

    let completion = fx.workflow.run(fx.request()).await;

    assert_eq!(completion.failure, Some(FailureKind::Launch));
    assert!(completion.message.starts_with("Error: "));
    let entries = fx.log_entries();
    assert_eq!(entries.len(), 1);
    assert!(entries[0].starts_with(&format!("Error cloning {URL}: ")));
    assert!(!fx.destination().exists());
}

#[tokio::test]
async fn test_directory_failure_is_filesystem_error() {
    let fx = Fixture::reachable();
    // A regular file where the destination directory should go
    std::fs::write(fx.destination(), "not a directory").unwrap();

    let completion = fx.workflow.run(fx.request()).await;

    assert_eq!(completion.failure, Some(FailureKind::Filesystem));
    assert!(completion.message.starts_with("Error: "));
    assert_eq!(fx.log_entries().len(), 1);
    assert!(fx.workflow.backend().cloned().is_empty());
}

#[tokio::test]
async fn test_clone_failure_keeps_partial_directory() {
    let fx = Fixture::new(ProbeOutcome::Reachable, CloneOutcome::ExitsWith(128));

    let completion = fx.workflow.run(fx.request()).await;
    let target = fx.destination().join("repo");

    assert!(!completion.success);
    assert_eq!(completion.failure, Some(FailureKind::Clone));
    insta::assert_snapshot!(
        completion.message,
        @"Error: git error: failed to clone https://github.com/owner/repo.git (exit status 128): fatal: early EOF"
    );
    assert_eq!(completion.target_directory.as_deref(), Some(target.as_path()));
    assert!(target.join(".git").is_dir(), "partial clone is left in place");
    assert!(completion.partial_clone);

    let entries = fx.log_entries();
    assert_eq!(entries.len(), 1);
    assert!(entries[0].contains(URL));
    assert!(!fx.settings_file().exists());
}

#[tokio::test]
async fn test_clone_failure_into_empty_directory_is_partial() {
    let fx = Fixture::new(ProbeOutcome::Reachable, CloneOutcome::ExitsWith(128));
    let target = fx.destination().join("repo");
    std::fs::create_dir_all(&target).unwrap();

    let completion = fx.workflow.run(fx.request()).await;

    assert_eq!(completion.failure, Some(FailureKind::Clone));
    assert!(completion.partial_clone);
}

#[tokio::test]
async fn test_clone_failure_over_previous_backup_is_not_partial() {
    let fx = Fixture::new(ProbeOutcome::Reachable, CloneOutcome::ExitsWith(128));
    let target = fx.destination().join("repo");
    std::fs::create_dir_all(&target).unwrap();
    std::fs::write(target.join("README.md"), "# earlier backup\n").unwrap();

    let completion = fx.workflow.run(fx.request()).await;

    assert_eq!(completion.failure, Some(FailureKind::Clone));
    assert_eq!(completion.target_directory.as_deref(), Some(target.as_path()));
    assert!(!completion.partial_clone, "existing data is not a partial clone");
    assert_eq!(
        std::fs::read_to_string(target.join("README.md")).unwrap(),
        "# earlier backup\n"
    );
    assert_eq!(fx.log_entries().len(), 1);
}

#[tokio::test]
async fn test_success_logs_and_persists() {
    let fx = Fixture::reachable();

    let completion = fx.workflow.run(fx.request()).await;
    let target = fx.destination().join("repo");

    assert!(completion.success);
    assert_eq!(completion.message, MSG_SUCCESS);
    assert!(completion.warnings.is_empty());
    assert_eq!(completion.failure, None);
    assert_eq!(completion.archive, None);
    assert_eq!(completion.target_directory.as_deref(), Some(target.as_path()));
    assert_eq!(fx.workflow.backend().cloned(), vec![(URL.to_string(), target.clone())]);
    assert_eq!(
        fx.log_entries(),
        vec![format!("Cloned {URL} into {}", target.display())]
    );
    assert_eq!(
        fx.workflow.settings().load(),
        LastUsedSettings::new(URL, fx.destination().to_string_lossy())
    );
}

#[tokio::test]
async fn test_success_uses_trimmed_inputs() {
    let fx = Fixture::reachable();
    let request = CloneRequest::builder()
        .with_repository_url(format!(" {URL} "))
        .with_folder_name(" repo")
        .with_destination_directory(format!("{} ", fx.destination().display()))
        .build();

    let completion = fx.workflow.run(request).await;

    assert!(completion.success);
    assert_eq!(fx.workflow.backend().probed(), vec![URL.to_string()]);
    assert_eq!(
        fx.workflow.settings().load().repository_url,
        URL,
        "persisted URL is trimmed"
    );
}

#[tokio::test]
async fn test_success_with_timestamp_suffix() {
    let fx = Fixture::reachable();
    let request = CloneRequest::builder()
        .with_repository_url(URL)
        .with_folder_name("repo")
        .with_destination_directory(fx.destination().to_string_lossy())
        .with_backup_suffix(true)
        .build();

    let completion = fx
        .workflow
        .run_at(request, at(2024, 3, 5, 14, 30, 0))
        .await;

    assert_eq!(
        completion.target_directory,
        Some(fx.destination().join("repo_backup_20240305_143000"))
    );
}

#[tokio::test]
async fn test_success_with_archive() {
    let fx = Fixture::reachable();
    let request = CloneRequest::builder()
        .with_repository_url(URL)
        .with_folder_name("repo")
        .with_destination_directory(fx.destination().to_string_lossy())
        .with_archive(true)
        .build();

    let completion = fx.workflow.run(request).await;
    let target = fx.destination().join("repo");
    let zip = fx.destination().join("repo.zip");

    assert!(completion.success);
    assert!(completion.warnings.is_empty());
    assert_eq!(completion.archive.as_deref(), Some(zip.as_path()));
    assert!(zip.is_file());
    assert_eq!(
        fx.log_entries(),
        vec![
            format!("Cloned {URL} into {}", target.display()),
            format!("Created ZIP archive: {}", zip.display()),
        ]
    );
    assert!(fx.settings_file().exists());
}

#[tokio::test]
async fn test_archive_failure_is_warning_and_skips_settings() {
    let fx = Fixture::reachable();
    // A directory squatting on the archive name makes the ZIP write fail
    std::fs::create_dir_all(fx.destination().join("repo.zip")).unwrap();
    let request = CloneRequest::builder()
        .with_repository_url(URL)
        .with_folder_name("repo")
        .with_destination_directory(fx.destination().to_string_lossy())
        .with_archive(true)
        .build();

    let completion = fx.workflow.run(request).await;
    let target = fx.destination().join("repo");

    assert!(completion.success, "archive failure does not fail the clone");
    assert_eq!(completion.archive, None);
    assert_eq!(completion.warnings.len(), 1);
    assert!(completion.warnings[0].starts_with(&format!(
        "Warning: failed to create ZIP archive for {}: ",
        target.display()
    )));
    let entries = fx.log_entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1], completion.warnings[0]);
    assert!(!fx.settings_file().exists());
}

#[tokio::test]
async fn test_settings_failure_is_warning() {
    let temp = tempfile::tempdir().unwrap();
    let settings_dir = temp.path().join("settings-as-dir");
    std::fs::create_dir_all(&settings_dir).unwrap();
    let workflow = CloneWorkflow::new(
        FakeBackend::new(ProbeOutcome::Reachable, CloneOutcome::Succeeds),
        SettingsStore::new(&settings_dir),
        ActivityLog::new(temp.path().join("log.txt")),
    );
    let request = CloneRequest::builder()
        .with_repository_url(URL)
        .with_folder_name("repo")
        .with_destination_directory(temp.path().join("backups").to_string_lossy())
        .build();

    let completion = workflow.run(request).await;

    assert!(completion.success);
    assert_eq!(completion.warnings.len(), 1);
    assert!(completion.warnings[0].starts_with("Warning: failed to save last used settings: "));
}

#[tokio::test]
async fn test_sequential_runs_keep_latest_settings() {
    let fx = Fixture::reachable();
    let second_destination = fx.temp.path().join("elsewhere");

    assert!(fx.workflow.run(fx.request()).await.success);
    let request = CloneRequest::builder()
        .with_repository_url("https://github.com/owner/other.git")
        .with_folder_name("other")
        .with_destination_directory(second_destination.to_string_lossy())
        .build();
    assert!(fx.workflow.run(request).await.success);

    assert_eq!(
        fx.workflow.settings().load(),
        LastUsedSettings::new(
            "https://github.com/owner/other.git",
            second_destination.to_string_lossy()
        )
    );
}

// --- Worker ---

#[tokio::test]
async fn test_spawn_reports_progress_in_order() {
    let fx = Fixture::reachable();
    let request = CloneRequest::builder()
        .with_repository_url(URL)
        .with_folder_name("repo")
        .with_destination_directory(fx.destination().to_string_lossy())
        .with_archive(true)
        .build();

    let handle = fx.workflow.spawn(request);
    let progress = handle.progress().clone();
    let completion = handle.wait().await;

    assert!(completion.success);
    let states: Vec<WorkflowState> = progress.try_iter().collect();
    assert_eq!(
        states,
        vec![
            WorkflowState::Validating,
            WorkflowState::ProbingUrl,
            WorkflowState::EnsuringDirectory,
            WorkflowState::Cloning,
            WorkflowState::Archiving,
            WorkflowState::PersistingSettings,
            WorkflowState::Idle,
        ]
    );
}

#[tokio::test]
async fn test_spawn_validation_failure_returns_to_idle() {
    let fx = Fixture::reachable();
    let request = CloneRequest::builder()
        .with_repository_url("")
        .with_folder_name("")
        .with_destination_directory("")
        .build();

    let handle = fx.workflow.spawn(request);
    let progress = handle.progress().clone();
    let completion = handle.wait().await;

    assert_eq!(completion.failure, Some(FailureKind::Validation));
    let states: Vec<WorkflowState> = progress.try_iter().collect();
    assert_eq!(states, vec![WorkflowState::Validating, WorkflowState::Idle]);
}

#[tokio::test]
async fn test_worker_panic_still_completes() {
    let fx = Fixture::new(ProbeOutcome::Panics, CloneOutcome::Succeeds);

    let completion = fx.workflow.spawn(fx.request()).wait().await;

    assert!(!completion.success);
    assert_eq!(completion.failure, Some(FailureKind::Internal));
    insta::assert_snapshot!(completion.message, @"Unexpected error: probe exploded");
}
