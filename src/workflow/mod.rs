// gitbackup: Git Clone Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Clone workflow engine.
//!
//! ```text
//!  Idle
//!   |
//!   v
//!  Validating ---------- empty field -----------> Completion(Validation)
//!   |                                             (no log, no side effect)
//!   v
//!  ProbingUrl ---------- unreachable -----------> Completion(UnreachableRepository)
//!   |                    launch failed ---------> Completion(Launch)
//!   v
//!  EnsuringDirectory --- mkdir failed ----------> Completion(Filesystem)
//!   |
//!   v
//!  Cloning ------------- non-zero / launch -----> Completion(Clone | Launch)
//!   |                                             (partial directory kept,
//!   |                                              flagged when it was vacant)
//!   v
//!  [Archiving]           failure --> warning, settings not saved
//!   |
//!   v
//!  [PersistingSettings]  failure --> warning
//!   |
//!   v
//!  Idle ---> Completion(success)
//! ```
//!
//! Every path yields exactly one [`Completion`]. Failures after validation
//! write exactly one line to the activity log.

mod handle;
mod request;

pub use handle::CloneHandle;
pub use request::{CloneRequest, compute_target_directory, repository_name};

use chrono::{Local, NaiveDateTime};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::archive::create_archive;
use crate::config::Config;
use crate::error::{BackupError, GitError};
use crate::git::{GitBackend, ShellBackend};
use crate::logging::activity::ActivityLog;
use crate::settings::{LastUsedSettings, SettingsStore};
use crate::utility::fs::dir::ensure_directory;

/// Status message for a successful run.
pub const MSG_SUCCESS: &str = "Repository successfully cloned!";
/// Status message for a request with empty fields.
pub const MSG_MISSING_FIELDS: &str = "Please fill in all fields";
/// Status message for a failed probe.
pub const MSG_UNREACHABLE: &str = "Invalid or unreachable GitHub URL";

/// Default probe timeout.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Workflow progress, emitted on every transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    Idle,
    Validating,
    ProbingUrl,
    EnsuringDirectory,
    Cloning,
    Archiving,
    PersistingSettings,
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Idle => "idle",
            Self::Validating => "validating request",
            Self::ProbingUrl => "checking repository",
            Self::EnsuringDirectory => "preparing directory",
            Self::Cloning => "cloning",
            Self::Archiving => "creating ZIP archive",
            Self::PersistingSettings => "saving settings",
        };
        f.write_str(text)
    }
}

/// Why a run failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Validation,
    UnreachableRepository,
    Filesystem,
    Launch,
    Clone,
    /// The worker task panicked or was cancelled.
    Internal,
}

/// The single outcome of a workflow run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub success: bool,
    /// User-visible status line.
    pub message: String,
    /// Non-fatal problems (archive, settings).
    pub warnings: Vec<String>,
    pub failure: Option<FailureKind>,
    /// Set once a target directory was computed and the clone was attempted.
    pub target_directory: Option<PathBuf>,
    /// The failed clone left content in a directory this run started from
    /// absent or empty. Never set for a directory that held data before.
    pub partial_clone: bool,
    pub archive: Option<PathBuf>,
}

impl Completion {
    fn succeeded(target: PathBuf, archive: Option<PathBuf>, warnings: Vec<String>) -> Self {
        Self {
            success: true,
            message: MSG_SUCCESS.to_string(),
            warnings,
            failure: None,
            target_directory: Some(target),
            partial_clone: false,
            archive,
        }
    }

    fn failed(kind: FailureKind, message: impl Into<String>, target: Option<PathBuf>) -> Self {
        Self {
            success: false,
            message: message.into(),
            warnings: Vec::new(),
            failure: Some(kind),
            target_directory: target,
            partial_clone: false,
            archive: None,
        }
    }

    /// Failure for a worker that never produced a completion.
    #[must_use]
    pub fn internal(detail: &str) -> Self {
        Self::failed(
            FailureKind::Internal,
            format!("Unexpected error: {detail}"),
            None,
        )
    }
}

/// Optional progress sink; send failures are ignored.
struct Progress(Option<flume::Sender<WorkflowState>>);

impl Progress {
    fn emit(&self, state: WorkflowState) {
        debug!(%state, "workflow state");
        if let Some(tx) = &self.0 {
            let _ = tx.send(state);
        }
    }
}

/// Runs clone requests against a [`GitBackend`].
///
/// Holds no cross-run lock: callers must not start two runs for the same
/// target concurrently.
#[derive(Debug)]
pub struct CloneWorkflow<B = ShellBackend> {
    backend: Arc<B>,
    settings: SettingsStore,
    activity: ActivityLog,
    probe_timeout: Duration,
}

impl<B> Clone for CloneWorkflow<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            settings: self.settings.clone(),
            activity: self.activity.clone(),
            probe_timeout: self.probe_timeout,
        }
    }
}

impl CloneWorkflow<ShellBackend> {
    /// Workflow wired from `[git]` and `[files]` configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            ShellBackend::new(config.git.program.clone()),
            SettingsStore::new(&config.files.settings),
            ActivityLog::new(&config.files.activity_log),
        )
        .with_probe_timeout(config.git.probe_timeout())
    }
}

impl<B: GitBackend> CloneWorkflow<B> {
    #[must_use]
    pub fn new(backend: B, settings: SettingsStore, activity: ActivityLog) -> Self {
        Self {
            backend: Arc::new(backend),
            settings,
            activity,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    #[must_use]
    pub const fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    #[must_use]
    pub const fn activity_log(&self) -> &ActivityLog {
        &self.activity
    }

    /// Runs the workflow inline on the current task.
    pub async fn run(&self, request: CloneRequest) -> Completion {
        self.run_at(request, Local::now().naive_local()).await
    }

    /// Runs the workflow with an explicit clock for target naming.
    pub async fn run_at(&self, request: CloneRequest, now: NaiveDateTime) -> Completion {
        self.execute(request, now, &Progress(None)).await
    }

    async fn execute(
        &self,
        request: CloneRequest,
        now: NaiveDateTime,
        progress: &Progress,
    ) -> Completion {
        let completion = self.steps(request, now, progress).await;
        progress.emit(WorkflowState::Idle);
        completion
    }

    async fn steps(
        &self,
        request: CloneRequest,
        now: NaiveDateTime,
        progress: &Progress,
    ) -> Completion {
        progress.emit(WorkflowState::Validating);
        let request = match request.validate() {
            Ok(request) => request,
            Err(e) => {
                debug!(error = %e, "request rejected");
                return Completion::failed(FailureKind::Validation, MSG_MISSING_FIELDS, None);
            }
        };
        let url = request.repository_url();

        progress.emit(WorkflowState::ProbingUrl);
        match self.backend.probe(url, self.probe_timeout).await {
            Ok(true) => {}
            Ok(false) => {
                let error = GitError::UnreachableRepository {
                    url: url.to_string(),
                };
                warn!(%error, "probe failed");
                self.activity.append_now(&format!("Invalid GitHub URL: {url}"));
                return Completion::failed(
                    FailureKind::UnreachableRepository,
                    MSG_UNREACHABLE,
                    None,
                );
            }
            Err(e) => return self.fail(url, &e, FailureKind::Launch, None),
        }

        let target = compute_target_directory(&request, now);

        let target_was_vacant = is_vacant(&target).await;

        progress.emit(WorkflowState::EnsuringDirectory);
        if let Err(e) = ensure_directory(&target).await {
            return self.fail(url, &e, FailureKind::Filesystem, None);
        }

        progress.emit(WorkflowState::Cloning);
        if let Err(e) = self.backend.clone_repo(url, &target).await {
            let partial_clone = target_was_vacant && !is_vacant(&target).await;
            if partial_clone {
                warn!(target = %target.display(), "clone failed, partial directory left in place");
            }
            let kind = clone_failure_kind(&e);
            let mut completion = self.fail(url, &e, kind, Some(target));
            completion.partial_clone = partial_clone;
            return completion;
        }
        info!(url, target = %target.display(), "cloned");
        self.activity
            .append_now(&format!("Cloned {url} into {}", target.display()));

        let mut warnings = Vec::new();
        let mut archive = None;
        let mut archive_failed = false;

        if request.create_archive() {
            progress.emit(WorkflowState::Archiving);
            match create_archive(target.clone()).await {
                Ok(zip) => {
                    self.activity
                        .append_now(&format!("Created ZIP archive: {}", zip.display()));
                    archive = Some(zip);
                }
                Err(e) => {
                    archive_failed = true;
                    warnings.push(self.record_warning(&format!(
                        "Warning: failed to create ZIP archive for {}: {e}",
                        target.display()
                    )));
                }
            }
        }

        if !archive_failed {
            progress.emit(WorkflowState::PersistingSettings);
            let last_used = LastUsedSettings::new(url, request.destination_directory());
            if let Err(e) = self.settings.persist(&last_used) {
                warnings.push(self.record_warning(&format!(
                    "Warning: failed to save last used settings: {e}"
                )));
            }
        }

        Completion::succeeded(target, archive, warnings)
    }

    /// Logs a failure once and builds its completion.
    fn fail(
        &self,
        url: &str,
        error: &BackupError,
        kind: FailureKind,
        target: Option<PathBuf>,
    ) -> Completion {
        warn!(url, error = %error, ?kind, "clone workflow failed");
        self.activity
            .append_now(&format!("Error cloning {url}: {error}"));
        Completion::failed(kind, format!("Error: {error}"), target)
    }

    fn record_warning(&self, warning: &str) -> String {
        warn!("{warning}");
        self.activity.append_now(warning);
        warning.to_string()
    }
}

impl<B: GitBackend + 'static> CloneWorkflow<B> {
    /// Starts the workflow on a tokio worker task.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn spawn(&self, request: CloneRequest) -> CloneHandle {
        let (tx, rx) = flume::unbounded();
        let workflow = self.clone();
        let task = tokio::spawn(async move {
            let progress = Progress(Some(tx));
            workflow
                .execute(request, Local::now().naive_local(), &progress)
                .await
        });
        CloneHandle::new(task, rx)
    }
}

/// Absent or empty. Unreadable directories count as occupied.
async fn is_vacant(path: &Path) -> bool {
    match tokio::fs::read_dir(path).await {
        Ok(mut entries) => matches!(entries.next_entry().await, Ok(None)),
        Err(e) => e.kind() == std::io::ErrorKind::NotFound,
    }
}

fn clone_failure_kind(error: &BackupError) -> FailureKind {
    match error {
        BackupError::Git(git) if matches!(**git, GitError::Launch(_)) => FailureKind::Launch,
        _ => FailureKind::Clone,
    }
}

#[cfg(test)]
mod tests;
