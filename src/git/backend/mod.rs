// gitbackup: Git Clone Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git backend abstraction layer.
//!
//! ```text
//! GitBackend (trait) --> ShellBackend (git CLI via ProcessBuilder)
//!   probe       git ls-remote -- <url>      bounded timeout
//!   clone_repo  git clone -- <url> <dir>    captured output
//! ```

use futures_util::future::BoxFuture;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::core::process::builder::{ProcessBuilder, ProcessFlags};
use crate::error::{BackupResult, GitError, ProcessError};

/// Remote operations the clone workflow needs.
///
/// Implementors must be shareable across the workflow worker task.
pub trait GitBackend: Send + Sync {
    /// Check whether `url` answers a reference listing within `timeout`.
    ///
    /// `Ok(false)` means unreachable or invalid (non-zero exit or timeout).
    ///
    /// # Errors
    ///
    /// Returns `GitError::Launch` if the git executable cannot be started.
    fn probe<'a>(&'a self, url: &'a str, timeout: Duration) -> BoxFuture<'a, BackupResult<bool>>;

    /// Clone `url` into `target`.
    ///
    /// # Errors
    ///
    /// Returns `GitError::Launch` if git cannot be started, or
    /// `GitError::CloneFailed` carrying the exit status and captured output.
    fn clone_repo<'a>(&'a self, url: &'a str, target: &'a Path)
    -> BoxFuture<'a, BackupResult<()>>;
}

// --- ShellBackend Implementation (Git CLI) ---

/// Shell-based git backend using the git CLI.
#[derive(Debug, Clone)]
pub struct ShellBackend {
    program: String,
}

impl Default for ShellBackend {
    fn default() -> Self {
        Self::new("git")
    }
}

impl ShellBackend {
    /// `program` is a name resolved via PATH or a path to the executable.
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Base git command. Sets `GCM_INTERACTIVE=never` and `GIT_TERMINAL_PROMPT=0`
    /// so credential prompts fail instead of blocking.
    fn git(&self) -> Result<ProcessBuilder, GitError> {
        let builder = ProcessBuilder::which(&self.program).map_err(GitError::Launch)?;
        Ok(builder
            .env("GCM_INTERACTIVE", "never")
            .env("GIT_TERMINAL_PROMPT", "0"))
    }

    /// Runs `git ls-remote -- <url>` with output discarded.
    ///
    /// # Errors
    ///
    /// Returns `GitError::Launch` if git cannot be found or spawned.
    pub async fn probe_repository(&self, url: &str, timeout: Duration) -> BackupResult<bool> {
        let builder = self
            .git()?
            .name("git ls-remote")
            .args(["ls-remote", "--", url])
            .quiet()
            .flag(ProcessFlags::ALLOW_FAILURE)
            .timeout(timeout);

        match builder.run().await {
            Ok(output) => {
                debug!(url, exit_code = output.exit_code(), "probe finished");
                Ok(output.success())
            }
            Err(ProcessError::Timeout { timeout_secs, .. }) => {
                warn!(url, timeout_secs, "probe timed out");
                Ok(false)
            }
            Err(e @ (ProcessError::SpawnFailed { .. } | ProcessError::ExecutableNotFound { .. })) => {
                Err(GitError::Launch(e).into())
            }
            Err(e) => {
                warn!(url, error = %e, "probe failed");
                Ok(false)
            }
        }
    }

    /// Runs `git clone -- <url> <target>` with output captured.
    ///
    /// # Errors
    ///
    /// Returns `GitError::InvalidPath`, `GitError::Launch` or `GitError::CloneFailed`.
    pub async fn clone_repository(&self, url: &str, target: &Path) -> BackupResult<()> {
        let target_str = target.to_str().ok_or_else(|| GitError::InvalidPath {
            path: target.display().to_string(),
        })?;

        info!(url, target = %target.display(), "cloning");

        let output = self
            .git()?
            .name("git clone")
            .args(["clone", "--", url, target_str])
            .capture_output()
            .flag(ProcessFlags::ALLOW_FAILURE)
            .run()
            .await
            .map_err(GitError::Launch)?;

        if !output.success() {
            return Err(GitError::CloneFailed {
                url: url.to_string(),
                exit_status: output.exit_code(),
                captured_output: output.combined_output(),
            }
            .into());
        }
        Ok(())
    }
}

impl GitBackend for ShellBackend {
    fn probe<'a>(&'a self, url: &'a str, timeout: Duration) -> BoxFuture<'a, BackupResult<bool>> {
        Box::pin(self.probe_repository(url, timeout))
    }

    fn clone_repo<'a>(
        &'a self,
        url: &'a str,
        target: &'a Path,
    ) -> BoxFuture<'a, BackupResult<()>> {
        Box::pin(self.clone_repository(url, target))
    }
}

#[cfg(test)]
mod tests;
