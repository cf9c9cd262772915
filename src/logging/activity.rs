// gitbackup: Git Clone Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! User-facing activity log.
//!
//! ```text
//! log.txt
//!   2024-03-05 14:30:00.123456 - Cloned https://... into /backups/repo
//!   2024-03-05 14:31:10.000001 - Invalid GitHub URL: https://...
//! ```
//!
//! Append-only. Never read back by the program.

use chrono::NaiveDateTime;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{trace, warn};

/// Timestamp layout of an activity line.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Appender for the flat activity log file.
#[derive(Debug, Clone)]
pub struct ActivityLog {
    path: PathBuf,
}

impl ActivityLog {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends `<now> - <message>` as one line.
    ///
    /// Best effort: failures are reported through `tracing` and swallowed so
    /// they can never replace the outcome of the operation being logged.
    pub fn append(&self, message: &str, now: NaiveDateTime) {
        let line = format_entry(message, now);
        if let Err(e) = self.write_line(&line) {
            warn!(path = %self.path.display(), error = %e, "failed to write activity log");
        } else {
            trace!(path = %self.path.display(), line = %line.trim_end(), "activity");
        }
    }

    /// Appends using the current local time.
    pub fn append_now(&self, message: &str) {
        self.append(message, chrono::Local::now().naive_local());
    }

    fn write_line(&self, line: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())
    }
}

/// Renders one activity line including the trailing newline.
///
/// Embedded newlines are flattened so one event stays one line.
#[must_use]
pub fn format_entry(message: &str, now: NaiveDateTime) -> String {
    let flat = message.replace(['\r', '\n'], " ");
    format!("{} - {}\n", now.format(TIMESTAMP_FORMAT), flat.trim_end())
}
