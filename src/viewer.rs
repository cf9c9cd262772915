// gitbackup: Git Clone Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Opens files in the platform's default viewer.
//!
//! ```text
//! windows  notepad  <path>
//! macos    open     <path>
//! other    xdg-open <path>
//! ```

use std::path::Path;
use tracing::debug;

use crate::core::process::builder::ProcessBuilder;
use crate::error::{BackupError, BackupResult};

/// Error text when the activity log does not exist yet.
pub const MSG_LOG_NOT_FOUND: &str = "Log file not found";

/// Viewer program for the current platform.
#[must_use]
pub const fn viewer_program() -> &'static str {
    if cfg!(windows) {
        "notepad"
    } else if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    }
}

/// Opens `path` with [`viewer_program`] and waits for the launcher to exit.
///
/// # Errors
///
/// Returns [`MSG_LOG_NOT_FOUND`] if `path` is not a file, or a process error
/// if the viewer cannot be found or fails.
pub async fn open_in_viewer(path: &Path) -> BackupResult<()> {
    if !path.is_file() {
        return Err(BackupError::Other(MSG_LOG_NOT_FOUND.into()));
    }

    let program = viewer_program();
    debug!(program, path = %path.display(), "opening viewer");
    ProcessBuilder::which(program)?
        .name(program)
        .arg(path)
        .quiet()
        .run()
        .await?;
    Ok(())
}
