// gitbackup: Git Clone Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::Path;
use tracing::debug;

use crate::error::{BackupResult, FsError};

/// Creates `path` and any missing parents. Succeeds if it already exists.
///
/// # Errors
///
/// Returns `FsError` if the directory cannot be created, for example when
/// permission is denied or a regular file occupies the path.
pub async fn ensure_directory(path: &Path) -> BackupResult<()> {
    tokio::fs::create_dir_all(path)
        .await
        .map_err(|e| FsError::from_io(path, e))?;
    debug!(path = %path.display(), "directory ready");
    Ok(())
}
