// gitbackup: Git Clone Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! ZIP archiving of a cloned directory.
//!
//! ```text
//! /backups/repo_backup_20240305_143000/      /backups/repo_backup_20240305_143000.zip
//!   .git/                                      .git/            (dir entry)
//!   .git/HEAD                  ---------->     .git/HEAD        (deflate)
//!   src/                                       src/
//!   src/main.rs                                src/main.rs
//!
//! parallel_walk(for_archive) --> sort --> ZipWriter (spawn_blocking)
//! ```
//!
//! Symbolic links are neither followed nor stored.

use chrono::{DateTime, Datelike, Local, Timelike};
use std::fs::{File, Metadata};
use std::io::{BufReader, BufWriter};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, warn};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{ArchiveError, BackupError, BackupResult};
use crate::utility::fs::walk::{WalkOptions, parallel_walk};

/// Returns `<dir>.zip`, appending to the full directory name.
///
/// # Errors
///
/// Returns `ArchiveError::Io` if `dir` has no final name component.
pub fn archive_path_for(dir: &Path) -> Result<PathBuf, ArchiveError> {
    let name = dir.file_name().ok_or_else(|| ArchiveError::Io {
        path: dir.display().to_string(),
        source: std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "directory has no name to derive an archive name from",
        ),
    })?;
    let mut zip_name = name.to_os_string();
    zip_name.push(".zip");
    Ok(dir.with_file_name(zip_name))
}

/// Archives `dir` on the blocking thread pool.
///
/// # Errors
///
/// Returns `ArchiveError` for walk, read, or write failures.
pub async fn create_archive(dir: PathBuf) -> BackupResult<PathBuf> {
    tokio::task::spawn_blocking(move || archive_directory(&dir))
        .await
        .map_err(|e| BackupError::Other(format!("archive task failed: {e}").into_boxed_str()))?
}

/// Writes every regular file and subdirectory of `dir` into `<dir>.zip`.
///
/// A partially written archive is removed on failure.
///
/// # Errors
///
/// Returns `ArchiveError` for walk, read, or write failures.
pub fn archive_directory(dir: &Path) -> BackupResult<PathBuf> {
    let zip_path = archive_path_for(dir)?;

    let walk = parallel_walk(dir, &WalkOptions::for_archive()).map_err(|e| ArchiveError::Walk {
        path: dir.display().to_string(),
        message: e.to_string(),
    })?;
    if walk.error_count() > 0 {
        return Err(ArchiveError::Walk {
            path: dir.display().to_string(),
            message: format!("{} entries could not be read", walk.error_count()),
        }
        .into());
    }

    let mut entries: Vec<(PathBuf, bool)> = walk
        .directories()
        .iter()
        .filter(|d| d.as_path() != dir)
        .map(|d| (d.clone(), true))
        .chain(walk.files().iter().map(|f| (f.clone(), false)))
        .collect();
    entries.sort();

    debug!(dir = %dir.display(), entries = entries.len(), "writing archive");

    if let Err(e) = write_archive(dir, &zip_path, &entries) {
        if let Err(cleanup) = std::fs::remove_file(&zip_path)
            && cleanup.kind() != std::io::ErrorKind::NotFound
        {
            warn!(path = %zip_path.display(), error = %cleanup, "failed to remove partial archive");
        }
        return Err(e.into());
    }

    info!(archive = %zip_path.display(), "archive created");
    Ok(zip_path)
}

fn write_archive(
    root: &Path,
    zip_path: &Path,
    entries: &[(PathBuf, bool)],
) -> Result<(), ArchiveError> {
    let io_error = |path: &Path| {
        let path = path.display().to_string();
        move |source| ArchiveError::Io { path, source }
    };
    let zip_error = |path: &Path| {
        let path = path.display().to_string();
        move |source| ArchiveError::Zip { path, source }
    };

    let file = File::create(zip_path).map_err(io_error(zip_path))?;
    let mut writer = ZipWriter::new(BufWriter::new(file));

    for (path, is_dir) in entries {
        let name = entry_name(root, path)?;
        let metadata = std::fs::symlink_metadata(path).map_err(io_error(path))?;
        let options = entry_options(&metadata);

        if *is_dir {
            writer
                .add_directory(format!("{name}/"), options)
                .map_err(zip_error(path))?;
        } else {
            writer
                .start_file(name, options.large_file(metadata.len() >= u64::from(u32::MAX)))
                .map_err(zip_error(path))?;
            let mut reader = BufReader::new(File::open(path).map_err(io_error(path))?);
            std::io::copy(&mut reader, &mut writer).map_err(io_error(path))?;
        }
    }

    let out = writer.finish().map_err(zip_error(zip_path))?;
    let file = out
        .into_inner()
        .map_err(|e| ArchiveError::Io {
            path: zip_path.display().to_string(),
            source: e.into_error(),
        })?;
    file.sync_all().map_err(io_error(zip_path))
}

/// Entry name relative to `root`, `/`-separated.
fn entry_name(root: &Path, path: &Path) -> Result<String, ArchiveError> {
    let relative = path.strip_prefix(root).map_err(|e| ArchiveError::Walk {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    let parts: Vec<_> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect();
    Ok(parts.join("/"))
}

fn entry_options(metadata: &Metadata) -> SimpleFileOptions {
    let mut options =
        SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    if let Some(modified) = zip_timestamp(metadata) {
        options = options.last_modified_time(modified);
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        options = options.unix_permissions(metadata.permissions().mode());
    }
    options
}

/// File mtime in local time; `None` outside the ZIP date range (1980-2107).
fn zip_timestamp(metadata: &Metadata) -> Option<zip::DateTime> {
    let modified: DateTime<Local> = metadata.modified().ok()?.into();
    zip::DateTime::from_date_and_time(
        u16::try_from(modified.year()).ok()?,
        u8::try_from(modified.month()).ok()?,
        u8::try_from(modified.day()).ok()?,
        u8::try_from(modified.hour()).ok()?,
        u8::try_from(modified.minute()).ok()?,
        u8::try_from(modified.second()).ok()?,
    )
    .ok()
}
