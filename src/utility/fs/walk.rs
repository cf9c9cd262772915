// gitbackup: Git Clone Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use bon::Builder;
use flume::bounded;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::warn;

use crate::error::{BackupResult, FsError};

/// Options for parallel directory traversal.
#[derive(Debug, Clone, Builder)]
pub struct WalkOptions {
    /// Include hidden files/directories
    #[builder(setters(name = with_include_hidden), default = false)]
    include_hidden: bool,
    /// Respect .gitignore and .ignore files
    #[builder(setters(name = with_respect_gitignore), default = true)]
    respect_gitignore: bool,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl WalkOptions {
    #[must_use]
    pub const fn include_hidden(&self) -> bool {
        self.include_hidden
    }

    #[must_use]
    pub const fn respect_gitignore(&self) -> bool {
        self.respect_gitignore
    }

    /// Everything on disk: hidden entries and `.git` included, no ignore
    /// rules, symlinks neither followed nor reported.
    #[must_use]
    pub fn for_archive() -> Self {
        Self::builder()
            .with_include_hidden(true)
            .with_respect_gitignore(false)
            .build()
    }
}

/// Result of a parallel walk operation. Paths are sorted.
#[derive(Debug)]
pub struct WalkResult {
    files: Vec<PathBuf>,
    directories: Vec<PathBuf>,
    error_count: usize,
}

impl WalkResult {
    pub(crate) fn new(
        mut files: Vec<PathBuf>,
        mut directories: Vec<PathBuf>,
        error_count: usize,
    ) -> Self {
        files.sort();
        directories.sort();
        Self {
            files,
            directories,
            error_count,
        }
    }

    /// Regular files found during traversal.
    #[must_use]
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Directories found during traversal, including the root.
    #[must_use]
    pub fn directories(&self) -> &[PathBuf] {
        &self.directories
    }

    /// Entries that could not be read.
    #[must_use]
    pub const fn error_count(&self) -> usize {
        self.error_count
    }
}

enum Found {
    File(PathBuf),
    Dir(PathBuf),
}

/// Builds a `WalkBuilder` with the given options.
fn build_walker(root: &Path, options: &WalkOptions) -> WalkBuilder {
    let mut builder = WalkBuilder::new(root);

    if !options.respect_gitignore() {
        // Also drops parent and global ignore files
        builder.standard_filters(false);
    }
    builder.follow_links(false);
    builder.hidden(!options.include_hidden());
    builder
}

/// Performs parallel directory traversal using `ignore::WalkParallel`.
///
/// Entries travel over a bounded flume channel that is drained while the
/// walk is still running, so huge trees never stall the walker threads.
///
/// # Errors
///
/// Returns `FsError::NotFound` if `root` is not an existing directory.
///
/// # Example
/// ```no_run
/// use gitbackup::utility::fs::walk::{parallel_walk, WalkOptions};
///
/// let result = parallel_walk("/path/to/clone", &WalkOptions::for_archive())?;
/// println!("Found {} files", result.files().len());
/// # Ok::<(), gitbackup::error::BackupError>(())
/// ```
pub fn parallel_walk<P: AsRef<Path>>(root: P, options: &WalkOptions) -> BackupResult<WalkResult> {
    let root = root.as_ref();

    if !root.is_dir() {
        return Err(FsError::NotFound(root.display().to_string()).into());
    }

    let (tx, rx) = bounded::<Found>(1000);
    let error_count = Arc::new(AtomicUsize::new(0));
    let parallel = build_walker(root, options).build_parallel();

    let mut files = Vec::new();
    let mut directories = Vec::new();

    std::thread::scope(|scope| {
        let walker_errors = Arc::clone(&error_count);
        scope.spawn(move || {
            parallel.run(|| {
                let tx = tx.clone();
                let error_count = Arc::clone(&walker_errors);

                Box::new(move |entry_result| {
                    match entry_result {
                        Ok(entry) => {
                            let file_type = entry.file_type();
                            let found = if file_type.is_some_and(|ft| ft.is_dir()) {
                                Some(Found::Dir(entry.into_path()))
                            } else if file_type.is_some_and(|ft| ft.is_file()) {
                                Some(Found::File(entry.into_path()))
                            } else {
                                None
                            };
                            // Receiver outlives the walk; send only fails if it was dropped
                            if let Some(found) = found
                                && tx.send(found).is_err()
                            {
                                return ignore::WalkState::Quit;
                            }
                        }
                        Err(e) => {
                            warn!(error = %e, "walk error");
                            error_count.fetch_add(1, Ordering::Relaxed);
                        }
                    }
                    ignore::WalkState::Continue
                })
            });
            drop(tx);
        });

        for found in rx.iter() {
            match found {
                Found::File(path) => files.push(path),
                Found::Dir(path) => directories.push(path),
            }
        }
    });

    let error_count = error_count.load(Ordering::Relaxed);
    Ok(WalkResult::new(files, directories, error_count))
}
