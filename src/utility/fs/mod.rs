// gitbackup: Git Clone Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Filesystem utilities with parallel traversal.
//!
//! ```text
//! dir:   ensure_directory()  tokio::fs::create_dir_all --> FsError
//! walk:  parallel_walk()     ignore::WalkParallel (multi-core), sorted
//!        WalkOptions         hidden, gitignore
//! ```

pub mod dir;
pub mod walk;
