// gitbackup: Git Clone Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Utility modules.
//!
//! ```text
//! fs
//!   dir:   ensure_directory()   create target + parents, idempotent
//!   walk:  parallel_walk(), WalkOptions
//! ```

pub mod fs;
