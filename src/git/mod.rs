// gitbackup: Git Clone Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git operations module.
//!
//! ```text
//!     CloneWorkflow
//!          |
//!          v
//!  ,------------------,
//!  | GitBackend trait |
//!  '--------+---------'
//!           |
//!           v
//!     ShellBackend
//!   .probe_repository   git ls-remote
//!   .clone_repository   git clone
//! ```
//!
//! **`ShellBackend`** shells out to the git CLI so user credential helpers,
//! SSH agents and proxies behave exactly as on the command line.

pub mod backend;

pub use backend::{GitBackend, ShellBackend};
