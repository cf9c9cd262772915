// gitbackup: Git Clone Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Library root.
//!
//! # Crate Architecture
//!
//! ```text
//!                        main.rs
//!                           |
//!                +----------+----------+
//!                v                     v
//!             cli (clap)          cmd (handlers)
//!                |         clone / options / last-used / log
//!                +----------+----------+
//!                           v
//!              ,---------------------------,
//!              |          config           |
//!              |   TOML, env, --set        |
//!              '-------------+-------------'
//!                            v
//!                        workflow ------------------> viewer
//!          validate -> probe -> mkdir -> clone -> zip -> save
//!                 |         |               |       |
//!                 v         v               v       v
//!               git     utility/fs       archive  settings
//!           ShellBackend  dir, walk       (zip)    (JSON)
//!
//!   +-----------------------------------------+
//!   |  core   process                         |
//!   +-----------------------------------------+
//!   |  foundation   error, logging, utility   |
//!   +-----------------------------------------+
//! ```

pub mod archive;
pub mod cli;
pub mod cmd;
pub mod config;
pub mod core;
pub mod error;
pub mod git;
pub mod logging;
pub mod settings;
pub mod utility;
pub mod viewer;
pub mod workflow;
