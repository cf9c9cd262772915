// gitbackup: Git Clone Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module for gitbackup using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! gitbackup [global options] <command>
//! clone [URL] [-n NAME] [-d DIR] [-b] [-z]
//! last-used
//! log [--print]
//! options
//! inis
//! version
//! ```

pub mod clone;
pub mod global;


use crate::cli::clone::{CloneArgs, LogArgs};
use crate::cli::global::GlobalOptions;
use clap::{Parser, Subcommand};

/// Git Clone Backup Tool
///
/// Clones a repository, optionally into a timestamped backup folder and
/// optionally packed into a ZIP archive.
#[derive(Debug, Parser)]
#[command(
    name = "gitbackup",
    author,
    version,
    about = "Git Clone Backup Tool",
    long_about = "gitbackup Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Clones a git repository into a local folder, optionally with a\n\
                  `_backup_<date>_<time>` suffix and a ZIP archive of the result.\n\n\
                  `gitbackup clone <url> -d <dir>` clones into <dir>/<repo name>.\n\
                  URL and directory default to the values of the last successful run.",
    after_help = "CONFIG FILES:\n\n\
                  gitbackup reads `gitbackup.toml` from the current directory if it\n\
                  exists. Additional files can be given with --config and are loaded\n\
                  in order. GITBACKUP_<SECTION>__<KEY> environment variables and\n\
                  --set options are applied last."
)]
pub struct Cli {
    /// Global options shared by all commands
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Command to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shows the version.
    #[command(visible_alias = "-v")]
    Version,

    /// Lists all options and their values.
    Options,

    /// Lists the configuration files in use.
    Inis,

    /// Clones a repository.
    Clone(CloneArgs),

    /// Prints the last used repository URL and destination.
    #[command(name = "last-used")]
    LastUsed,

    /// Opens the activity log.
    Log(LogArgs),
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

/// Parses command-line arguments from an iterator.
pub fn parse_from<I, T>(iter: I) -> Cli
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::parse_from(iter)
}

/// Tries to parse command-line arguments, returning an error on failure.
///
/// # Errors
///
/// Returns a `clap::Error` if the arguments are invalid or if help/version information
/// was requested.
pub fn try_parse() -> Result<Cli, clap::Error> {
    Cli::try_parse()
}
