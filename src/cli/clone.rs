// gitbackup: Git Clone Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI arguments for the `clone` and `log` commands.
//!
//! ```text
//! gitbackup clone https://github.com/owner/repo.git -d ~/backups -b -z
//!   --> ~/backups/repo_backup_20240305_143000
//!   --> ~/backups/repo_backup_20240305_143000.zip
//! ```

use clap::Args;

/// Arguments for the `clone` command.
#[derive(Debug, Clone, Default, Args)]
pub struct CloneArgs {
    /// Repository URL. Defaults to the last used URL.
    #[arg(value_name = "URL")]
    pub url: Option<String>,

    /// Folder name. Defaults to the repository name taken from the URL.
    #[arg(short = 'n', long = "name", value_name = "NAME")]
    pub name: Option<String>,

    /// Destination directory. Defaults to the last used directory.
    #[arg(short = 'd', long = "dir", value_name = "DIR")]
    pub dir: Option<String>,

    /// Appends `_backup_<YYYYMMDD>_<HHMMSS>` to the folder name.
    #[arg(short = 'b', long = "backup")]
    pub backup: bool,

    /// Creates `<folder>.zip` next to the cloned folder.
    #[arg(short = 'z', long = "zip")]
    pub zip: bool,
}

/// Arguments for the `log` command.
#[derive(Debug, Clone, Default, Args)]
pub struct LogArgs {
    /// Prints the activity log instead of opening a viewer.
    #[arg(short = 'p', long = "print")]
    pub print: bool,
}
