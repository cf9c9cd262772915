// gitbackup: Git Clone Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `last-used` and `log` commands.

use anyhow::Context;

use crate::cli::clone::LogArgs;
use crate::config::Config;
use crate::error::Result;
use crate::settings::SettingsStore;
use crate::viewer::{MSG_LOG_NOT_FOUND, open_in_viewer};

/// Prints the persisted repository URL and destination directory.
pub fn run_last_used_command(config: &Config) {
    let settings = SettingsStore::new(&config.files.settings).load();
    println!("url  = {}", settings.repository_url);
    println!("path = {}", settings.destination_directory);
}

/// Opens the activity log in the platform viewer, or prints it.
///
/// # Errors
///
/// Returns an error if the log does not exist or cannot be read, or if the
/// viewer fails to start.
pub async fn run_log_command(args: &LogArgs, config: &Config) -> Result<()> {
    let path = &config.files.activity_log;
    if args.print {
        if !path.is_file() {
            anyhow::bail!(MSG_LOG_NOT_FOUND);
        }
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;
        print!("{content}");
        return Ok(());
    }
    open_in_viewer(path).await?;
    Ok(())
}
