// gitbackup: Git Clone Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Clone command implementation.
//!
//! ```text
//! CloneArgs --+-- last_used_repo.json (URL / DIR fallback)
//!             |
//!             v
//!        CloneRequest --> CloneWorkflow::spawn --> spinner <-- progress
//!                                                     |
//!                                           wait() --> Completion
//!                                                     |
//!                              stdout: message   stderr: warnings, notes
//! ```

use indicatif::{ProgressBar, ProgressStyle};
use std::process::ExitCode;
use std::sync::OnceLock;
use std::time::Duration;
use tracing::debug;

use crate::cli::clone::CloneArgs;
use crate::config::Config;
use crate::settings::{LastUsedSettings, SettingsStore};
use crate::workflow::{CloneRequest, CloneWorkflow, Completion, WorkflowState, repository_name};

/// Pre-validated spinner style.
fn spinner_style() -> ProgressStyle {
    static STYLE: OnceLock<ProgressStyle> = OnceLock::new();
    STYLE
        .get_or_init(|| {
            ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
        })
        .clone()
}

/// Fills missing arguments from the last used settings.
///
/// The folder name falls back to the repository name in the URL.
#[must_use]
pub fn build_request(args: &CloneArgs, last_used: &LastUsedSettings) -> CloneRequest {
    let url = args
        .url
        .clone()
        .unwrap_or_else(|| last_used.repository_url.clone());
    let name = args
        .name
        .clone()
        .or_else(|| repository_name(&url).map(ToString::to_string))
        .unwrap_or_default();
    let dir = args
        .dir
        .clone()
        .unwrap_or_else(|| last_used.destination_directory.clone());

    CloneRequest::builder()
        .with_repository_url(url)
        .with_folder_name(name)
        .with_destination_directory(dir)
        .with_backup_suffix(args.backup)
        .with_archive(args.zip)
        .build()
}

/// Main handler for the clone command.
///
/// Exits with failure when the workflow reports one. Warnings alone do not
/// change the exit code.
pub async fn run_clone_command(args: &CloneArgs, config: &Config) -> ExitCode {
    let last_used = SettingsStore::new(&config.files.settings).load();
    let request = build_request(args, &last_used);
    debug!(?request, "clone request");

    let handle = CloneWorkflow::from_config(config).spawn(request);

    let pb = ProgressBar::new_spinner();
    pb.set_style(spinner_style());
    pb.enable_steady_tick(Duration::from_millis(100));
    while let Ok(state) = handle.progress().recv_async().await {
        if state == WorkflowState::Idle {
            break;
        }
        pb.set_message(state.to_string());
    }
    pb.finish_and_clear();

    let completion = handle.wait().await;
    report(&completion);

    if completion.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn report(completion: &Completion) {
    println!("{}", completion.message);
    if let Some(target) = &completion.target_directory {
        if completion.success {
            println!("Cloned into {}", target.display());
        } else if completion.partial_clone {
            eprintln!(
                "Note: partial clone left in {}; remove it before retrying",
                target.display()
            );
        }
    }
    if let Some(archive) = &completion.archive {
        println!("Archive: {}", archive.display());
    }
    for warning in &completion.warnings {
        eprintln!("{warning}");
    }
}
