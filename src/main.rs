// gitbackup: Git Clone Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> Config --> Logging --> Command Dispatch
//!   Clone | LastUsed | Log | Options | Inis | Version
//! ```

use std::process::ExitCode;

use gitbackup::cli::global::GlobalOptions;
use gitbackup::cli::{self, Command};
use gitbackup::cmd::clone::run_clone_command;
use gitbackup::cmd::config::{run_inis_command, run_options_command};
use gitbackup::cmd::settings::{run_last_used_command, run_log_command};
use gitbackup::config::loader::ConfigLoader;
use gitbackup::config::{Config, DEFAULT_CONFIG_FILE, ENV_PREFIX};
use gitbackup::error::{Result, bail_out};
use gitbackup::logging::init_logging;
use gitbackup::logging::{LogConfig, LogLevel};

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::parse();

    // Version and inis work even with a broken configuration
    let config = match &cli.command {
        Some(Command::Version | Command::Inis) | None => None,
        Some(_) => match load_config(&cli.global) {
            Ok(config) => Some(config),
            Err(e) => {
                eprintln!("Failed to load config: {e:#}");
                return ExitCode::FAILURE;
            }
        },
    };

    let log_config = build_log_config(&cli.global, config.as_ref());
    let _log_guard = match init_logging(&log_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            return ExitCode::FAILURE;
        }
    };

    match dispatch_command(&cli, config.as_ref()).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// CLI flags win over the configured levels.
fn build_log_config(global: &GlobalOptions, config: Option<&Config>) -> LogConfig {
    let defaults = config.map(|c| &c.global);

    let console_level = global
        .log_level
        .and_then(LogLevel::from_u8)
        .or_else(|| defaults.map(|g| g.output_log_level))
        .unwrap_or(LogLevel::WARN);

    let file_level = global
        .file_log_level
        .and_then(LogLevel::from_u8)
        .or_else(|| global.log_level.and_then(LogLevel::from_u8))
        .or_else(|| defaults.map(|g| g.file_log_level))
        .unwrap_or(LogLevel::TRACE);

    let log_file = global
        .log_file
        .clone()
        .or_else(|| defaults.and_then(|g| g.log_file()).map(std::path::Path::to_path_buf));

    LogConfig::builder()
        .with_console_level(console_level)
        .with_file_level(file_level)
        .maybe_with_log_file(log_file.map(|p| p.display().to_string()))
        .build()
}

async fn dispatch_command(cli: &cli::Cli, config: Option<&Config>) -> Result<ExitCode> {
    let Some(command) = &cli.command else {
        eprintln!("No command specified. Use --help for usage information.");
        return Ok(ExitCode::FAILURE);
    };

    match (command, config) {
        (Command::Version, _) => handle_version_command(),
        (Command::Inis, _) => {
            let loader = build_config_loader(&cli.global);
            run_inis_command(&loader.format_loaded_files());
        }
        (Command::Options, Some(config)) => run_options_command(config),
        (Command::Clone(args), Some(config)) => {
            return Ok(run_clone_command(args, config).await);
        }
        (Command::LastUsed, Some(config)) => run_last_used_command(config),
        (Command::Log(args), Some(config)) => run_log_command(args, config).await?,
        (_, None) => return Err(bail_out("configuration was not loaded").into()),
    }
    Ok(ExitCode::SUCCESS)
}

fn handle_version_command() {
    println!("{}", env!("CARGO_PKG_VERSION"));
}

fn build_config_loader(global: &GlobalOptions) -> ConfigLoader {
    let mut loader = ConfigLoader::new().add_toml_file_optional(DEFAULT_CONFIG_FILE);
    for path in &global.configs {
        loader = loader.add_toml_file(path);
    }
    loader.with_env_prefix(ENV_PREFIX)
}

fn load_config(global: &GlobalOptions) -> Result<Config> {
    let mut loader = build_config_loader(global);
    for option in global.to_config_overrides() {
        loader = loader.set_override(&option)?;
    }
    loader.build()
}
