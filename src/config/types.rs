// gitbackup: Git Clone Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration types for gitbackup.
//!
//! # Config Structure
//!
//! ```text
//! Config
//!   [global]  output_log_level, file_log_level, log_file
//!   [git]     program, probe_timeout_secs
//!   [files]   settings, activity_log
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::logging::LogLevel;
use crate::settings::DEFAULT_SETTINGS_FILE;

/// Default activity log file name, relative to the working directory.
pub const DEFAULT_ACTIVITY_LOG: &str = "log.txt";

/// Global configuration options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Log level for console output (0-6).
    pub output_log_level: LogLevel,
    /// Log level for file output (0-6).
    pub file_log_level: LogLevel,
    /// Diagnostics log file; empty disables the file layer.
    pub log_file: PathBuf,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            output_log_level: LogLevel::WARN,
            file_log_level: LogLevel::TRACE,
            log_file: PathBuf::new(),
        }
    }
}

impl GlobalConfig {
    /// Returns the diagnostics log file, if one is configured.
    #[must_use]
    pub fn log_file(&self) -> Option<&std::path::Path> {
        (!self.log_file.as_os_str().is_empty()).then_some(self.log_file.as_path())
    }
}

/// Git invocation options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GitConfig {
    /// Git executable name or path.
    pub program: String,
    /// Upper bound for the `git ls-remote` reachability probe.
    pub probe_timeout_secs: u64,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            program: "git".to_string(),
            probe_timeout_secs: 10,
        }
    }
}

impl GitConfig {
    #[must_use]
    pub const fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }
}

/// Locations of the files the workflow reads and writes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilesConfig {
    /// Last-used settings JSON.
    pub settings: PathBuf,
    /// Append-only activity log.
    pub activity_log: PathBuf,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            settings: PathBuf::from(DEFAULT_SETTINGS_FILE),
            activity_log: PathBuf::from(DEFAULT_ACTIVITY_LOG),
        }
    }
}
