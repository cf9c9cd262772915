// gitbackup: Git Clone Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management for gitbackup.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults
//! 2. gitbackup.toml (cwd, optional)
//! 3. --config FILE (repeatable)
//! 4. GITBACKUP_* env vars
//! 5. --set KEY=VALUE and logging flags
//! ```
//!
//! # Environment Variable Mapping
//!
//! ```text
//! GITBACKUP_GIT__PROGRAM=/usr/bin/git     → git.program = "/usr/bin/git"
//! GITBACKUP_GIT__PROBE_TIMEOUT_SECS=30    → git.probe_timeout_secs = 30
//! GITBACKUP_FILES__SETTINGS=state.json    → files.settings = "state.json"
//! ```

pub mod loader;
pub mod types;


use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{ConfigError, Result};

use loader::ConfigLoader;
use types::{FilesConfig, GitConfig, GlobalConfig};

/// Name of the optional configuration file in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "gitbackup.toml";

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "GITBACKUP";

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Global options.
    pub global: GlobalConfig,
    /// Git invocation.
    pub git: GitConfig,
    /// Settings and activity log locations.
    pub files: FilesConfig,
}

impl Config {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use gitbackup::config::Config;
    ///
    /// let config = Config::builder()
    ///     .add_toml_file_optional("gitbackup.toml")
    ///     .with_env_prefix("GITBACKUP")
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load configuration from a single TOML file (simple API).
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid TOML, or
    /// does not match the `Config` structure.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::builder().add_toml_file(path).build()
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML or does not match the
    /// `Config` structure.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// Checks value ranges serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for a zero probe timeout or an
    /// empty git program.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.git.probe_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                section: "git".to_string(),
                key: "probe_timeout_secs".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.git.program.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                section: "git".to_string(),
                key: "program".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Format configuration options for display.
    ///
    /// One `key = value` line per option, keys aligned and sorted.
    #[must_use]
    pub fn format_options(&self) -> Vec<String> {
        let mut options = BTreeMap::new();
        self.format_global_options(&mut options);
        self.format_git_options(&mut options);
        self.format_files_options(&mut options);

        let max_key_len = options.keys().map(String::len).max().unwrap_or(0);

        options
            .into_iter()
            .map(|(key, value)| format!("{key:<max_key_len$} = {value}"))
            .collect()
    }

    fn format_global_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert(
            "global.output_log_level".into(),
            self.global.output_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.file_log_level".into(),
            self.global.file_log_level.as_u8().to_string(),
        );
        let log_file = self
            .global
            .log_file()
            .map_or_else(|| "(none)".to_string(), |p| p.display().to_string());
        options.insert("global.log_file".into(), log_file);
    }

    fn format_git_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert("git.program".into(), self.git.program.clone());
        options.insert(
            "git.probe_timeout_secs".into(),
            self.git.probe_timeout_secs.to_string(),
        );
    }

    fn format_files_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert(
            "files.settings".into(),
            self.files.settings.display().to_string(),
        );
        options.insert(
            "files.activity_log".into(),
            self.files.activity_log.display().to_string(),
        );
    }
}
