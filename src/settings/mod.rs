// gitbackup: Git Clone Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Last-used repository settings.
//!
//! ```text
//! last_used_repo.json
//!   { "github_url": "<url>", "path": "<destination>" }
//!
//! load()     absent / malformed / non-object  --> defaults
//! persist()  NamedTempFile (same dir) --> write --> rename over target
//! ```

use serde::{Deserialize, Serialize};
use std::io::Write as _;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::{BackupResult, SettingsError};

/// Default settings file name, relative to the working directory.
pub const DEFAULT_SETTINGS_FILE: &str = "last_used_repo.json";

/// The URL/path pair restored to pre-fill the next invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastUsedSettings {
    #[serde(rename = "github_url", default)]
    pub repository_url: String,
    #[serde(rename = "path", default)]
    pub destination_directory: String,
}

impl LastUsedSettings {
    #[must_use]
    pub fn new(repository_url: impl Into<String>, destination_directory: impl Into<String>) -> Self {
        Self {
            repository_url: repository_url.into(),
            destination_directory: destination_directory.into(),
        }
    }

    /// Extracts known keys from a parsed JSON value, ignoring anything else.
    fn from_json(value: &serde_json::Value) -> Option<Self> {
        let object = value.as_object()?;
        let field = |key: &str| {
            object
                .get(key)
                .and_then(serde_json::Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        Some(Self::new(field("github_url"), field("path")))
    }
}

/// File-backed store for [`LastUsedSettings`].
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new(DEFAULT_SETTINGS_FILE)
    }
}

impl SettingsStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the settings file. Never fails; anything unusable yields defaults.
    #[must_use]
    pub fn load(&self) -> LastUsedSettings {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no last-used settings");
                return LastUsedSettings::default();
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to read last-used settings");
                return LastUsedSettings::default();
            }
        };

        match serde_json::from_str::<serde_json::Value>(&content) {
            Ok(value) => LastUsedSettings::from_json(&value).unwrap_or_else(|| {
                warn!(path = %self.path.display(), "last-used settings is not a JSON object");
                LastUsedSettings::default()
            }),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "malformed last-used settings");
                LastUsedSettings::default()
            }
        }
    }

    /// Overwrites the settings file atomically.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::Serialize` or `SettingsError::Write`.
    pub fn persist(&self, settings: &LastUsedSettings) -> BackupResult<()> {
        let json = serde_json::to_string_pretty(settings).map_err(SettingsError::from)?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let write_error = |source: std::io::Error| SettingsError::Write {
            path: self.path.display().to_string(),
            source,
        };

        std::fs::create_dir_all(dir).map_err(write_error)?;
        let mut temp = NamedTempFile::new_in(dir).map_err(write_error)?;
        temp.write_all(json.as_bytes()).map_err(write_error)?;
        temp.as_file().sync_all().map_err(write_error)?;
        temp.persist(&self.path).map_err(|e| write_error(e.error))?;

        debug!(path = %self.path.display(), "persisted last-used settings");
        Ok(())
    }
}
