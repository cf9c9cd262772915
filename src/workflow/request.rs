// gitbackup: Git Clone Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Clone request, validation and target naming.

use bon::Builder;
use chrono::NaiveDateTime;
use std::path::PathBuf;

use crate::error::ValidationError;

/// Inputs for one workflow run.
///
/// # Example
/// ```
/// use gitbackup::workflow::CloneRequest;
///
/// let request = CloneRequest::builder()
///     .with_repository_url("https://github.com/owner/repo.git")
///     .with_folder_name("repo")
///     .with_destination_directory("/backups")
///     .with_backup_suffix(true)
///     .build();
/// assert!(request.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
pub struct CloneRequest {
    #[builder(into, setters(name = with_repository_url))]
    repository_url: String,
    #[builder(into, setters(name = with_folder_name))]
    folder_name: String,
    #[builder(into, setters(name = with_destination_directory))]
    destination_directory: String,
    /// Append `_backup_<YYYYMMDD>_<HHMMSS>` to the folder name
    #[builder(setters(name = with_backup_suffix), default = false)]
    add_timestamp_suffix: bool,
    /// Zip the clone into `<target>.zip`
    #[builder(setters(name = with_archive), default = false)]
    create_archive: bool,
}

impl CloneRequest {
    #[must_use]
    pub fn repository_url(&self) -> &str {
        &self.repository_url
    }

    #[must_use]
    pub fn folder_name(&self) -> &str {
        &self.folder_name
    }

    #[must_use]
    pub fn destination_directory(&self) -> &str {
        &self.destination_directory
    }

    #[must_use]
    pub const fn add_timestamp_suffix(&self) -> bool {
        self.add_timestamp_suffix
    }

    #[must_use]
    pub const fn create_archive(&self) -> bool {
        self.create_archive
    }

    /// Checks that every text field is non-empty after trimming and returns
    /// the trimmed request.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::MissingFields` naming each empty field.
    pub fn validate(&self) -> Result<Self, ValidationError> {
        let fields = [
            ("repository URL", self.repository_url.trim()),
            ("folder name", self.folder_name.trim()),
            ("destination directory", self.destination_directory.trim()),
        ];
        let missing: Vec<&'static str> = fields
            .iter()
            .filter(|(_, value)| value.is_empty())
            .map(|(name, _)| *name)
            .collect();
        if !missing.is_empty() {
            return Err(ValidationError::MissingFields { fields: missing });
        }

        Ok(Self {
            repository_url: fields[0].1.to_string(),
            folder_name: fields[1].1.to_string(),
            destination_directory: fields[2].1.to_string(),
            ..*self
        })
    }
}

/// `<destination>/<folder>` or `<destination>/<folder>_backup_<YYYYMMDD>_<HHMMSS>`.
#[must_use]
pub fn compute_target_directory(request: &CloneRequest, now: NaiveDateTime) -> PathBuf {
    let folder = if request.add_timestamp_suffix() {
        format!(
            "{}_backup_{}",
            request.folder_name(),
            now.format("%Y%m%d_%H%M%S")
        )
    } else {
        request.folder_name().to_string()
    };
    PathBuf::from(request.destination_directory()).join(folder)
}

/// Repository name from a clone URL, used as the default folder name.
///
/// ```text
/// https://github.com/owner/repo.git   --> repo
/// git@github.com:owner/repo.git       --> repo
/// /srv/git/project/                   --> project
/// ```
#[must_use]
pub fn repository_name(url: &str) -> Option<&str> {
    let trimmed = url.trim().trim_end_matches(['/', '\\']);
    let last = trimmed.rsplit(['/', '\\', ':']).next()?;
    let name = last.strip_suffix(".git").unwrap_or(last);
    (!name.is_empty()).then_some(name)
}
