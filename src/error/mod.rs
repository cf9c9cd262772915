// gitbackup: Git Clone Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!             BackupError (~24 bytes)
//!                     |
//!   +-----+-----+-----+-----+-----+-----+-----+
//!   |     |     |     |     |     |     |     |
//!   v     v     v     v     v     v     v     v
//! Valid  Git  Proc   Cfg   Fs   Zip  Sett  Io/Other
//!  Box   Box   Box   Box   Box   Box   Box  Box<str>
//!
//! Sub-errors (unboxed internally):
//!   Validation MissingFields
//!   Git        UnreachableRepository, Launch, InvalidPath, CloneFailed
//!   Process    ExecutableNotFound, SpawnFailed, NonZeroExit, Timeout
//!   Config     InvalidValue
//!   Fs         NotFound, PermissionDenied, IoError
//!   Archive    Walk, Io, Zip
//!   Settings   Write, Serialize
//!
//! All variants boxed => BackupError fits in 24 bytes.
//! ```

use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`BackupError`].
pub type BackupResult<T> = std::result::Result<T, BackupError>;

/// Top-level application error type.
///
/// All sub-errors are boxed to keep this enum at ~24 bytes on the stack.
#[derive(Debug, Error)]
pub enum BackupError {
    /// Fatal error that should terminate the application.
    #[error("fatal error: {0}")]
    Bailed(Box<str>),

    /// Request rejected before any side effect.
    #[error("{0}")]
    Validation(#[from] Box<ValidationError>),

    /// Git operation failed.
    #[error("git error: {0}")]
    Git(#[from] Box<GitError>),

    /// Process execution error.
    #[error("process error: {0}")]
    Process(#[from] Box<ProcessError>),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] Box<ConfigError>),

    /// Filesystem error.
    #[error("filesystem error: {0}")]
    Fs(#[from] Box<FsError>),

    /// Archive creation error.
    #[error("archive error: {0}")]
    Archive(#[from] Box<ArchiveError>),

    /// Settings persistence error.
    #[error("settings error: {0}")]
    Settings(#[from] Box<SettingsError>),

    /// I/O error.
    #[error("io error: {0}")]
    Io(Box<std::io::Error>),

    /// Generic error with message.
    #[error("{0}")]
    Other(Box<str>),
}

/// Create a fatal [`BackupError::Bailed`] that terminates the application.
pub fn bail_out(message: impl Into<String>) -> BackupError {
    BackupError::Bailed(message.into().into_boxed_str())
}

// --- From implementations for boxing ---

/// Macro to generate `From` implementations that box the source error.
macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for BackupError {
                fn from(err: $error) -> Self {
                    BackupError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    ValidationError => Validation,
    GitError => Git,
    ProcessError => Process,
    ConfigError => Config,
    FsError => Fs,
    ArchiveError => Archive,
    SettingsError => Settings,
    std::io::Error => Io,
}

// --- Validation Errors ---

/// Request validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// One or more required fields are empty after trimming.
    #[error("Please fill in all fields (missing: {})", .fields.join(", "))]
    MissingFields { fields: Vec<&'static str> },
}

// --- Git Errors ---

/// Git operation errors.
#[derive(Debug, Error)]
pub enum GitError {
    /// `git ls-remote` failed or timed out.
    #[error("repository unreachable: {url}")]
    UnreachableRepository { url: String },

    /// The git executable could not be started at all.
    #[error("failed to launch git: {0}")]
    Launch(#[source] ProcessError),

    /// Path cannot be passed to git as UTF-8.
    #[error("invalid path for git: {path}")]
    InvalidPath { path: String },

    /// `git clone` ran and exited with a non-zero status.
    #[error("failed to clone {url} (exit status {exit_status}): {captured_output}")]
    CloneFailed {
        url: String,
        exit_status: i32,
        captured_output: String,
    },
}

// --- Process Errors ---

/// Process execution errors.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Executable not found in PATH.
    #[error("executable not found: '{name}' (not in PATH)")]
    ExecutableNotFound { name: String },

    /// Failed to spawn process.
    #[error("failed to spawn process '{command}': {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Process exited with non-zero status.
    #[error("process '{command}' exited with code {code}")]
    NonZeroExit {
        command: String,
        code: i32,
        stderr: String,
    },

    /// Process timed out.
    #[error("process '{command}' timed out after {timeout_secs} seconds")]
    Timeout { command: String, timeout_secs: u64 },

    /// Failed to read process output or wait for the process.
    #[error("failed to read output from process '{command}': {message}")]
    OutputError { command: String, message: String },
}

// --- Config Errors ---

/// Configuration-related errors.
///
/// Parse and layout errors come from the `config` crate and travel as `anyhow`
/// context; this type covers values the layout accepts but the program does not.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },
}

// --- Filesystem Errors ---

/// Filesystem operation errors.
#[derive(Debug, Error)]
pub enum FsError {
    /// Path not found.
    #[error("path not found: {0}")]
    NotFound(String),

    /// Permission denied.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// General I/O error.
    #[error("I/O error on '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl FsError {
    /// Classify an `io::Error` raised while touching `path`.
    #[must_use]
    pub fn from_io(path: &std::path::Path, source: std::io::Error) -> Self {
        let display = path.display().to_string();
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(display),
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(display),
            _ => Self::IoError {
                path: display,
                source,
            },
        }
    }
}

// --- Archive Errors ---

/// ZIP archive creation errors.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// Directory traversal failed.
    #[error("failed to walk '{path}': {message}")]
    Walk { path: String, message: String },

    /// Reading a source file or writing the archive failed.
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The ZIP writer rejected an entry.
    #[error("zip error on '{path}': {source}")]
    Zip {
        path: String,
        #[source]
        source: zip::result::ZipError,
    },
}

// --- Settings Errors ---

/// Last-used settings persistence errors.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Writing the settings file failed.
    #[error("failed to write settings file '{path}': {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Serializing the settings failed.
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] serde_json::Error),
}
