// gitbackup: Git Clone Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Command description for git and viewer subprocesses.
//!
//! ```text
//! ProcessBuilder
//!  • new/which/find
//!  • arg/args/env/flag/name/timeout
//!  • capture_output, quiet
//!
//! ProcessFlags: ALLOW_FAILURE
//! StreamFlags: FORWARD_TO_LOG (default), BIT_BUCKET, KEEP_IN_STRING
//! ```

use bitflags::bitflags;
use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::{OnceLock, RwLock};
use std::time::Duration;

use crate::error::ProcessError;

/// Resolved executables, keyed by the name that was looked up.
static EXECUTABLE_CACHE: OnceLock<RwLock<BTreeMap<String, PathBuf>>> = OnceLock::new();

fn exe_cache() -> &'static RwLock<BTreeMap<String, PathBuf>> {
    EXECUTABLE_CACHE.get_or_init(|| RwLock::new(BTreeMap::new()))
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ProcessFlags: u32 {
        /// Report non-zero exits through `ProcessOutput` instead of an error
        const ALLOW_FAILURE = 0x01;
    }
}

bitflags! {
    /// What happens to a child's stdout or stderr.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct StreamFlags: u32 {
        /// Each line becomes a `trace!` event
        const FORWARD_TO_LOG = 0x01;
        /// Stream is attached to the null device
        const BIT_BUCKET = 0x02;
        /// Lines are collected into `ProcessOutput`
        const KEEP_IN_STRING = 0x04;
    }
}

impl Default for StreamFlags {
    fn default() -> Self {
        Self::FORWARD_TO_LOG
    }
}

/// Output from a completed process.
#[derive(Debug, Clone, Default)]
pub struct ProcessOutput {
    exit_code: i32,
    stdout: String,
    stderr: String,
}

impl ProcessOutput {
    pub(super) const fn new(exit_code: i32, stdout: String, stderr: String) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
        }
    }

    /// Exit code, or -1 when the child was ended by a signal.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        self.exit_code
    }

    #[must_use]
    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    #[must_use]
    pub fn stderr(&self) -> &str {
        &self.stderr
    }

    /// Trimmed stderr followed by trimmed stdout, skipping empty ones.
    #[must_use]
    pub fn combined_output(&self) -> String {
        [self.stderr.trim(), self.stdout.trim()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[must_use]
    pub const fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// A subprocess to run: program, arguments, environment and output handling.
///
/// Children start with stdin on the null device and exit code 0 as the only
/// success unless `ALLOW_FAILURE` is set.
#[derive(Debug)]
pub struct ProcessBuilder {
    program: PathBuf,
    args: Vec<String>,
    /// Added on top of the inherited environment
    env: Vec<(String, String)>,
    flags: ProcessFlags,
    stdout: StreamFlags,
    stderr: StreamFlags,
    /// Shown in logs instead of the program's file stem
    name: Option<String>,
    timeout: Option<Duration>,
}

impl ProcessBuilder {
    /// `program` is used as given; see [`Self::which`] for PATH lookup.
    pub fn new(program: impl AsRef<Path>) -> Self {
        Self {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            env: Vec::new(),
            flags: ProcessFlags::empty(),
            stdout: StreamFlags::default(),
            stderr: StreamFlags::default(),
            name: None,
            timeout: None,
        }
    }

    /// Resolves `program` on PATH before building.
    ///
    /// # Errors
    ///
    /// Returns `ProcessError::ExecutableNotFound` when PATH has no match.
    pub fn which(program: &str) -> Result<Self, ProcessError> {
        let path = Self::find(program).ok_or_else(|| ProcessError::ExecutableNotFound {
            name: program.to_string(),
        })?;
        Ok(Self::new(path))
    }

    /// PATH lookup, remembered for the life of the process.
    #[must_use]
    pub fn find(program: &str) -> Option<PathBuf> {
        let cached = exe_cache()
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(program)
            .cloned();
        if cached.is_some() {
            return cached;
        }

        let path = which::which(program).ok()?;
        exe_cache()
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(program.to_string(), path.clone());
        Some(path)
    }

    #[must_use]
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_string_lossy().into_owned());
        self
    }

    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        for arg in args {
            self.args.push(arg.as_ref().to_string_lossy().into_owned());
        }
        self
    }

    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    #[must_use]
    pub fn flag(mut self, flag: ProcessFlags) -> Self {
        self.flags |= flag;
        self
    }

    /// Keeps both streams for [`ProcessOutput`] and traces each line.
    #[must_use]
    pub const fn capture_output(mut self) -> Self {
        let keep = StreamFlags::KEEP_IN_STRING.union(StreamFlags::FORWARD_TO_LOG);
        self.stdout = keep;
        self.stderr = keep;
        self
    }

    /// Sends both streams to the null device.
    #[must_use]
    pub const fn quiet(mut self) -> Self {
        self.stdout = StreamFlags::BIT_BUCKET;
        self.stderr = StreamFlags::BIT_BUCKET;
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Past `duration` the child is killed and the run fails with `Timeout`.
    #[must_use]
    pub const fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    pub(super) const fn program(&self) -> &PathBuf {
        &self.program
    }

    pub(super) fn args_slice(&self) -> &[String] {
        &self.args
    }

    pub(super) fn extra_env(&self) -> &[(String, String)] {
        &self.env
    }

    pub(super) const fn process_flags(&self) -> ProcessFlags {
        self.flags
    }

    pub(super) const fn stdout_flags_value(&self) -> StreamFlags {
        self.stdout
    }

    pub(super) const fn stderr_flags_value(&self) -> StreamFlags {
        self.stderr
    }

    pub(super) fn name_override(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub(super) const fn timeout_duration(&self) -> Option<Duration> {
        self.timeout
    }
}
