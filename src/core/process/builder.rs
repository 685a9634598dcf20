// gitgood: Git Good - contained git hosting over ssh
//
// SPDX-FileCopyrightText: 2026 Git Good Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Process builder with configuration options.
//!
//! ```text
//! ProcessBuilder
//!  • new/which/find
//!  • arg/cwd/env/clear_env/flag/name
//!
//! ProcessFlags: ALLOW_FAILURE, CLEAR_ENV
//! ```

use bitflags::bitflags;
use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, PoisonError, RwLock};

use crate::error::CommandError;

/// `PATH` lookups, kept for the life of the process.
static RESOLVED: LazyLock<RwLock<BTreeMap<String, PathBuf>>> =
    LazyLock::new(|| RwLock::new(BTreeMap::new()));

bitflags! {
    /// Flags controlling process execution behavior.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ProcessFlags: u32 {
        /// Don't fail if the process exits with a non-zero status
        const ALLOW_FAILURE = 0x01;
        /// Start the child with an empty environment
        const CLEAR_ENV = 0x02;
    }
}

/// Outcome of a completed process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessOutput {
    exit_code: i32,
}

impl ProcessOutput {
    pub(super) const fn new(exit_code: i32) -> Self {
        Self { exit_code }
    }

    /// Returns the process exit code (-1 when killed by a signal).
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        self.exit_code
    }

    /// Returns true if the process exited successfully (code 0).
    #[must_use]
    pub const fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// One child process, described before it is spawned.
#[derive(Debug, Clone)]
pub struct ProcessBuilder {
    program: PathBuf,
    args: Vec<String>,
    cwd: Option<PathBuf>,
    /// Applied after the environment is cleared, if it is
    env: BTreeMap<String, String>,
    flags: ProcessFlags,
    name: Option<String>,
}

impl ProcessBuilder {
    /// A builder for `program`, used as given (no `PATH` lookup).
    pub fn new(program: impl AsRef<Path>) -> Self {
        Self {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            cwd: None,
            env: BTreeMap::new(),
            flags: ProcessFlags::empty(),
            name: None,
        }
    }

    /// A builder for `program` as found on `PATH`, named after `program`.
    ///
    /// # Errors
    ///
    /// Returns `CommandError::ExecutableNotFound` without spawning anything.
    pub fn which(program: &str) -> Result<Self, CommandError> {
        Self::find(program)
            .map(|path| Self::new(path).name(program))
            .ok_or_else(|| CommandError::ExecutableNotFound {
                name: program.to_string(),
            })
    }

    /// Whether `program` can be found on `PATH`.
    #[must_use]
    pub fn exists(program: &str) -> bool {
        Self::find(program).is_some()
    }

    /// Full path of `program` on `PATH`. Hits are cached; misses are not,
    /// so a binary installed later is still found.
    #[must_use]
    pub fn find(program: &str) -> Option<PathBuf> {
        let cached = RESOLVED
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(program)
            .cloned();
        if cached.is_some() {
            return cached;
        }

        let found = which::which(program).ok()?;
        RESOLVED
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(program.to_string(), found.clone());
        Some(found)
    }

    /// Appends one argument.
    #[must_use]
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_string_lossy().into_owned());
        self
    }

    /// Working directory of the child.
    #[must_use]
    pub fn cwd(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Sets one environment variable for the process.
    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Starts the child with no inherited environment.
    #[must_use]
    pub fn clear_env(self) -> Self {
        self.flag(ProcessFlags::CLEAR_ENV)
    }

    /// Sets one more flag.
    #[must_use]
    pub fn flag(mut self, flag: ProcessFlags) -> Self {
        self.flags |= flag;
        self
    }

    /// Name used in logs and error messages instead of the program path.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// The program path as given or as found on `PATH`.
    #[must_use]
    pub const fn program(&self) -> &PathBuf {
        &self.program
    }

    pub(super) fn args_slice(&self) -> &[String] {
        &self.args
    }

    pub(super) const fn working_dir(&self) -> Option<&PathBuf> {
        self.cwd.as_ref()
    }

    pub(super) const fn environment(&self) -> &BTreeMap<String, String> {
        &self.env
    }

    pub(super) const fn process_flags(&self) -> ProcessFlags {
        self.flags
    }

    pub(super) fn name_override(&self) -> Option<&str> {
        self.name.as_deref()
    }
}
