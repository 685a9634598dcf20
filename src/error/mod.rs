// gitgood: Git Good - contained git hosting over ssh
//
// SPDX-FileCopyrightText: 2026 Git Good Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!               GitGoodError (16 bytes)
//!                      |
//!   +--------+-------+-------+-------+-------+------+
//!   |        |       |       |       |       |      |
//!   v        v       v       v       v       v      v
//! Argument  Jail  Command   Repo   FileOp  Config   Io
//!   Box     Box     Box     Box     Box     Box    Box
//!
//! Sub-errors (unboxed internally):
//!   Argument  Empty, AbsolutePath, ParentTraversal, InvalidRepoPath
//!   Jail      PathEscape, RootUnavailable, Resolve
//!   Command   NotAllowed, ExecutableNotFound, SpawnFailed, NonZeroExit
//!   Repo      InvalidIdentifier, AlreadyExists, CreateDirFailed, InitFailed
//!   FileOp    Jail, Io, MissingTarget, Unsupported
//!   Config    MissingKey, InvalidValue
//!
//! All variants boxed => GitGoodError fits in 16 bytes.
//! ```
//!
//! Messages produced here are shown to remote callers, so none of them embed
//! host paths: only the client-supplied string or the `owner/name` pair.

use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`GitGoodError`].
pub type GitGoodResult<T> = std::result::Result<T, GitGoodError>;

/// Top-level application error type.
///
/// All sub-errors are boxed to keep this enum at 16 bytes on the stack.
#[derive(Debug, Error)]
pub enum GitGoodError {
    /// Client-supplied argument has an invalid shape.
    #[error("invalid argument: {0}")]
    Argument(#[from] Box<ArgumentError>),

    /// Path resolution left the jail.
    #[error("jail error: {0}")]
    Jail(#[from] Box<JailError>),

    /// Service command rejected or failed.
    #[error("command error: {0}")]
    Command(#[from] Box<CommandError>),

    /// Repository provisioning failed.
    #[error("repository error: {0}")]
    Repo(#[from] Box<RepoError>),

    /// File-transfer operation failed.
    #[error("file operation error: {0}")]
    FileOp(#[from] Box<FileOpError>),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] Box<ConfigError>),

    /// I/O error.
    #[error("io error: {0}")]
    Io(Box<std::io::Error>),
}

// --- From implementations for boxing ---

/// Macro to generate `From` implementations that box the source error.
macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for GitGoodError {
                fn from(err: $error) -> Self {
                    GitGoodError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    ArgumentError => Argument,
    JailError => Jail,
    CommandError => Command,
    RepoError => Repo,
    FileOpError => FileOp,
    ConfigError => Config,
    std::io::Error => Io,
}

// --- Argument Errors ---

/// Shape and validation failures on client-supplied strings.
///
/// Raised before any filesystem or subprocess interaction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArgumentError {
    /// Argument was empty after trimming whitespace and quotes.
    #[error("empty repository argument")]
    Empty,

    /// Argument was an absolute host path.
    #[error("absolute paths are not allowed")]
    AbsolutePath,

    /// Argument still climbs above its root after cleaning.
    #[error("parent traversal is not allowed")]
    ParentTraversal,

    /// Argument is not of the form `owner/name`.
    #[error("invalid repository path '{0}'")]
    InvalidRepoPath(String),

    /// A single owner or name component breaks the naming policy.
    #[error("invalid name '{0}'")]
    InvalidComponent(String),
}

// --- Jail Errors ---

/// Path Jail errors.
#[derive(Debug, Error)]
pub enum JailError {
    /// Resolved path would fall outside the jail root.
    #[error("path '{path}' escapes jail")]
    PathEscape { path: String },

    /// The jail root itself could not be resolved.
    #[error("jail root is unavailable")]
    RootUnavailable(#[source] std::io::Error),

    /// Following links under the jail failed.
    #[error("cannot resolve '{path}': {source}")]
    Resolve {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl JailError {
    pub(crate) fn escape(path: impl Into<String>) -> Self {
        Self::PathEscape { path: path.into() }
    }
}

// --- Command Errors ---

/// Service command errors.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Command name is not on the allow-list.
    #[error("command not allowed: '{command}'")]
    NotAllowed { command: String },

    /// Allow-listed executable could not be located.
    #[error("executable not found: '{name}'")]
    ExecutableNotFound { name: String },

    /// Failed to spawn process.
    #[error("failed to spawn '{command}': {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Process exited with non-zero status.
    #[error("'{command}' exited with code {code}")]
    NonZeroExit { command: String, code: i32 },

    /// Waiting on the process or relaying its streams failed.
    #[error("i/o failure while running '{command}': {source}")]
    Relay {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

// --- Repository Errors ---

/// Repository provisioning errors.
#[derive(Debug, Error)]
pub enum RepoError {
    /// Owner or name violates the naming policy.
    #[error("invalid repository identifier '{0}'")]
    InvalidIdentifier(String),

    /// Repository directory is already present.
    #[error("repository '{0}' already exists")]
    AlreadyExists(String),

    /// Directory creation failed.
    #[error("failed to create directory for '{repo}': {source}")]
    CreateDirFailed {
        repo: String,
        #[source]
        source: std::io::Error,
    },

    /// Initialising the empty repository failed.
    ///
    /// The engine's error is kept as the source only; its text may carry
    /// host paths.
    #[error("failed to initialize '{repo}'")]
    InitFailed {
        repo: String,
        #[source]
        source: Box<gix::init::Error>,
    },
}

// --- File Operation Errors ---

/// File-transfer operation errors.
///
/// Host I/O errors are carried unchanged so the protocol engine can map
/// them onto its own status codes via [`FileOpError::io_kind`].
#[derive(Debug, Error)]
pub enum FileOpError {
    /// Path resolution failed.
    #[error(transparent)]
    Jail(#[from] JailError),

    /// Host filesystem error.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Method requires a target path but none was given.
    #[error("missing target for {method}")]
    MissingTarget { method: &'static str },

    /// Method is not valid for this entry point.
    #[error("unsupported {entry} method: {method}")]
    Unsupported {
        entry: &'static str,
        method: &'static str,
    },
}

impl FileOpError {
    /// The underlying host error kind, if this is a host I/O failure.
    #[must_use]
    pub fn io_kind(&self) -> Option<std::io::ErrorKind> {
        match self {
            Self::Io(e) => Some(e.kind()),
            Self::Jail(JailError::RootUnavailable(e) | JailError::Resolve { source: e, .. }) => {
                Some(e.kind())
            }
            _ => None,
        }
    }
}

// --- Config Errors ---

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Missing required configuration key.
    #[error("missing required config key '{key}' in section '[{section}]'")]
    MissingKey { section: String, key: String },

    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },
}
