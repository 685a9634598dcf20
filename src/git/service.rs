// gitgood: Git Good - contained git hosting over ssh
//
// SPDX-FileCopyrightText: 2026 Git Good Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Allow-listed git service commands and their dispatcher.
//!
//! ```text
//! dispatch("git-upload-pack", "'alice/proj'", io)
//!    |
//!    |-- 1. ServiceCommand::from_str     NotAllowed  --> no I/O
//!    |-- 2. RepositoryIdentifier          ArgumentError
//!    |-- 3. PathJail::resolve_real        JailError
//!    |-- 4. locate executable             ExecutableNotFound
//!    v
//! spawn  cwd=<root>  argv=[owner/name]  env={}  stdio relayed
//!    |
//!    v
//! DispatchOutcome { repo_path, exit_code }
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, info, warn};

use crate::core::process::builder::ProcessBuilder;
use crate::error::{CommandError, GitGoodResult};
use crate::jail::{Follow, PathJail};
use crate::namespace::RepositoryIdentifier;

/// The closed set of git entry points a session may start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceCommand {
    /// Serves fetch and clone.
    UploadPack,
    /// Accepts pushes.
    ReceivePack,
}

impl ServiceCommand {
    /// Every allow-listed command.
    pub const ALL: [Self; 2] = [Self::UploadPack, Self::ReceivePack];

    /// The executable name, which is also the wire command name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UploadPack => "git-upload-pack",
            Self::ReceivePack => "git-receive-pack",
        }
    }
}

impl fmt::Display for ServiceCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceCommand {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|cmd| cmd.as_str() == s)
            .ok_or_else(|| CommandError::NotAllowed {
                command: s.to_string(),
            })
    }
}

/// Result of a completed service command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// Host directory the command ran against.
    pub repo_path: PathBuf,
    /// Exit code of the service process.
    pub exit_code: i32,
}

/// Runs allow-listed git services against repositories under one jail.
#[derive(Debug, Clone)]
pub struct CommandDispatcher {
    jail: PathJail,
    exec_dir: Option<PathBuf>,
}

impl CommandDispatcher {
    /// Create a dispatcher for repositories under `jail`.
    ///
    /// Service executables are taken from `exec_dir` when given, else from
    /// `PATH`.
    #[must_use]
    pub const fn new(jail: PathJail, exec_dir: Option<PathBuf>) -> Self {
        Self { jail, exec_dir }
    }

    /// The repository jail.
    #[must_use]
    pub const fn jail(&self) -> &PathJail {
        &self.jail
    }

    /// Validate `command` and `repo_arg`, then run the service with its
    /// stdio wired to the given streams.
    ///
    /// Validation happens strictly in order and nothing is spawned unless
    /// every gate passes. The child runs with an empty environment, the jail
    /// root as its working directory, and `owner/name` as its only argument.
    ///
    /// # Errors
    ///
    /// - [`CommandError::NotAllowed`] for anything but the two service names.
    /// - [`crate::error::ArgumentError`] if `repo_arg` is not a valid
    ///   `owner/name`.
    /// - [`crate::error::JailError`] if the repository resolves outside the
    ///   jail.
    /// - [`CommandError`] if the executable is missing, fails to spawn, or
    ///   exits non-zero.
    pub async fn dispatch<I, O, E>(
        &self,
        command: &str,
        repo_arg: &str,
        stdin: I,
        stdout: O,
        stderr: E,
    ) -> GitGoodResult<DispatchOutcome>
    where
        I: AsyncRead + Unpin,
        O: AsyncWrite + Unpin,
        E: AsyncWrite + Unpin,
    {
        let service = command.parse::<ServiceCommand>().inspect_err(|_| {
            warn!(command = %command, "rejected service command");
        })?;

        let repo = RepositoryIdentifier::from_arg(repo_arg).inspect_err(|e| {
            warn!(command = %service, error = %e, "rejected repository argument");
        })?;

        let repo_path = self.jail.resolve_real(&repo.path(), Follow::Final)?;

        let program = self.locate(service)?;
        info!(command = %service, repo = %repo, "dispatching");

        let output = program
            .arg(repo.path())
            .cwd(self.jail.root())
            .clear_env()
            .run_relayed(stdin, stdout, stderr)
            .await?;

        debug!(command = %service, repo = %repo, exit_code = output.exit_code(), "service finished");
        Ok(DispatchOutcome {
            repo_path,
            exit_code: output.exit_code(),
        })
    }

    fn locate(&self, service: ServiceCommand) -> Result<ProcessBuilder, CommandError> {
        let name = service.as_str();
        match &self.exec_dir {
            Some(dir) => {
                let program = dir.join(name);
                if is_file(&program) {
                    Ok(ProcessBuilder::new(program).name(name))
                } else {
                    Err(CommandError::ExecutableNotFound {
                        name: name.to_string(),
                    })
                }
            }
            None => ProcessBuilder::which(name),
        }
    }
}

fn is_file(path: &Path) -> bool {
    std::fs::metadata(path).is_ok_and(|m| m.is_file())
}
