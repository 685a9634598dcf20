// gitgood: Git Good - contained git hosting over ssh
//
// SPDX-FileCopyrightText: 2026 Git Good Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Process execution and lifecycle management.
//!
//! ```text
//! run_relayed(stdin, stdout, stderr)
//!              |
//!              v
//!     build_command()
//!     args, cwd, env (cleared?), piped stdio
//!              |
//!              v
//!          spawn()
//!              |
//!              v
//!       relay_child()   caller <-> child streams
//!              |
//!              v
//!    validate exit_code
//!    (skip if ALLOW_FAILURE)
//!              |
//!              v
//!       ProcessOutput { exit_code }
//! ```

use std::process::Stdio;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::process::Command;
use tracing::{debug, error, trace};

use super::builder::{ProcessBuilder, ProcessFlags, ProcessOutput};
use super::io::relay_child;
use crate::error::CommandError;

impl ProcessBuilder {
    /// Returns the display name for this process.
    fn display_name(&self) -> String {
        self.name_override().map_or_else(
            || {
                self.program().file_name().map_or_else(
                    || "process".to_string(),
                    |s| s.to_string_lossy().into_owned(),
                )
            },
            String::from,
        )
    }

    /// Returns the full command line as a string (for logging).
    fn command_line(&self) -> String {
        use std::fmt::Write as _;
        let mut cmd = format!("{}", self.program().display());
        for arg in self.args_slice() {
            if arg.contains(' ') {
                let _ = write!(cmd, " \"{arg}\"");
            } else {
                let _ = write!(cmd, " {arg}");
            }
        }
        cmd
    }

    /// Spawns the process with its stdio relayed to the given streams and
    /// waits for it to exit.
    ///
    /// Returns once the child has exited and its stdout/stderr have been
    /// drained into `stdout`/`stderr`. Copying from `stdin` stops when the
    /// child exits, even if `stdin` is still open.
    ///
    /// # Errors
    ///
    /// Returns a [`CommandError`] if:
    /// - Spawning the child process fails.
    /// - Waiting on the child or relaying its streams fails.
    /// - The process exits with a non-zero status (and `ALLOW_FAILURE` is not set).
    pub async fn run_relayed<I, O, E>(
        self,
        stdin: I,
        stdout: O,
        stderr: E,
    ) -> Result<ProcessOutput, CommandError>
    where
        I: AsyncRead + Unpin,
        O: AsyncWrite + Unpin,
        E: AsyncWrite + Unpin,
    {
        let name = self.display_name();
        let cmd_line = self.command_line();

        if let Some(cwd) = self.working_dir() {
            debug!(cwd = %cwd.display(), "cd");
        }
        debug!(cmd = %cmd_line, "exec");

        let mut command = self.build_command();
        let mut child = command.spawn().map_err(|source| CommandError::SpawnFailed {
            command: name.clone(),
            source,
        })?;
        trace!(process = %name, pid = ?child.id(), "spawned");

        let status = relay_child(&name, &mut child, stdin, stdout, stderr)
            .await
            .map_err(|source| CommandError::Relay {
                command: name.clone(),
                source,
            })?;
        let output = ProcessOutput::new(status.code().unwrap_or(-1));

        if !self.process_flags().contains(ProcessFlags::ALLOW_FAILURE) && !output.success() {
            error!(process = %name, exit_code = output.exit_code(), "process failed");
            return Err(CommandError::NonZeroExit {
                command: name,
                code: output.exit_code(),
            });
        }

        trace!(process = %name, exit_code = output.exit_code(), "completed");
        Ok(output)
    }

    /// Builds the tokio Command from this builder's configuration.
    fn build_command(&self) -> Command {
        let mut command = Command::new(self.program());
        command.args(self.args_slice());

        if let Some(cwd) = self.working_dir() {
            command.current_dir(cwd);
        }

        if self.process_flags().contains(ProcessFlags::CLEAR_ENV) {
            command.env_clear();
        }
        command.envs(self.environment());

        command
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        // The child never outlives the session that started it
        command.kill_on_drop(true);

        command
    }
}
