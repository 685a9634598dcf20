// gitgood: Git Good - contained git hosting over ssh
//
// SPDX-FileCopyrightText: 2026 Git Good Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Session Router.
//!
//! ```text
//! argv (from the transport)
//!    |
//!    +-- [command, repo] --> CommandDispatcher::dispatch
//!    |                       failure: "ERROR: <msg>" on stderr
//!    |
//!    +-- anything else ----> Shell::run (create / help / exit)
//! ```

pub mod shell;

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{info, warn};

use crate::error::GitGoodResult;
use crate::git::service::{CommandDispatcher, DispatchOutcome};
use crate::jail::PathJail;
use shell::Shell;

/// Where a session goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// A git service invocation.
    Git { command: String, repo: String },
    /// The interactive shell.
    Shell,
}

/// Route on argument count: exactly two arguments is a git service call.
#[must_use]
pub fn route<S: AsRef<str>>(argv: &[S]) -> Route {
    match argv {
        [command, repo] => Route::Git {
            command: command.as_ref().to_string(),
            repo: repo.as_ref().to_string(),
        },
        _ => Route::Shell,
    }
}

/// How a served session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    Git(DispatchOutcome),
    Shell,
}

/// Text shown by the interactive shell banner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

/// Routes sessions to the dispatcher or the shell.
#[derive(Debug, Clone)]
pub struct Router {
    dispatcher: CommandDispatcher,
    server: ServerInfo,
}

impl Router {
    #[must_use]
    pub const fn new(dispatcher: CommandDispatcher, server: ServerInfo) -> Self {
        Self { dispatcher, server }
    }

    /// The repository jail sessions are served from.
    #[must_use]
    pub const fn jail(&self) -> &PathJail {
        self.dispatcher.jail()
    }

    /// Serve one session for `user` over the given streams.
    ///
    /// # Errors
    ///
    /// Returns the dispatch error for a failed git service call (after
    /// reporting it on `stderr`), or the I/O error that ended the shell.
    pub async fn serve<S, I, O, E>(
        &self,
        user: &str,
        argv: &[S],
        stdin: I,
        stdout: O,
        mut stderr: E,
    ) -> GitGoodResult<SessionOutcome>
    where
        S: AsRef<str>,
        I: AsyncRead + Unpin,
        O: AsyncWrite + Unpin,
        E: AsyncWrite + Unpin,
    {
        match route(argv) {
            Route::Git { command, repo } => {
                info!(user = %user, command = %command, "git session");
                match self
                    .dispatcher
                    .dispatch(&command, &repo, stdin, stdout, &mut stderr)
                    .await
                {
                    Ok(outcome) => Ok(SessionOutcome::Git(outcome)),
                    Err(e) => {
                        warn!(user = %user, error = %e, "git session failed");
                        stderr.write_all(format!("ERROR: {e}\n").as_bytes()).await?;
                        stderr.flush().await?;
                        Err(e)
                    }
                }
            }
            Route::Shell => {
                info!(user = %user, "shell session");
                Shell::new(
                    self.jail(),
                    user,
                    &self.server.name,
                    &self.server.version,
                )
                .run(BufReader::new(stdin), stdout)
                .await?;
                Ok(SessionOutcome::Shell)
            }
        }
    }
}
