// gitgood: Git Good - contained git hosting over ssh
//
// SPDX-FileCopyrightText: 2026 Git Good Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Line-oriented interactive shell.
//!
//! ```text
//! banner + "> "
//!   create (OWNER/)NAME  -> "Created repo OWNER/NAME."
//!   help                 -> usage
//!   exit | EOF           -> end
//!   ""                   -> "> "
//!   *                    -> "Unknown command, use 'help'"
//! ```

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

use crate::error::{GitGoodError, RepoError};
use crate::git::repo::create_repo;
use crate::jail::PathJail;
use crate::namespace::RepositoryIdentifier;

pub const USAGE: &str = "Usage:\ncreate (USERNAME/)REPONAME";
const UNKNOWN: &str = "Unknown command, use 'help'";
const PROMPT: &str = "\n> ";

/// One interactive session for `user`.
#[derive(Debug)]
pub struct Shell<'a> {
    jail: &'a PathJail,
    user: &'a str,
    banner: String,
}

impl<'a> Shell<'a> {
    #[must_use]
    pub fn new(jail: &'a PathJail, user: &'a str, server_name: &str, server_version: &str) -> Self {
        Self {
            jail,
            user,
            banner: format!(
                "{server_name} - {server_version}\nEnter command (or 'exit' to quit)\n> "
            ),
        }
    }

    /// Serve commands from `input` until `exit` or end of input.
    ///
    /// # Errors
    ///
    /// Returns the I/O error that ended the session early.
    pub async fn run<R, W>(&self, mut input: R, mut output: W) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        output.write_all(self.banner.as_bytes()).await?;
        output.flush().await?;

        let mut line = String::new();
        loop {
            line.clear();
            if input.read_line(&mut line).await? == 0 {
                debug!(user = %self.user, "shell input closed");
                break;
            }

            let words: Vec<&str> = line.split_whitespace().collect();
            let reply = match words.as_slice() {
                [] => {
                    output.write_all(b"> ").await?;
                    output.flush().await?;
                    continue;
                }
                ["exit"] => break,
                ["help"] => USAGE.to_string(),
                ["create", arg] => self.create(arg),
                ["create", ..] => USAGE.to_string(),
                _ => UNKNOWN.to_string(),
            };

            output.write_all(reply.as_bytes()).await?;
            output.write_all(PROMPT.as_bytes()).await?;
            output.flush().await?;
        }
        Ok(())
    }

    fn create(&self, arg: &str) -> String {
        let (owner, name) = arg.split_once('/').unwrap_or((self.user, arg));
        let result = RepositoryIdentifier::new(owner, name)
            .map_err(|_| GitGoodError::from(RepoError::InvalidIdentifier(format!("{owner}/{name}"))))
            .and_then(|repo| create_repo(self.jail, &repo).map(|_| repo));

        match result {
            Ok(repo) => format!("Created repo {repo}."),
            Err(e) => {
                warn!(user = %self.user, error = %e, "create failed");
                format!("error while creating repo: {}", reason(&e))
            }
        }
    }
}

/// The part of an error a remote user gets to see.
fn reason(err: &GitGoodError) -> String {
    match err {
        GitGoodError::Argument(e) => e.to_string(),
        GitGoodError::Jail(e) => e.to_string(),
        GitGoodError::Repo(e) => e.to_string(),
        _ => "internal error".to_string(),
    }
}

