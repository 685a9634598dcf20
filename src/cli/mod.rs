// gitgood: Git Good - contained git hosting over ssh
//
// SPDX-FileCopyrightText: 2026 Git Good Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module for gitgood using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! gitgood [global options] <command>
//! serve --user USER [--command CMD]   (sshd forced command)
//! create OWNER/NAME
//! options [--json]
//! version
//! ```

pub mod global;
pub mod serve;


use crate::cli::global::GlobalOptions;
use crate::cli::serve::{CreateArgs, OptionsArgs, ServeArgs};
use clap::{Parser, Subcommand};

/// Git Good - contained git hosting over ssh
#[derive(Debug, Parser)]
#[command(
    name = "gitgood",
    author,
    version,
    about = "Contained git and file-transfer access over ssh",
    long_about = "gitgood Copyright (C) 2026 Git Good Contributors\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Serves git-upload-pack and git-receive-pack for repositories\n\
                  named OWNER/NAME below a single root directory, plus a small\n\
                  interactive shell for creating repositories.",
    after_help = "SSHD SETUP:\n\n\
                  Install gitgood as a forced command, one line per key in\n\
                  authorized_keys:\n\n    \
                  command=\"gitgood serve --user alice\",no-pty ssh-ed25519 AAAA...\n\n\
                  The client's requested command arrives in $SSH_ORIGINAL_COMMAND.\n\
                  `git clone ssh://host/alice/proj` then runs\n\
                  `git-upload-pack alice/proj` inside the repository root."
)]
pub struct Cli {
    /// Global options shared by all commands
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Command to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serves one ssh session.
    Serve(ServeArgs),

    /// Creates an empty bare repository.
    Create(CreateArgs),

    /// Lists all options and their effective values.
    Options(OptionsArgs),

    /// Shows the version.
    #[command(visible_alias = "-v")]
    Version,
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

/// Tries to parse command-line arguments, returning an error on failure.
///
/// # Errors
///
/// Returns a `clap::Error` if the arguments are invalid or if help/version information
/// was requested.
pub fn try_parse_from<I, T>(iter: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(iter)
}
