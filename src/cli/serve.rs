// gitgood: Git Good - contained git hosting over ssh
//
// SPDX-FileCopyrightText: 2026 Git Good Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Session and administration command arguments.

use clap::Args;

/// Arguments for the `serve` command.
#[derive(Debug, Clone, Args)]
pub struct ServeArgs {
    /// Authenticated principal; the default owner for `create`.
    #[arg(short = 'u', long = "user", value_name = "USER")]
    pub user: String,

    /// Requested command line, split on whitespace.
    /// Empty or absent opens the interactive shell.
    #[arg(long = "command", value_name = "CMD", env = "SSH_ORIGINAL_COMMAND")]
    pub command: Option<String>,
}

impl ServeArgs {
    /// The argument vector the session is routed on.
    #[must_use]
    pub fn argv(&self) -> Vec<&str> {
        self.command
            .as_deref()
            .map(|c| c.split_whitespace().collect())
            .unwrap_or_default()
    }
}

/// Arguments for the `create` command.
#[derive(Debug, Clone, Args)]
pub struct CreateArgs {
    /// Repository to create, as OWNER/NAME.
    #[arg(value_name = "OWNER/NAME")]
    pub repo: String,
}

/// Arguments for the `options` command.
#[derive(Debug, Clone, Default, Args)]
pub struct OptionsArgs {
    /// Print the configuration as JSON.
    #[arg(long)]
    pub json: bool,
}
