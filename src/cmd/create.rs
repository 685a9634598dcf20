// gitgood: Git Good - contained git hosting over ssh
//
// SPDX-FileCopyrightText: 2026 Git Good Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! The `create` command.

use super::services::Services;
use crate::cli::serve::CreateArgs;
use crate::config::Config;
use crate::error::Result;
use crate::git::repo::create_repo;
use crate::namespace::RepositoryIdentifier;

/// Create `OWNER/NAME` under the repository root.
///
/// # Errors
///
/// Returns an error if the name is invalid, the repository exists, or
/// initialisation fails.
pub fn run_create_command(args: &CreateArgs, config: &Config) -> Result<()> {
    let services = Services::from_config(config)?;
    let repo = RepositoryIdentifier::from_arg(&args.repo)?;
    create_repo(services.router.jail(), &repo)?;
    println!("Created repo {repo}.");
    Ok(())
}
