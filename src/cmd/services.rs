// gitgood: Git Good - contained git hosting over ssh
//
// SPDX-FileCopyrightText: 2026 Git Good Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Wiring configuration values into the session components.

use anyhow::Context;
use std::path::Path;

use crate::config::Config;
use crate::error::Result;
use crate::fileops::FileOperationHandler;
use crate::git::service::CommandDispatcher;
use crate::jail::PathJail;
use crate::session::{Router, ServerInfo};

/// Everything one session needs, built from a loaded [`Config`].
#[derive(Debug, Clone)]
pub struct Services {
    pub router: Router,
    pub files: FileOperationHandler,
}

impl Services {
    /// Build the jails, dispatcher, router and file handler.
    ///
    /// Missing jail roots are created first.
    ///
    /// # Errors
    ///
    /// Returns an error if a jail root cannot be created.
    pub fn from_config(config: &Config) -> Result<Self> {
        let repos = open_jail(config.paths.repos())?;
        let files = open_jail(config.paths.files())?;

        let dispatcher = CommandDispatcher::new(repos, config.git.exec_dir.clone());
        let server = ServerInfo {
            name: config.server.name.clone(),
            version: config.server.version.clone(),
        };

        Ok(Self {
            router: Router::new(dispatcher, server),
            files: FileOperationHandler::new(files)
                .with_modes(config.fileops.file_mode, config.fileops.dir_mode),
        })
    }
}

fn open_jail(root: &Path) -> Result<PathJail> {
    std::fs::create_dir_all(root)
        .with_context(|| format!("failed to create root {}", root.display()))?;
    Ok(PathJail::new(root)?)
}
