// gitgood: Git Good - contained git hosting over ssh
//
// SPDX-FileCopyrightText: 2026 Git Good Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Jail root configuration.
//!
//! ```text
//! repos/            git service jail   (<owner>/<name>/ bare repos)
//! files/            file-transfer jail (defaults to repos/)
//! ```
//!
//! Relative roots are made absolute against the working directory at load
//! time so every component sees the same directory.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};

/// Jail roots for the git and file-transfer services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    /// Root of the repository namespace.
    pub repos: PathBuf,
    /// Root for file-transfer sessions (default: `repos`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<PathBuf>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            repos: PathBuf::from("./repos"),
            files: None,
        }
    }
}

impl PathsConfig {
    /// Make both roots absolute.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::MissingKey` if `repos` is empty, or an error if
    /// the working directory cannot be determined.
    pub fn resolve(&mut self) -> Result<()> {
        if self.repos.as_os_str().is_empty() {
            return Err(ConfigError::MissingKey {
                section: "paths".to_string(),
                key: "repos".to_string(),
            }
            .into());
        }
        self.repos = std::path::absolute(&self.repos)?;
        if let Some(files) = &self.files {
            self.files = Some(std::path::absolute(files)?);
        }
        Ok(())
    }

    /// Root for the git service jail.
    #[must_use]
    pub fn repos(&self) -> &Path {
        &self.repos
    }

    /// Root for the file-transfer jail.
    #[must_use]
    pub fn files(&self) -> &Path {
        self.files.as_deref().unwrap_or(&self.repos)
    }
}
