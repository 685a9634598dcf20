// gitgood: Git Good - contained git hosting over ssh
//
// SPDX-FileCopyrightText: 2026 Git Good Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults
//! 2. gitgood.toml (cwd, optional)
//! 3. --config FILE (repeatable)
//! 4. GITGOOD_* env vars
//! 5. CLI overrides (--repos)
//! ```
//!
//! # Environment Variable Mapping
//!
//! ```text
//! GITGOOD_PATHS__REPOS=/srv/git        → paths.repos = "/srv/git"
//! GITGOOD_GIT__EXEC_DIR=/usr/lib/git   → git.exec_dir = "/usr/lib/git"
//! GITGOOD_FILEOPS__FILE_MODE=384       → fileops.file_mode = 0o600
//! ```
//!
//! Sections are separated by a double underscore so keys may contain single
//! underscores.

pub mod loader;
pub mod paths;
pub mod types;


use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::Result;

use loader::ConfigLoader;
use paths::PathsConfig;
use types::{FileOpsConfig, GitConfig, GlobalConfig, ServerConfig};

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Logging options.
    pub global: GlobalConfig,
    /// Jail roots.
    pub paths: PathsConfig,
    /// Git service options.
    pub git: GitConfig,
    /// File-transfer options.
    pub fileops: FileOpsConfig,
    /// Interactive banner.
    pub server: ServerConfig,
}

impl Config {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use gitgood::config::Config;
    ///
    /// let config = Config::builder()
    ///     .add_toml_file("/etc/gitgood/gitgood.toml")
    ///     .add_toml_file_optional("gitgood.toml")
    ///     .with_env_prefix("GITGOOD")
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load configuration from a single TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid TOML, or
    /// does not match the `Config` structure.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::builder().add_toml_file(path).build()
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML or does not match the
    /// `Config` structure.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// Resolve all paths and validate configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if path resolution fails or a mode is out of range.
    pub fn resolve_and_validate(&mut self) -> Result<()> {
        self.paths.resolve()?;
        if let Some(dir) = &self.git.exec_dir {
            self.git.exec_dir = Some(std::path::absolute(dir)?);
        }
        self.fileops.validate()?;
        Ok(())
    }

    /// Format configuration options for display.
    ///
    /// Output is deterministically ordered using `BTreeMap`.
    #[must_use]
    pub fn format_options(&self) -> Vec<String> {
        let fmt = |p: Option<&PathBuf>| p.map_or_else(String::new, |p| p.display().to_string());

        let mut options = BTreeMap::new();
        options.insert(
            "global.output_log_level",
            self.global.output_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.file_log_level",
            self.global.file_log_level.as_u8().to_string(),
        );
        options.insert("global.log_file", fmt(self.global.log_file.as_ref()));
        options.insert("paths.repos", self.paths.repos().display().to_string());
        options.insert("paths.files", self.paths.files().display().to_string());
        options.insert("git.exec_dir", fmt(self.git.exec_dir.as_ref()));
        options.insert("fileops.file_mode", format!("{:#o}", self.fileops.file_mode));
        options.insert("fileops.dir_mode", format!("{:#o}", self.fileops.dir_mode));
        options.insert("server.name", self.server.name.clone());
        options.insert("server.version", self.server.version.clone());

        let max_key_len = options.keys().map(|k| k.len()).max().unwrap_or(0);

        options
            .into_iter()
            .map(|(key, value)| format!("{key:<max_key_len$} = {value}"))
            .collect()
    }
}
