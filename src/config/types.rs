// gitgood: Git Good - contained git hosting over ssh
//
// SPDX-FileCopyrightText: 2026 Git Good Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration types.
//!
//! ```text
//! Config: GlobalConfig, PathsConfig, GitConfig, FileOpsConfig, ServerConfig
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ConfigError;
use crate::fileops::handler::{DEFAULT_DIR_MODE, DEFAULT_FILE_MODE};
use crate::logging::LogLevel;

/// Global configuration options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Log level for console (stderr) output (0-5).
    pub output_log_level: LogLevel,
    /// Log level for file output (0-5).
    pub file_log_level: LogLevel,
    /// Path to log file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            output_log_level: LogLevel::WARN,
            file_log_level: LogLevel::INFO,
            log_file: None,
        }
    }
}

/// Git service options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GitConfig {
    /// Directory holding `git-upload-pack` and `git-receive-pack`
    /// (default: looked up on `PATH`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exec_dir: Option<PathBuf>,
}

/// File-transfer options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileOpsConfig {
    /// Mode for new files when the client sends none.
    pub file_mode: u32,
    /// Mode for new directories.
    pub dir_mode: u32,
}

impl Default for FileOpsConfig {
    fn default() -> Self {
        Self {
            file_mode: DEFAULT_FILE_MODE,
            dir_mode: DEFAULT_DIR_MODE,
        }
    }
}

impl FileOpsConfig {
    /// Check both modes are plain permission bits.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::InvalidValue` naming the first bad mode.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, mode) in [("file_mode", self.file_mode), ("dir_mode", self.dir_mode)] {
            if mode > 0o7777 {
                return Err(ConfigError::InvalidValue {
                    section: "fileops".to_string(),
                    key: key.to_string(),
                    message: format!("expected permission bits (<= 0o7777), got {mode:#o}"),
                });
            }
        }
        Ok(())
    }
}

/// Interactive banner text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub name: String,
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "Git Good".to_string(),
            version: concat!("v", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}
