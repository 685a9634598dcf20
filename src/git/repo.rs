// gitgood: Git Good - contained git hosting over ssh
//
// SPDX-FileCopyrightText: 2026 Git Good Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Repository provisioning.
//!
//! ```text
//! <root>/                 created on demand (0755)
//! <root>/<owner>/         created on demand (0755)
//! <root>/<owner>/<name>/  created exactly once, then gix::init_bare
//! ```

use std::fs::DirBuilder;
use std::io::ErrorKind;
use std::os::unix::fs::DirBuilderExt;
use std::path::PathBuf;

use tracing::{debug, info};

use crate::error::{GitGoodResult, RepoError};
use crate::jail::{Follow, PathJail};
use crate::namespace::RepositoryIdentifier;

/// Mode of owner and repository directories.
const REPO_DIR_MODE: u32 = 0o755;

/// Create `<root>/<owner>/<name>` and initialise an empty bare repository in
/// it.
///
/// Returns the host path of the new repository.
///
/// # Errors
///
/// - [`crate::error::JailError`] if the directory would lie outside the jail.
/// - [`RepoError::AlreadyExists`] if the directory is already present; it is
///   left untouched.
/// - [`RepoError::CreateDirFailed`] or [`RepoError::InitFailed`] on host
///   failures.
pub fn create_repo(jail: &PathJail, repo: &RepositoryIdentifier) -> GitGoodResult<PathBuf> {
    let create_err = |source| RepoError::CreateDirFailed {
        repo: repo.to_string(),
        source,
    };

    DirBuilder::new()
        .recursive(true)
        .mode(REPO_DIR_MODE)
        .create(jail.root())
        .map_err(create_err)?;

    let path = jail.resolve_real(&repo.path(), Follow::Final)?;

    if let Some(owner_dir) = path.parent() {
        DirBuilder::new()
            .recursive(true)
            .mode(REPO_DIR_MODE)
            .create(owner_dir)
            .map_err(create_err)?;
    }

    // Non-recursive so an existing repository is reported, never reused
    match DirBuilder::new().mode(REPO_DIR_MODE).create(&path) {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            debug!(repo = %repo, "repository already exists");
            return Err(RepoError::AlreadyExists(repo.to_string()).into());
        }
        Err(e) => return Err(create_err(e).into()),
    }

    gix::init_bare(&path).map_err(|e| RepoError::InitFailed {
        repo: repo.to_string(),
        source: Box::new(e),
    })?;

    info!(repo = %repo, "created repository");
    Ok(path)
}
