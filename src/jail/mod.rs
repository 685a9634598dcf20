// gitgood: Git Good - contained git hosting over ssh
//
// SPDX-FileCopyrightText: 2026 Git Good Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Path jail: client paths to contained host paths.
//!
//! ```text
//! virtual path ("a/../b", "/x", "")
//!        |
//!        v
//! resolve()          lexical: "/" + p, collapse . and .., join on root
//!        |           check: == root or under root (component-wise)
//!        v
//! resolve_real()     soft-canonicalize existing prefix (follows links)
//!                    re-check against canonical root
//!        |
//!        v
//! HostPath
//! ```
//!
//! Every component that touches the filesystem on behalf of a client goes
//! through a [`PathJail`]. Nothing else joins client strings onto host paths.

use std::path::{Component, Path, PathBuf};

use soft_canonicalize::soft_canonicalize;
use tracing::{trace, warn};

use crate::error::JailError;
use crate::namespace::clean_rooted;

/// Whether the last component of a path is followed when it is a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Follow {
    /// Follow a terminal link (stat, open, setstat).
    Final,
    /// Act on a terminal link itself (lstat, remove, rename, readlink).
    NoFinal,
}

/// A directory outside of which no resolved path may point.
#[derive(Debug, Clone)]
pub struct PathJail {
    root: PathBuf,
}

impl PathJail {
    /// Create a jail rooted at `root`.
    ///
    /// The root is made absolute against the current directory; it does not
    /// need to exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`JailError::RootUnavailable`] if the current directory cannot
    /// be determined for a relative root.
    pub fn new(root: impl AsRef<Path>) -> Result<Self, JailError> {
        let root = std::path::absolute(root.as_ref()).map_err(JailError::RootUnavailable)?;
        Ok(Self { root })
    }

    /// The absolute jail root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Check that `host` is the root or lies beneath it.
    #[must_use]
    pub fn contains(&self, host: &Path) -> bool {
        is_within(&self.root, host)
    }

    /// Lexically resolve a virtual path to a host path under the root.
    ///
    /// Empty input and inputs made only of `.`/`..` resolve to the root.
    /// Links are never consulted.
    ///
    /// # Errors
    ///
    /// Returns [`JailError::PathEscape`] if the joined result is not
    /// contained by the root.
    pub fn resolve(&self, virtual_path: &str) -> Result<PathBuf, JailError> {
        let cleaned = clean_rooted(virtual_path);
        let joined = if cleaned.is_empty() {
            self.root.clone()
        } else {
            self.root.join(&cleaned)
        };

        let absolute = std::path::absolute(&joined).map_err(JailError::RootUnavailable)?;
        if !self.contains(&absolute) {
            warn!(path = %virtual_path, "path escapes jail");
            return Err(JailError::escape(virtual_path));
        }
        trace!(path = %virtual_path, "resolved");
        Ok(absolute)
    }

    /// Resolve a virtual path and re-check containment after following links.
    ///
    /// The existing part of the path is canonicalised (links followed, with
    /// the final component followed only for [`Follow::Final`]); any part
    /// that does not exist yet is appended as-is. The result must lie under
    /// the canonical root, so a link inside the jail that points outside it
    /// is refused.
    ///
    /// # Errors
    ///
    /// Returns [`JailError::PathEscape`] on escape,
    /// [`JailError::RootUnavailable`] if the root cannot be canonicalised,
    /// or [`JailError::Resolve`] on link loops.
    pub fn resolve_real(&self, virtual_path: &str, follow: Follow) -> Result<PathBuf, JailError> {
        let lexical = self.resolve(virtual_path)?;
        let root = std::fs::canonicalize(&self.root).map_err(JailError::RootUnavailable)?;

        let resolve_err = |source| JailError::Resolve {
            path: virtual_path.to_string(),
            source,
        };

        let real = match (follow, lexical.parent(), lexical.file_name()) {
            (Follow::NoFinal, Some(parent), Some(name)) if lexical != self.root => {
                soft_canonicalize(parent).map_err(resolve_err)?.join(name)
            }
            _ => soft_canonicalize(&lexical).map_err(resolve_err)?,
        };

        if !is_within(&root, &real) {
            warn!(path = %virtual_path, "path escapes jail through a link");
            return Err(JailError::escape(virtual_path));
        }
        Ok(real)
    }

    /// Resolve `target` relative to the directory containing `virtual_path`,
    /// with the same link re-check as [`PathJail::resolve_real`].
    ///
    /// Used for link targets, which are relative to the link's own directory.
    ///
    /// # Errors
    ///
    /// Same as [`PathJail::resolve_real`].
    pub fn resolve_sibling(
        &self,
        virtual_path: &str,
        target: &str,
        follow: Follow,
    ) -> Result<PathBuf, JailError> {
        let dir = clean_rooted(virtual_path);
        let dir = dir.rsplit_once('/').map_or("", |(parent, _)| parent);
        self.resolve_real(&format!("{dir}/{target}"), follow)
    }
}

/// Component-wise prefix check, so `/srv/root` never matches `/srv/root-evil`.
fn is_within(root: &Path, path: &Path) -> bool {
    path.strip_prefix(root)
        .is_ok_and(|rest| rest.components().all(|c| matches!(c, Component::Normal(_))))
}
