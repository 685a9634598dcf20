// gitgood: Git Good - contained git hosting over ssh
//
// SPDX-FileCopyrightText: 2026 Git Good Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Repository namespace validation.
//!
//! ```text
//! raw client arg
//!      |
//!      v
//! sanitize_arg()      trim, unquote, reject abs, clean, reject ".."
//!      |
//!      v
//! is_valid_repo_path()  exactly "owner/name"
//!      |
//!      v
//! is_valid_component()  [a-z0-9_-]{1,100}, no edge/adjacent '-' '_'
//!      |
//!      v
//! RepositoryIdentifier
//! ```
//!
//! Pure string rules, no I/O. This is the single authority for identifier
//! shape; call sites never repeat these checks.

use regex::Regex;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::error::ArgumentError;

static ALLOWED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9_-]{1,100}$").unwrap_or_else(|e| unreachable!("static pattern: {e}"))
});

static ADJACENT_SEPARATORS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"__|--|_-|-_").unwrap_or_else(|e| unreachable!("static pattern: {e}"))
});

const fn is_separator(b: u8) -> bool {
    b == b'-' || b == b'_'
}

/// Check a single owner or repository name against the naming policy.
#[must_use]
pub fn is_valid_component(s: &str) -> bool {
    if !ALLOWED.is_match(s) || ADJACENT_SEPARATORS.is_match(s) {
        return false;
    }
    let bytes = s.as_bytes();
    !is_separator(bytes[0]) && !is_separator(bytes[bytes.len() - 1])
}

/// Check that `p` is exactly `owner/name` with both parts valid.
#[must_use]
pub fn is_valid_repo_path(p: &str) -> bool {
    let mut parts = p.split('/');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(owner), Some(name), None) => is_valid_component(owner) && is_valid_component(name),
        _ => false,
    }
}

/// Collapse `.`/`..`/empty segments, counting `..` that found nothing to pop.
fn collapse(p: &str) -> (Vec<&str>, usize) {
    let mut stack: Vec<&str> = Vec::new();
    let mut excess = 0;
    for segment in p.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if stack.pop().is_none() {
                    excess += 1;
                }
            }
            s => stack.push(s),
        }
    }
    (stack, excess)
}

/// Lexically clean a slash-separated path as if rooted at `/`.
///
/// Collapses empty, `.` and `..` segments; `..` at the root is dropped. The
/// result has no leading or trailing slash and is empty for the root itself.
#[must_use]
pub fn clean_rooted(p: &str) -> String {
    collapse(p).0.join("/")
}

/// Turn a raw repository argument into a cleaned relative path.
///
/// Surrounding whitespace and one layer of quotes are stripped, absolute
/// paths are refused, and the rest is cleaned as a root-relative path.
///
/// # Errors
///
/// Returns an [`ArgumentError`] when the argument is empty, absolute, or
/// climbs above its starting point with more `..` than it has depth.
pub fn sanitize_arg(raw: &str) -> Result<String, ArgumentError> {
    let arg = strip_quotes(raw.trim());
    if arg.is_empty() {
        return Err(ArgumentError::Empty);
    }
    if arg.starts_with('/') || Path::new(arg).is_absolute() {
        return Err(ArgumentError::AbsolutePath);
    }

    // Rooted cleaning silently swallows surplus "..", so the surplus count
    // is what refuses "../x".
    let (segments, excess) = collapse(arg);
    if excess > 0 {
        return Err(ArgumentError::ParentTraversal);
    }
    if segments.is_empty() {
        return Err(ArgumentError::Empty);
    }
    Ok(segments.join("/"))
}

fn strip_quotes(s: &str) -> &str {
    for quote in ['\'', '"'] {
        if let Some(inner) = s
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner.trim();
        }
    }
    s
}

/// A validated `(owner, name)` pair.
///
/// Only constructible through validation; immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryIdentifier {
    owner: String,
    name: String,
}

impl RepositoryIdentifier {
    /// Build an identifier from separately supplied parts.
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentError::InvalidComponent`] naming the first bad part.
    pub fn new(owner: &str, name: &str) -> Result<Self, ArgumentError> {
        for part in [owner, name] {
            if !is_valid_component(part) {
                return Err(ArgumentError::InvalidComponent(part.to_string()));
            }
        }
        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }

    /// Parse a raw client argument (`'owner/name'`, quoted or not).
    ///
    /// # Errors
    ///
    /// Returns an [`ArgumentError`] if sanitizing fails or the cleaned value
    /// is not a valid `owner/name`.
    pub fn from_arg(raw: &str) -> Result<Self, ArgumentError> {
        let cleaned = sanitize_arg(raw)?;
        if !is_valid_repo_path(&cleaned) {
            return Err(ArgumentError::InvalidRepoPath(cleaned));
        }
        let (owner, name) = cleaned
            .split_once('/')
            .ok_or_else(|| ArgumentError::InvalidRepoPath(cleaned.clone()))?;
        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }

    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The composed `owner/name` form.
    #[must_use]
    pub fn path(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl fmt::Display for RepositoryIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl FromStr for RepositoryIdentifier {
    type Err = ArgumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_arg(s)
    }
}
