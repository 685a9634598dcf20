// gitgood: Git Good - contained git hosting over ssh
//
// SPDX-FileCopyrightText: 2026 Git Good Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Paginated metadata listings.
//!
//! ```text
//! entries: [a, b, c, d, e]
//! list_at(0, 2) -> [a, b]   eof=false
//! list_at(2, 2) -> [c, d]   eof=false
//! list_at(4, 2) -> [e]      eof=true
//! list_at(5, 2) -> []       eof=true
//! list_at(2, 2) -> [c, d]   eof=false   (no cursor state)
//! ```

use std::fs::Metadata;
use std::os::unix::fs::PermissionsExt;
use std::time::SystemTime;

/// A named metadata snapshot.
#[derive(Debug, Clone)]
pub struct EntryInfo {
    name: String,
    metadata: Metadata,
}

impl EntryInfo {
    pub(crate) const fn new(name: String, metadata: Metadata) -> Self {
        Self { name, metadata }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.metadata.is_dir()
    }

    #[must_use]
    pub fn is_symlink(&self) -> bool {
        self.metadata.file_type().is_symlink()
    }

    #[must_use]
    pub fn len(&self) -> u64 {
        self.metadata.len()
    }

    /// Full mode bits, file type included.
    #[must_use]
    pub fn permissions(&self) -> u32 {
        self.metadata.permissions().mode()
    }

    #[must_use]
    pub fn modified(&self) -> Option<SystemTime> {
        self.metadata.modified().ok()
    }
}

/// One page of a listing.
#[derive(Debug, Clone, Copy)]
pub struct ListPage<'a> {
    pub entries: &'a [EntryInfo],
    /// The page ends at (or starts beyond) the last entry.
    pub eof: bool,
}

/// A finite listing, served by offset.
#[derive(Debug, Clone, Default)]
pub struct EntryLister {
    entries: Vec<EntryInfo>,
}

impl EntryLister {
    pub(crate) const fn new(entries: Vec<EntryInfo>) -> Self {
        Self { entries }
    }

    /// Up to `max` entries starting at `offset`.
    #[must_use]
    pub fn list_at(&self, offset: usize, max: usize) -> ListPage<'_> {
        let total = self.entries.len();
        if offset >= total {
            return ListPage {
                entries: &[],
                eof: true,
            };
        }
        let end = offset.saturating_add(max).min(total);
        ListPage {
            entries: &self.entries[offset..end],
            eof: end == total,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EntryInfo> {
        self.entries.iter()
    }
}
