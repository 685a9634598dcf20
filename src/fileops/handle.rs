// gitgood: Git Good - contained git hosting over ssh
//
// SPDX-FileCopyrightText: 2026 Git Good Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Offset-addressed file handles.

use std::fs::{File, Metadata};
use std::io;
use std::os::unix::fs::FileExt;

/// An open host file, read and written at explicit offsets.
///
/// Whether reads or writes are permitted is decided by the flags it was
/// opened with; the host reports misuse.
#[derive(Debug)]
pub struct FileHandle {
    file: File,
}

impl FileHandle {
    pub(crate) const fn new(file: File) -> Self {
        Self { file }
    }

    /// Read into `buf` starting at `offset`. Returns 0 at end of file.
    ///
    /// # Errors
    ///
    /// Returns the host error unchanged.
    pub fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<usize> {
        self.file.read_at(buf, offset)
    }

    /// Write `buf` starting at `offset`.
    ///
    /// # Errors
    ///
    /// Returns the host error unchanged.
    pub fn write_at(&self, buf: &[u8], offset: u64) -> io::Result<usize> {
        self.file.write_at(buf, offset)
    }

    /// Write all of `buf` starting at `offset`.
    ///
    /// # Errors
    ///
    /// Returns the host error unchanged.
    pub fn write_all_at(&self, buf: &[u8], offset: u64) -> io::Result<()> {
        self.file.write_all_at(buf, offset)
    }

    /// Current length of the file.
    ///
    /// # Errors
    ///
    /// Returns the host error unchanged.
    pub fn len(&self) -> io::Result<u64> {
        self.file.metadata().map(|m| m.len())
    }

    /// # Errors
    ///
    /// Returns the host error unchanged.
    pub fn metadata(&self) -> io::Result<Metadata> {
        self.file.metadata()
    }
}
