// gitgood: Git Good - contained git hosting over ssh
//
// SPDX-FileCopyrightText: 2026 Git Good Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! File-transfer operations on top of a [`PathJail`].
//!
//! ```text
//!                 FileOperationRequest
//!                          |
//!     +-------------+------+-------+---------------+
//!     v             v              v               v
//!   read       write/open_mixed   list          filecmd
//!   Final      Final, mkdir -p   List   Final   Mkdir        Final
//!   read-only  APPEND dropped    Stat   Final   Setstat      Final
//!                                Lstat  NoFinal Rmdir/Remove NoFinal
//!                                Readlink       Rename/Link  NoFinal
//!     |             |              |               |
//!     v             v              v               v
//!  FileHandle   FileHandle     EntryLister        ()
//! ```
//!
//! Every host path comes from [`PathJail::resolve_real`]; nothing here joins
//! client strings onto host paths.

use std::fs::{self, DirBuilder, File, OpenOptions, Permissions};
use std::os::unix::fs::{DirBuilderExt, OpenOptionsExt, PermissionsExt};
use std::path::{Path, PathBuf};

use filetime::FileTime;
use tracing::{debug, trace};

use super::handle::FileHandle;
use super::lister::{EntryInfo, EntryLister};
use super::request::{AttrFlags, FileAttributes, FileOperationRequest, Method, OpenFlags};
use crate::error::FileOpError;
use crate::jail::{Follow, PathJail};
use crate::namespace::clean_rooted;

/// Mode for files created without explicit permission bits.
pub const DEFAULT_FILE_MODE: u32 = 0o644;
/// Mode for directories created by `Mkdir` and for missing parents.
pub const DEFAULT_DIR_MODE: u32 = 0o755;

/// Serves file-transfer requests inside one jail.
#[derive(Debug, Clone)]
pub struct FileOperationHandler {
    jail: PathJail,
    file_mode: u32,
    dir_mode: u32,
}

impl FileOperationHandler {
    #[must_use]
    pub const fn new(jail: PathJail) -> Self {
        Self {
            jail,
            file_mode: DEFAULT_FILE_MODE,
            dir_mode: DEFAULT_DIR_MODE,
        }
    }

    /// Override the modes used when a request carries no permission bits.
    #[must_use]
    pub const fn with_modes(mut self, file_mode: u32, dir_mode: u32) -> Self {
        self.file_mode = file_mode;
        self.dir_mode = dir_mode;
        self
    }

    #[must_use]
    pub const fn jail(&self) -> &PathJail {
        &self.jail
    }

    /// Open an existing file for reading.
    ///
    /// # Errors
    ///
    /// Returns [`FileOpError::Jail`] on escape, or the host error unchanged.
    pub fn read(&self, req: &FileOperationRequest) -> Result<FileHandle, FileOpError> {
        debug!(method = %req.method(), path = %req.path(), "read");
        let path = self.real(req.path(), Follow::Final)?;
        Ok(FileHandle::new(File::open(path)?))
    }

    /// Open a file for writing, creating missing parents.
    ///
    /// `APPEND` is always dropped. New files get the requested permission
    /// bits, or the configured file mode when none are present.
    ///
    /// # Errors
    ///
    /// Returns [`FileOpError::Jail`] on escape, or the host error unchanged.
    pub fn write(&self, req: &FileOperationRequest) -> Result<FileHandle, FileOpError> {
        debug!(method = %req.method(), path = %req.path(), flags = ?req.flags(), "write");
        self.open_writable(req)
    }

    /// Open one handle for both reads and writes at arbitrary offsets.
    ///
    /// # Errors
    ///
    /// Same as [`FileOperationHandler::write`].
    pub fn open_mixed(&self, req: &FileOperationRequest) -> Result<FileHandle, FileOpError> {
        debug!(method = %req.method(), path = %req.path(), flags = ?req.flags(), "open");
        self.open_writable(req)
    }

    /// Produce the listing for `List`, `Stat`, `Lstat` or `Readlink`.
    ///
    /// `Readlink` describes the entry the link points at (resolved relative
    /// to the link's directory, inside the jail), not the stored link text.
    ///
    /// # Errors
    ///
    /// Returns [`FileOpError::Unsupported`] for any other method,
    /// [`FileOpError::Jail`] on escape, or the host error unchanged.
    pub fn list(&self, req: &FileOperationRequest) -> Result<EntryLister, FileOpError> {
        debug!(method = %req.method(), path = %req.path(), "list");
        let entries = match req.method() {
            Method::List => self.read_dir(req.path())?,
            Method::Stat => {
                let path = self.real(req.path(), Follow::Final)?;
                vec![EntryInfo::new(entry_name(req.path()), fs::metadata(path)?)]
            }
            Method::Lstat => {
                let path = self.real(req.path(), Follow::NoFinal)?;
                vec![EntryInfo::new(
                    entry_name(req.path()),
                    fs::symlink_metadata(path)?,
                )]
            }
            Method::Readlink => vec![self.read_link(req.path())?],
            other => {
                return Err(FileOpError::Unsupported {
                    entry: "list",
                    method: other.as_str(),
                });
            }
        };
        Ok(EntryLister::new(entries))
    }

    /// Run a command method: `Mkdir`, `Rmdir`, `Remove`, `Rename`,
    /// `PosixRename`, `Symlink`, `Link` or `Setstat`.
    ///
    /// For `Symlink` and `Link`, `path` is the existing entry and `target`
    /// is where the new link is placed. A symlink stores the host path of
    /// `path`.
    ///
    /// # Errors
    ///
    /// Returns [`FileOpError::MissingTarget`] when a two-path method has no
    /// target, [`FileOpError::Unsupported`] for non-command methods,
    /// [`FileOpError::Jail`] on escape, or the host error unchanged.
    pub fn filecmd(&self, req: &FileOperationRequest) -> Result<(), FileOpError> {
        let method = req.method();
        debug!(method = %method, path = %req.path(), target = ?req.target(), "filecmd");

        match method {
            Method::Mkdir => {
                let path = self.real(req.path(), Follow::Final)?;
                DirBuilder::new().mode(self.dir_mode).create(path)?;
            }
            Method::Rmdir => fs::remove_dir(self.real(req.path(), Follow::NoFinal)?)?,
            Method::Remove => fs::remove_file(self.real(req.path(), Follow::NoFinal)?)?,
            Method::Rename | Method::PosixRename => {
                let (from, to) = self.real_pair(req)?;
                fs::rename(from, to)?;
            }
            Method::Symlink => {
                let (existing, link) = self.real_pair(req)?;
                std::os::unix::fs::symlink(existing, link)?;
            }
            Method::Link => {
                let (existing, link) = self.real_pair(req)?;
                fs::hard_link(existing, link)?;
            }
            Method::Setstat => {
                let path = self.real(req.path(), Follow::Final)?;
                set_attributes(&path, req.attrs())?;
            }
            other => {
                return Err(FileOpError::Unsupported {
                    entry: "cmd",
                    method: other.as_str(),
                });
            }
        }
        Ok(())
    }

    fn real(&self, virtual_path: &str, follow: Follow) -> Result<PathBuf, FileOpError> {
        Ok(self.jail.resolve_real(virtual_path, follow)?)
    }

    fn real_pair(&self, req: &FileOperationRequest) -> Result<(PathBuf, PathBuf), FileOpError> {
        let target = req.target().ok_or(FileOpError::MissingTarget {
            method: req.method().as_str(),
        })?;
        Ok((
            self.real(req.path(), Follow::NoFinal)?,
            self.real(target, Follow::NoFinal)?,
        ))
    }

    fn open_writable(&self, req: &FileOperationRequest) -> Result<FileHandle, FileOpError> {
        let path = self.real(req.path(), Follow::Final)?;
        if let Some(parent) = path.parent() {
            DirBuilder::new()
                .recursive(true)
                .mode(self.dir_mode)
                .create(parent)?;
        }

        let mode = req.attrs().mode().unwrap_or(self.file_mode);
        let file = open_options(req.flags()).mode(mode).open(path)?;
        Ok(FileHandle::new(file))
    }

    fn read_dir(&self, virtual_path: &str) -> Result<Vec<EntryInfo>, FileOpError> {
        let path = self.real(virtual_path, Follow::Final)?;
        let mut entries = Vec::new();
        for entry in fs::read_dir(path)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            entries.push(EntryInfo::new(name, entry.metadata()?));
        }
        entries.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(entries)
    }

    fn read_link(&self, virtual_path: &str) -> Result<EntryInfo, FileOpError> {
        let link = self.real(virtual_path, Follow::NoFinal)?;
        let stored = fs::read_link(link)?;
        let stored = stored.to_string_lossy();
        let resolved = self
            .jail
            .resolve_sibling(virtual_path, &stored, Follow::NoFinal)?;
        let name = resolved
            .file_name()
            .map_or_else(|| "/".to_string(), |n| n.to_string_lossy().into_owned());
        Ok(EntryInfo::new(name, fs::symlink_metadata(resolved)?))
    }
}

/// Translate client open flags into host open options.
///
/// `CREATE`, `TRUNCATE` and `EXCLUSIVE` imply write access. With no write
/// intent the file opens read-only; `APPEND` is ignored.
fn open_options(flags: OpenFlags) -> OpenOptions {
    let write = flags.intersects(
        OpenFlags::WRITE | OpenFlags::CREATE | OpenFlags::TRUNCATE | OpenFlags::EXCLUSIVE,
    );
    let mut options = OpenOptions::new();
    options
        .read(flags.contains(OpenFlags::READ) || !write)
        .write(write)
        .create(flags.contains(OpenFlags::CREATE))
        .truncate(flags.contains(OpenFlags::TRUNCATE))
        .create_new(flags.contains(OpenFlags::EXCLUSIVE));
    options
}

/// Apply present attributes field by field. Ownership is never changed.
///
/// Times are set through the path rather than an open handle, and the mode
/// goes last, so a mode that drops owner read or write never blocks the
/// other fields of the same request.
fn set_attributes(path: &Path, attrs: &FileAttributes) -> std::io::Result<()> {
    if attrs.flags.contains(AttrFlags::SIZE) {
        OpenOptions::new().write(true).open(path)?.set_len(attrs.size)?;
    }
    if attrs.flags.contains(AttrFlags::ACMODTIME) && attrs.atime != 0 && attrs.mtime != 0 {
        filetime::set_file_times(
            path,
            FileTime::from_unix_time(i64::from(attrs.atime), 0),
            FileTime::from_unix_time(i64::from(attrs.mtime), 0),
        )?;
    }
    if attrs.flags.contains(AttrFlags::UIDGID) {
        trace!(uid = attrs.uid, gid = attrs.gid, "ownership change skipped");
    }
    if let Some(mode) = attrs.mode() {
        fs::set_permissions(path, Permissions::from_mode(mode))?;
    }
    Ok(())
}

/// Last segment of a virtual path, `/` for the root.
fn entry_name(virtual_path: &str) -> String {
    let cleaned = clean_rooted(virtual_path);
    match cleaned.rsplit_once('/') {
        Some((_, last)) => last.to_string(),
        None if cleaned.is_empty() => "/".to_string(),
        None => cleaned,
    }
}
