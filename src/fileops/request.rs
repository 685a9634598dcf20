// gitgood: Git Good - contained git hosting over ssh
//
// SPDX-FileCopyrightText: 2026 Git Good Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! File-transfer request model.
//!
//! ```text
//! FileOperationRequest
//!   method  Get | Put | Open | List | Stat | ... | Setstat
//!   path    virtual path
//!   target  Option<virtual path>   (rename, symlink, link)
//!   flags   OpenFlags              (Get, Put, Open)
//!   attrs   FileAttributes         (Put, Open, Setstat)
//! ```

use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;
use bon::Builder;

use crate::error::FileOpError;

/// A file-transfer method, named as the protocol engine names it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Read,
    Write,
    OpenMixed,
    List,
    Stat,
    Lstat,
    Readlink,
    Mkdir,
    Rmdir,
    Remove,
    Rename,
    PosixRename,
    Symlink,
    Link,
    Setstat,
}

impl Method {
    /// Every method, in protocol order.
    pub const ALL: [Self; 15] = [
        Self::Read,
        Self::Write,
        Self::OpenMixed,
        Self::List,
        Self::Stat,
        Self::Lstat,
        Self::Readlink,
        Self::Mkdir,
        Self::Rmdir,
        Self::Remove,
        Self::Rename,
        Self::PosixRename,
        Self::Symlink,
        Self::Link,
        Self::Setstat,
    ];

    /// Request-server method name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Read => "Get",
            Self::Write => "Put",
            Self::OpenMixed => "Open",
            Self::List => "List",
            Self::Stat => "Stat",
            Self::Lstat => "Lstat",
            Self::Readlink => "Readlink",
            Self::Mkdir => "Mkdir",
            Self::Rmdir => "Rmdir",
            Self::Remove => "Remove",
            Self::Rename => "Rename",
            Self::PosixRename => "PosixRename",
            Self::Symlink => "Symlink",
            Self::Link => "Link",
            Self::Setstat => "Setstat",
        }
    }

    /// Methods that take a second path.
    #[must_use]
    pub const fn needs_target(self) -> bool {
        matches!(
            self,
            Self::Rename | Self::PosixRename | Self::Symlink | Self::Link
        )
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = FileOpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or(FileOpError::Unsupported {
                entry: "request",
                method: "unknown",
            })
    }
}

bitflags! {
    /// Open flags as sent by the client.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct OpenFlags: u32 {
        const READ = 0x01;
        const WRITE = 0x02;
        /// Never honoured: offsets come from each write.
        const APPEND = 0x04;
        const CREATE = 0x08;
        const TRUNCATE = 0x10;
        const EXCLUSIVE = 0x20;
    }
}

bitflags! {
    /// Which [`FileAttributes`] fields are present.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct AttrFlags: u32 {
        const SIZE = 0x01;
        const UIDGID = 0x02;
        const PERMISSIONS = 0x04;
        const ACMODTIME = 0x08;
    }
}

/// Attribute set carried by write, open and setstat requests.
///
/// Fields are only meaningful when the matching [`AttrFlags`] bit is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FileAttributes {
    pub flags: AttrFlags,
    pub size: u64,
    pub uid: u32,
    pub gid: u32,
    pub permissions: u32,
    /// Seconds since the epoch.
    pub atime: u32,
    /// Seconds since the epoch.
    pub mtime: u32,
}

impl FileAttributes {
    #[must_use]
    pub const fn with_size(mut self, size: u64) -> Self {
        self.size = size;
        self.flags = self.flags.union(AttrFlags::SIZE);
        self
    }

    #[must_use]
    pub const fn with_owner(mut self, uid: u32, gid: u32) -> Self {
        self.uid = uid;
        self.gid = gid;
        self.flags = self.flags.union(AttrFlags::UIDGID);
        self
    }

    #[must_use]
    pub const fn with_permissions(mut self, permissions: u32) -> Self {
        self.permissions = permissions;
        self.flags = self.flags.union(AttrFlags::PERMISSIONS);
        self
    }

    #[must_use]
    pub const fn with_times(mut self, atime: u32, mtime: u32) -> Self {
        self.atime = atime;
        self.mtime = mtime;
        self.flags = self.flags.union(AttrFlags::ACMODTIME);
        self
    }

    /// Permission bits, if present.
    #[must_use]
    pub const fn mode(&self) -> Option<u32> {
        if self.flags.contains(AttrFlags::PERMISSIONS) {
            Some(self.permissions & 0o7777)
        } else {
            None
        }
    }
}

/// One request from the protocol engine.
#[derive(Debug, Clone, Builder)]
pub struct FileOperationRequest {
    #[builder(setters(name = with_method))]
    method: Method,
    #[builder(into, setters(name = with_path))]
    path: String,
    #[builder(into, setters(name = with_target))]
    target: Option<String>,
    #[builder(setters(name = with_flags), default)]
    flags: OpenFlags,
    #[builder(setters(name = with_attrs), default)]
    attrs: FileAttributes,
}

impl FileOperationRequest {
    /// Shorthand for a request with only a method and a path.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self::builder().with_method(method).with_path(path).build()
    }

    #[must_use]
    pub const fn method(&self) -> Method {
        self.method
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The second path; an empty string counts as absent.
    #[must_use]
    pub fn target(&self) -> Option<&str> {
        self.target.as_deref().filter(|t| !t.is_empty())
    }

    #[must_use]
    pub const fn flags(&self) -> OpenFlags {
        self.flags
    }

    #[must_use]
    pub const fn attrs(&self) -> &FileAttributes {
        &self.attrs
    }
}
