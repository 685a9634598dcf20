// gitgood: Git Good - contained git hosting over ssh
//
// SPDX-FileCopyrightText: 2026 Git Good Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! File Operation Handler.
//!
//! ```text
//! protocol engine (wire codec, external)
//!        |  FileOperationRequest
//!        v
//! FileOperationHandler --> PathJail::resolve_real --> std::fs
//!        |
//!        v
//! FileHandle | EntryLister | ()      io::Error passed through
//! ```
//!
//! The handler is synchronous and keeps no state between requests; listings
//! are served by offset from an immutable snapshot.

pub mod handle;
pub mod handler;
pub mod lister;
pub mod request;

pub use handle::FileHandle;
pub use handler::FileOperationHandler;
pub use lister::{EntryInfo, EntryLister, ListPage};
pub use request::{AttrFlags, FileAttributes, FileOperationRequest, Method, OpenFlags};

#[cfg(test)]
mod tests;
