// gitgood: Git Good - contained git hosting over ssh
//
// SPDX-FileCopyrightText: 2026 Git Good Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for the file operation handler.
//!
//! Drives a handler the way a file-transfer session would: open, write,
//! list, rename, remove.

use gitgood::error::FileOpError;
use gitgood::fileops::{
    FileAttributes, FileOperationHandler, FileOperationRequest, Method, OpenFlags,
};
use gitgood::jail::PathJail;
use std::fs;
use std::io::ErrorKind;
use tempfile::TempDir;

fn handler() -> (TempDir, FileOperationHandler) {
    let temp = tempfile::tempdir().expect("failed to create temp dir");
    let root = temp.path().join("files");
    fs::create_dir(&root).expect("failed to create root");
    let jail = PathJail::new(&root).expect("jail root should be valid");
    (temp, FileOperationHandler::new(jail))
}

fn put(path: &str) -> FileOperationRequest {
    FileOperationRequest::builder()
        .with_method(Method::Write)
        .with_path(path)
        .with_flags(OpenFlags::WRITE | OpenFlags::CREATE | OpenFlags::TRUNCATE)
        .build()
}

// =============================================================================
// Transfer round trip
// =============================================================================

#[test]
fn upload_then_download() {
    let (_temp, handler) = handler();

    let upload = handler.write(&put("/inbox/deep/report.txt")).unwrap();
    upload.write_all_at(b"hello ", 0).unwrap();
    upload.write_all_at(b"world", 6).unwrap();
    drop(upload);

    let download = handler
        .read(&FileOperationRequest::new(Method::Read, "inbox/deep/report.txt"))
        .unwrap();
    let mut buf = vec![0; download.len().unwrap() as usize];
    let n = download.read_at(&mut buf, 0).unwrap();
    assert_eq!(&buf[..n], b"hello world");
}

#[test]
fn mixed_handle_reads_back_its_own_writes() {
    let (_temp, handler) = handler();
    let req = FileOperationRequest::builder()
        .with_method(Method::OpenMixed)
        .with_path("scratch")
        .with_flags(OpenFlags::READ | OpenFlags::WRITE | OpenFlags::CREATE)
        .build();

    let handle = handler.open_mixed(&req).unwrap();
    handle.write_all_at(b"abcdef", 0).unwrap();
    let mut buf = [0; 3];
    handle.read_at(&mut buf, 2).unwrap();
    assert_eq!(&buf, b"cde");
}

// =============================================================================
// Listings
// =============================================================================

#[test]
fn listing_pages_through_directory() {
    let (_temp, handler) = handler();
    for name in ["c", "a", "b", "e", "d"] {
        drop(handler.write(&put(&format!("dir/{name}"))).unwrap());
    }

    let lister = handler
        .list(&FileOperationRequest::new(Method::List, "dir"))
        .unwrap();

    let mut seen = Vec::new();
    let mut offset = 0;
    loop {
        let page = lister.list_at(offset, 2);
        seen.extend(page.entries.iter().map(|e| e.name().to_string()));
        offset += page.entries.len();
        if page.eof {
            break;
        }
    }
    assert_eq!(seen, ["a", "b", "c", "d", "e"]);
}

#[test]
fn stat_reports_attributes_after_setstat() {
    let (_temp, handler) = handler();
    drop(handler.write(&put("data.bin")).unwrap());

    let setstat = FileOperationRequest::builder()
        .with_method(Method::Setstat)
        .with_path("data.bin")
        .with_attrs(
            FileAttributes::default()
                .with_size(128)
                .with_permissions(0o600)
                .with_times(1_000_000, 2_000_000),
        )
        .build();
    handler.filecmd(&setstat).unwrap();

    let lister = handler
        .list(&FileOperationRequest::new(Method::Stat, "data.bin"))
        .unwrap();
    let entry = lister.iter().next().unwrap();
    assert_eq!(entry.name(), "data.bin");
    assert_eq!(entry.len(), 128);
    assert_eq!(entry.permissions() & 0o777, 0o600);
    let modified = entry.modified().unwrap();
    assert_eq!(
        modified.duration_since(std::time::UNIX_EPOCH).unwrap().as_secs(),
        2_000_000
    );
}

// =============================================================================
// File commands
// =============================================================================

#[test]
fn rename_then_remove() {
    let (_temp, handler) = handler();
    drop(handler.write(&put("draft")).unwrap());

    let rename = FileOperationRequest::builder()
        .with_method(Method::Rename)
        .with_path("draft")
        .with_target("final")
        .build();
    handler.filecmd(&rename).unwrap();

    assert!(handler.jail().root().join("final").is_file());
    assert!(!handler.jail().root().join("draft").exists());

    handler
        .filecmd(&FileOperationRequest::new(Method::Remove, "final"))
        .unwrap();
    let err = handler
        .list(&FileOperationRequest::new(Method::Stat, "final"))
        .unwrap_err();
    assert_eq!(err.io_kind(), Some(ErrorKind::NotFound));
}

#[test]
fn escapes_never_touch_the_host() {
    let (temp, handler) = handler();
    let outside = temp.path().join("outside");
    fs::create_dir(&outside).unwrap();
    std::os::unix::fs::symlink(&outside, handler.jail().root().join("door")).unwrap();

    let err = handler.write(&put("door/planted")).unwrap_err();
    assert!(matches!(err, FileOpError::Jail(_)));
    assert!(!outside.join("planted").exists());

    // Removing the link removes the link, not the directory behind it
    handler
        .filecmd(&FileOperationRequest::new(Method::Remove, "door"))
        .unwrap();
    assert!(outside.is_dir());
}
