// gitgood: Git Good - contained git hosting over ssh
//
// SPDX-FileCopyrightText: 2026 Git Good Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use super::handler::FileOperationHandler;
use super::lister::{EntryInfo, EntryLister};
use super::request::{FileAttributes, FileOperationRequest, Method, OpenFlags};
use crate::error::{FileOpError, JailError};
use crate::jail::PathJail;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use tempfile::TempDir;

fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("failed to create temp dir")
}

fn handler_in(temp: &TempDir) -> FileOperationHandler {
    let root = temp.path().join("files");
    fs::create_dir_all(&root).expect("failed to create root");
    FileOperationHandler::new(PathJail::new(&root).expect("jail should construct"))
}

fn put(path: &str, flags: OpenFlags) -> FileOperationRequest {
    FileOperationRequest::builder()
        .with_method(Method::Write)
        .with_path(path)
        .with_flags(flags)
        .build()
}

fn lister_of(names: &[&str], temp: &TempDir) -> EntryLister {
    let meta = fs::metadata(temp.path()).expect("temp dir metadata");
    EntryLister::new(
        names
            .iter()
            .map(|n| EntryInfo::new((*n).to_string(), meta.clone()))
            .collect(),
    )
}

#[test]
fn test_method_names_parse() {
    for method in Method::ALL {
        assert_eq!(method.as_str().parse::<Method>().ok(), Some(method));
    }
    assert!("Chown".parse::<Method>().is_err());
}

#[test]
fn test_method_needs_target() {
    let needing: Vec<_> = Method::ALL
        .into_iter()
        .filter(|m| m.needs_target())
        .map(Method::as_str)
        .collect();
    insta::assert_debug_snapshot!(needing, @r#"
    [
        "Rename",
        "PosixRename",
        "Symlink",
        "Link",
    ]
    "#);
}

#[test]
fn test_empty_target_counts_as_missing() {
    let req = FileOperationRequest::builder()
        .with_method(Method::Rename)
        .with_path("a")
        .with_target("")
        .build();
    assert_eq!(req.target(), None);
}

#[test]
fn test_attribute_mode_masks_file_type() {
    let attrs = FileAttributes::default().with_permissions(0o100_600);
    assert_eq!(attrs.mode(), Some(0o600));
    assert_eq!(FileAttributes::default().mode(), None);
}

#[test]
fn test_pagination_contract() {
    let temp = temp_dir();
    let lister = lister_of(&["a", "b", "c", "d", "e"], &temp);
    let names = |offset, max| {
        let page = lister.list_at(offset, max);
        let names: Vec<_> = page.entries.iter().map(EntryInfo::name).collect();
        (names, page.eof)
    };

    assert_eq!(names(0, 2), (vec!["a", "b"], false));
    assert_eq!(names(2, 2), (vec!["c", "d"], false));
    assert_eq!(names(4, 2), (vec!["e"], true));
    assert_eq!(names(5, 2), (vec![], true));
    assert_eq!(names(100, 2), (vec![], true));
    assert_eq!(names(3, 2), (vec!["d", "e"], true));
    // Re-serving an earlier offset has no side effect
    assert_eq!(names(2, 2), (vec!["c", "d"], false));
    assert_eq!(names(0, usize::MAX), (vec!["a", "b", "c", "d", "e"], true));
}

#[test]
fn test_empty_lister_is_immediately_exhausted() {
    let lister = EntryLister::default();
    let page = lister.list_at(0, 16);
    assert!(page.entries.is_empty());
    assert!(page.eof);
}

#[test]
fn test_write_drops_append_and_supports_offsets() {
    let temp = temp_dir();
    let handler = handler_in(&temp);

    let handle = handler
        .write(&put(
            "notes.txt",
            OpenFlags::WRITE | OpenFlags::CREATE | OpenFlags::APPEND,
        ))
        .expect("write should open");
    handle.write_all_at(b"world", 6).expect("write at offset");
    handle.write_all_at(b"hello ", 0).expect("write at start");
    drop(handle);

    let host = handler.jail().root().join("notes.txt");
    assert_eq!(fs::read(host).expect("file exists"), b"hello world");
}

#[test]
fn test_write_creates_parents_with_default_modes() {
    let temp = temp_dir();
    let handler = handler_in(&temp);

    handler
        .write(&put("a/b/c.txt", OpenFlags::WRITE | OpenFlags::CREATE))
        .expect("write should open");

    let host = handler.jail().root().join("a/b/c.txt");
    let mode = fs::metadata(&host).expect("file exists").permissions().mode();
    // umask may only clear bits
    assert_eq!(mode & 0o7777 & !0o644, 0);
    assert!(handler.jail().root().join("a/b").is_dir());
}

#[test]
fn test_write_applies_requested_permissions() {
    let temp = temp_dir();
    let handler = handler_in(&temp);

    let req = FileOperationRequest::builder()
        .with_method(Method::Write)
        .with_path("secret")
        .with_flags(OpenFlags::WRITE | OpenFlags::CREATE)
        .with_attrs(FileAttributes::default().with_permissions(0o600))
        .build();
    handler.write(&req).expect("write should open");

    let mode = fs::metadata(handler.jail().root().join("secret"))
        .expect("file exists")
        .permissions()
        .mode();
    assert_eq!(mode & 0o077, 0);
}

#[test]
fn test_write_exclusive_refuses_existing_file() {
    let temp = temp_dir();
    let handler = handler_in(&temp);
    fs::write(handler.jail().root().join("taken"), "x").expect("failed to seed file");

    let err = handler
        .write(&put(
            "taken",
            OpenFlags::WRITE | OpenFlags::CREATE | OpenFlags::EXCLUSIVE,
        ))
        .expect_err("exclusive create must fail");
    assert_eq!(err.io_kind(), Some(std::io::ErrorKind::AlreadyExists));
}

#[test]
fn test_write_truncates_when_asked() {
    let temp = temp_dir();
    let handler = handler_in(&temp);
    let host = handler.jail().root().join("log");
    fs::write(&host, "old contents").expect("failed to seed file");

    let handle = handler
        .write(&put("log", OpenFlags::WRITE | OpenFlags::TRUNCATE))
        .expect("write should open");
    assert_eq!(handle.len().expect("len"), 0);
}

#[test]
fn test_open_mixed_reads_and_writes_one_handle() {
    let temp = temp_dir();
    let handler = handler_in(&temp);

    let req = FileOperationRequest::builder()
        .with_method(Method::OpenMixed)
        .with_path("mixed.bin")
        .with_flags(OpenFlags::READ | OpenFlags::WRITE | OpenFlags::CREATE)
        .build();
    let handle = handler.open_mixed(&req).expect("open should succeed");
    handle.write_all_at(b"abcdef", 0).expect("write");
    let mut buf = [0_u8; 3];
    let n = handle.read_at(&mut buf, 2).expect("read");
    assert_eq!(&buf[..n], b"cde");
}

#[test]
fn test_open_create_without_write_flag_creates_file() {
    let temp = temp_dir();
    let handler = handler_in(&temp);

    let req = FileOperationRequest::builder()
        .with_method(Method::OpenMixed)
        .with_path("fresh.txt")
        .with_flags(OpenFlags::READ | OpenFlags::CREATE)
        .build();
    let handle = handler.open_mixed(&req).expect("open should create");
    assert_eq!(handle.len().expect("len"), 0);
    assert!(handler.jail().root().join("fresh.txt").is_file());
}

#[test]
fn test_open_truncate_without_write_flag_truncates() {
    let temp = temp_dir();
    let handler = handler_in(&temp);
    fs::write(handler.jail().root().join("old.txt"), "stale").expect("seed");

    let req = FileOperationRequest::builder()
        .with_method(Method::OpenMixed)
        .with_path("old.txt")
        .with_flags(OpenFlags::READ | OpenFlags::TRUNCATE)
        .build();
    let handle = handler.open_mixed(&req).expect("open should truncate");
    assert_eq!(handle.len().expect("len"), 0);
}

#[test]
fn test_read_handle_refuses_writes() {
    let temp = temp_dir();
    let handler = handler_in(&temp);
    fs::write(handler.jail().root().join("ro"), "data").expect("failed to seed file");

    let handle = handler
        .read(&FileOperationRequest::new(Method::Read, "ro"))
        .expect("read should open");
    let mut buf = [0_u8; 8];
    assert_eq!(handle.read_at(&mut buf, 0).expect("read"), 4);
    assert!(handle.write_at(b"x", 0).is_err());
}

#[test]
fn test_read_missing_file_passes_not_found_through() {
    let temp = temp_dir();
    let handler = handler_in(&temp);
    let err = handler
        .read(&FileOperationRequest::new(Method::Read, "missing"))
        .expect_err("missing file");
    assert_eq!(err.io_kind(), Some(std::io::ErrorKind::NotFound));
}

#[test]
fn test_list_empty_directory() {
    let temp = temp_dir();
    let handler = handler_in(&temp);
    fs::create_dir(handler.jail().root().join("empty")).expect("failed to create dir");

    let lister = handler
        .list(&FileOperationRequest::new(Method::List, "empty"))
        .expect("list should succeed");
    let page = lister.list_at(0, 32);
    assert!(page.entries.is_empty());
    assert!(page.eof);
}

#[test]
fn test_list_directory_is_sorted_and_lstats_children() {
    let temp = temp_dir();
    let handler = handler_in(&temp);
    let root = handler.jail().root();
    fs::write(root.join("b.txt"), "bb").expect("seed");
    fs::create_dir(root.join("a-dir")).expect("seed");
    std::os::unix::fs::symlink("b.txt", root.join("c-link")).expect("seed");

    let lister = handler
        .list(&FileOperationRequest::new(Method::List, "/"))
        .expect("list should succeed");
    let described: Vec<_> = lister
        .iter()
        .map(|e| (e.name().to_string(), e.is_dir(), e.is_symlink()))
        .collect();
    assert_eq!(
        described,
        vec![
            ("a-dir".to_string(), true, false),
            ("b.txt".to_string(), false, false),
            ("c-link".to_string(), false, true),
        ]
    );
}

#[test]
fn test_stat_follows_and_lstat_does_not() {
    let temp = temp_dir();
    let handler = handler_in(&temp);
    let root = handler.jail().root();
    fs::write(root.join("file"), "12345").expect("seed");
    std::os::unix::fs::symlink("file", root.join("link")).expect("seed");

    let stat = handler
        .list(&FileOperationRequest::new(Method::Stat, "link"))
        .expect("stat");
    let entry = stat.list_at(0, 1).entries[0].clone();
    assert_eq!(entry.name(), "link");
    assert!(!entry.is_symlink());
    assert_eq!(entry.len(), 5);

    let lstat = handler
        .list(&FileOperationRequest::new(Method::Lstat, "link"))
        .expect("lstat");
    assert_eq!(lstat.len(), 1);
    assert!(lstat.list_at(0, 1).entries[0].is_symlink());
}

#[test]
fn test_readlink_describes_resolved_target() {
    let temp = temp_dir();
    let handler = handler_in(&temp);
    let root = handler.jail().root();
    fs::create_dir(root.join("docs")).expect("seed");
    fs::write(root.join("docs/target.txt"), "abc").expect("seed");
    std::os::unix::fs::symlink("target.txt", root.join("docs/alias")).expect("seed");

    let lister = handler
        .list(&FileOperationRequest::new(Method::Readlink, "docs/alias"))
        .expect("readlink");
    let page = lister.list_at(0, 10);
    assert!(page.eof);
    assert_eq!(page.entries.len(), 1);
    assert_eq!(page.entries[0].name(), "target.txt");
    assert_eq!(page.entries[0].len(), 3);
}

#[test]
fn test_list_rejects_command_methods() {
    let temp = temp_dir();
    let handler = handler_in(&temp);
    let err = handler
        .list(&FileOperationRequest::new(Method::Mkdir, "x"))
        .expect_err("mkdir is not a list method");
    insta::assert_snapshot!(err.to_string(), @"unsupported list method: Mkdir");
}

#[test]
fn test_mkdir_rmdir_remove() {
    let temp = temp_dir();
    let handler = handler_in(&temp);
    let root = handler.jail().root().to_path_buf();

    handler
        .filecmd(&FileOperationRequest::new(Method::Mkdir, "new"))
        .expect("mkdir");
    assert!(root.join("new").is_dir());

    let err = handler
        .filecmd(&FileOperationRequest::new(Method::Mkdir, "new"))
        .expect_err("mkdir twice");
    assert_eq!(err.io_kind(), Some(std::io::ErrorKind::AlreadyExists));

    handler
        .filecmd(&FileOperationRequest::new(Method::Rmdir, "new"))
        .expect("rmdir");
    assert!(!root.join("new").exists());

    fs::write(root.join("f"), "x").expect("seed");
    handler
        .filecmd(&FileOperationRequest::new(Method::Remove, "f"))
        .expect("remove");
    assert!(!root.join("f").exists());
}

#[test]
fn test_rename_requires_target() {
    let temp = temp_dir();
    let handler = handler_in(&temp);
    for method in [Method::Rename, Method::PosixRename, Method::Symlink, Method::Link] {
        let err = handler
            .filecmd(&FileOperationRequest::new(method, "a"))
            .expect_err("target is required");
        assert!(matches!(err, FileOpError::MissingTarget { method: m } if m == method.as_str()));
    }
}

#[test]
fn test_rename_moves_within_jail() {
    let temp = temp_dir();
    let handler = handler_in(&temp);
    let root = handler.jail().root().to_path_buf();
    fs::write(root.join("old"), "x").expect("seed");

    let req = FileOperationRequest::builder()
        .with_method(Method::PosixRename)
        .with_path("old")
        .with_target("../../new")
        .build();
    handler.filecmd(&req).expect("rename");
    assert!(root.join("new").is_file());
    assert!(!root.join("old").exists());
}

#[test]
fn test_symlink_stores_resolved_host_path() {
    let temp = temp_dir();
    let handler = handler_in(&temp);
    let root = handler.jail().root().to_path_buf();
    fs::write(root.join("real"), "x").expect("seed");

    let req = FileOperationRequest::builder()
        .with_method(Method::Symlink)
        .with_path("real")
        .with_target("alias")
        .build();
    handler.filecmd(&req).expect("symlink");

    let stored = fs::read_link(root.join("alias")).expect("link exists");
    assert!(stored.is_absolute());
    assert_eq!(
        stored,
        fs::canonicalize(&root).expect("root exists").join("real")
    );
    assert_eq!(fs::read(root.join("alias")).expect("follows"), b"x");
}

#[test]
fn test_hard_link_shares_contents() {
    let temp = temp_dir();
    let handler = handler_in(&temp);
    let root = handler.jail().root().to_path_buf();
    fs::write(root.join("orig"), "shared").expect("seed");

    let req = FileOperationRequest::builder()
        .with_method(Method::Link)
        .with_path("orig")
        .with_target("copy")
        .build();
    handler.filecmd(&req).expect("link");
    assert_eq!(fs::read(root.join("copy")).expect("link exists"), b"shared");
}

#[test]
fn test_setstat_applies_fields_and_skips_ownership() {
    let temp = temp_dir();
    let handler = handler_in(&temp);
    let root = handler.jail().root().to_path_buf();
    fs::write(root.join("f"), "0123456789").expect("seed");

    let attrs = FileAttributes::default()
        .with_permissions(0o600)
        .with_size(4)
        .with_times(1_000_000, 2_000_000)
        .with_owner(0, 0);
    let req = FileOperationRequest::builder()
        .with_method(Method::Setstat)
        .with_path("f")
        .with_attrs(attrs)
        .build();
    handler.filecmd(&req).expect("setstat");

    let meta = fs::metadata(root.join("f")).expect("file exists");
    assert_eq!(meta.len(), 4);
    assert_eq!(meta.permissions().mode() & 0o7777, 0o600);
    let modified = meta
        .modified()
        .expect("mtime")
        .duration_since(std::time::UNIX_EPOCH)
        .expect("after epoch");
    assert_eq!(modified.as_secs(), 2_000_000);
}

#[test]
fn test_setstat_times_survive_write_only_mode() {
    let temp = temp_dir();
    let handler = handler_in(&temp);
    let root = handler.jail().root().to_path_buf();
    fs::write(root.join("dropbox"), "x").expect("seed");

    let req = FileOperationRequest::builder()
        .with_method(Method::Setstat)
        .with_path("dropbox")
        .with_attrs(
            FileAttributes::default()
                .with_permissions(0o200)
                .with_times(1_000_000, 3_000_000),
        )
        .build();
    handler.filecmd(&req).expect("setstat");

    // Already write-only: a later times-only request must still apply
    let req = FileOperationRequest::builder()
        .with_method(Method::Setstat)
        .with_path("dropbox")
        .with_attrs(FileAttributes::default().with_times(1_000_000, 4_000_000))
        .build();
    handler.filecmd(&req).expect("setstat on write-only file");

    let meta = fs::metadata(root.join("dropbox")).expect("file exists");
    assert_eq!(meta.permissions().mode() & 0o7777, 0o200);
    let modified = meta
        .modified()
        .expect("mtime")
        .duration_since(std::time::UNIX_EPOCH)
        .expect("after epoch");
    assert_eq!(modified.as_secs(), 4_000_000);
}

#[test]
fn test_setstat_ignores_zero_times() {
    let temp = temp_dir();
    let handler = handler_in(&temp);
    let root = handler.jail().root().to_path_buf();
    fs::write(root.join("f"), "x").expect("seed");
    let before = fs::metadata(root.join("f")).expect("meta").modified().expect("mtime");

    let req = FileOperationRequest::builder()
        .with_method(Method::Setstat)
        .with_path("f")
        .with_attrs(FileAttributes::default().with_times(0, 0))
        .build();
    handler.filecmd(&req).expect("setstat");

    let after = fs::metadata(root.join("f")).expect("meta").modified().expect("mtime");
    assert_eq!(before, after);
}

#[test]
fn test_filecmd_rejects_list_methods() {
    let temp = temp_dir();
    let handler = handler_in(&temp);
    let err = handler
        .filecmd(&FileOperationRequest::new(Method::Stat, "x"))
        .expect_err("stat is not a command");
    assert!(matches!(err, FileOpError::Unsupported { entry: "cmd", method: "Stat" }));
}

#[test]
fn test_operations_refuse_links_out_of_jail() {
    let temp = temp_dir();
    let handler = handler_in(&temp);
    let outside = temp.path().join("outside");
    fs::create_dir_all(&outside).expect("seed");
    fs::write(outside.join("secret"), "s3cret").expect("seed");
    std::os::unix::fs::symlink(&outside, handler.jail().root().join("escape")).expect("seed");

    let read = handler.read(&FileOperationRequest::new(Method::Read, "escape/secret"));
    assert!(matches!(read, Err(FileOpError::Jail(JailError::PathEscape { .. }))));

    let write = handler.write(&put("escape/planted", OpenFlags::WRITE | OpenFlags::CREATE));
    assert!(matches!(write, Err(FileOpError::Jail(JailError::PathEscape { .. }))));
    assert!(!outside.join("planted").exists());

    let list = handler.list(&FileOperationRequest::new(Method::List, "escape"));
    assert!(matches!(list, Err(FileOpError::Jail(JailError::PathEscape { .. }))));

    // Removing the link itself is allowed and leaves the target alone
    handler
        .filecmd(&FileOperationRequest::new(Method::Remove, "escape"))
        .expect("removing the link itself is contained");
    assert!(outside.join("secret").is_file());
}
