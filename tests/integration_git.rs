// gitgood: Git Good - contained git hosting over ssh
//
// SPDX-FileCopyrightText: 2026 Git Good Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! End-to-end tests for the git service.
//!
//! Creates a real bare repository and runs the installed `git-upload-pack`
//! and `git-receive-pack` against it. Tests return early when git is not
//! installed.

use gitgood::core::process::builder::ProcessBuilder;
use gitgood::error::{CommandError, GitGoodError};
use gitgood::git::repo::create_repo;
use gitgood::git::service::CommandDispatcher;
use gitgood::jail::PathJail;
use gitgood::namespace::RepositoryIdentifier;
use std::fs;
use tempfile::TempDir;

fn git_installed() -> bool {
    ["git-upload-pack", "git-receive-pack"]
        .iter()
        .all(|name| ProcessBuilder::exists(name))
}

fn setup() -> (TempDir, CommandDispatcher) {
    let temp = tempfile::tempdir().expect("failed to create temp dir");
    let root = temp.path().join("repos");
    fs::create_dir(&root).expect("failed to create root");
    let jail = PathJail::new(&root).expect("jail root should be valid");
    (temp, CommandDispatcher::new(jail, None))
}

// =============================================================================
// Service round trip
// =============================================================================

#[tokio::test]
async fn upload_and_receive_pack_serve_the_same_repository() {
    if !git_installed() {
        eprintln!("git service binaries not installed, skipping");
        return;
    }
    let (_temp, dispatcher) = setup();
    let repo = RepositoryIdentifier::new("alice", "proj").unwrap();
    let created = create_repo(dispatcher.jail(), &repo).unwrap();

    let mut upload_out: Vec<u8> = Vec::new();
    let mut upload_err: Vec<u8> = Vec::new();
    let upload = dispatcher
        .dispatch(
            "git-upload-pack",
            "'alice/proj'",
            &b"0000"[..],
            &mut upload_out,
            &mut upload_err,
        )
        .await
        .unwrap();

    let mut receive_out: Vec<u8> = Vec::new();
    let mut receive_err: Vec<u8> = Vec::new();
    let receive = dispatcher
        .dispatch(
            "git-receive-pack",
            "alice/proj",
            &b"0000"[..],
            &mut receive_out,
            &mut receive_err,
        )
        .await
        .unwrap();

    assert_eq!(upload.exit_code, 0);
    assert_eq!(receive.exit_code, 0);
    assert_eq!(upload.repo_path, receive.repo_path);
    assert_eq!(upload.repo_path, fs::canonicalize(created).unwrap());

    // Both services advertise, ending with a flush packet
    assert!(upload_out.ends_with(b"0000"), "{upload_out:?}");
    assert!(receive_out.ends_with(b"0000"), "{receive_out:?}");
    assert!(String::from_utf8_lossy(&receive_out).contains("report-status"));
}

#[tokio::test]
async fn missing_repository_is_reported_by_git() {
    if !git_installed() {
        return;
    }
    let (_temp, dispatcher) = setup();
    let mut out: Vec<u8> = Vec::new();
    let mut err: Vec<u8> = Vec::new();

    let result = dispatcher
        .dispatch("git-upload-pack", "alice/missing", &b""[..], &mut out, &mut err)
        .await;

    assert!(matches!(
        result,
        Err(GitGoodError::Command(ref e)) if matches!(**e, CommandError::NonZeroExit { .. })
    ));
    assert!(!err.is_empty());
}

// =============================================================================
// Rejections
// =============================================================================

#[tokio::test]
async fn disallowed_commands_never_spawn() {
    let (temp, dispatcher) = setup();
    let marker = temp.path().join("pwned");

    for command in ["git-upload-archive", "sh", "touch", "git"] {
        let result = dispatcher
            .dispatch(
                command,
                &marker.display().to_string(),
                &b""[..],
                Vec::<u8>::new(),
                Vec::<u8>::new(),
            )
            .await;
        let err = result.unwrap_err();
        assert!(err.to_string().starts_with("command error: command not allowed"), "{err}");
    }
    assert!(!marker.exists());
}

#[tokio::test]
async fn traversal_in_repository_argument_is_rejected() {
    let (_temp, dispatcher) = setup();
    for repo in ["../alice/proj", "alice/../../etc", "alice/proj/../../../x", ""] {
        let result = dispatcher
            .dispatch("git-receive-pack", repo, &b""[..], Vec::<u8>::new(), Vec::<u8>::new())
            .await;
        assert!(
            matches!(result, Err(GitGoodError::Argument(_))),
            "{repo:?}: {result:?}"
        );
    }
}

#[tokio::test]
async fn absolute_repository_argument_is_rejected() {
    let (_temp, dispatcher) = setup();
    for repo in ["/alice/proj", "'/alice/proj'"] {
        let result = dispatcher
            .dispatch("git-upload-pack", repo, &b""[..], Vec::<u8>::new(), Vec::<u8>::new())
            .await;
        assert!(
            matches!(result, Err(GitGoodError::Argument(_))),
            "{repo:?}: {result:?}"
        );
    }
}
