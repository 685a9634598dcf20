// gitgood: Git Good - contained git hosting over ssh
//
// SPDX-FileCopyrightText: 2026 Git Good Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git service mediation.
//!
//! ```text
//!          session
//!         /       \
//!        v         v
//!   service.rs   repo.rs
//!   allow-list   create_repo
//!   dispatcher   (gix, in-process)
//!        |
//!        v
//!   git-upload-pack / git-receive-pack
//!   (subprocess, empty env)
//! ```
//!
//! Only the two service commands are ever spawned. Repository creation
//! never spawns anything.

pub mod repo;
pub mod service;
