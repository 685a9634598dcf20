// gitgood: Git Good - contained git hosting over ssh
//
// SPDX-FileCopyrightText: 2026 Git Good Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Async process spawning with relayed stdio.
//!
//! ```text
//! ProcessBuilder::new("git-upload-pack")
//!   .arg() .cwd() .clear_env() .env()
//!   .run_relayed(stdin, stdout, stderr)
//!       --> tokio::process::Command (piped, kill_on_drop)
//!           copy caller <-> child concurrently
//!       --> ProcessOutput { exit_code }
//! ```

pub mod builder;
mod io;
mod runner;
