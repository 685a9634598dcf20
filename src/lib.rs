// gitgood: Git Good - contained git hosting over ssh
//
// SPDX-FileCopyrightText: 2026 Git Good Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Library root.
//!
//! # Crate Architecture
//!
//! ```text
//!                        main.rs
//!                           |
//!                +----------+----------+
//!                v                     v
//!             cli (clap)          cmd (handlers)
//!                |          serve / create / options
//!                +----------+----------+
//!                           v
//!              ,---------------------------,
//!              |          config           |
//!              |  TOML + env, layered      |
//!              '-------------+-------------'
//!                            v
//!                         session
//!                  Router --> Shell (create)
//!                    |
//!          +---------+----------+
//!          v                    v
//!         git               fileops
//!   service allow-list   request model,
//!   dispatch, create     handles, listings
//!          |                    |
//!          +---------+----------+
//!                    v
//!   +-----------------------------------------+
//!   |  namespace   OWNER/NAME validation      |
//!   |  jail        virtual path -> host path  |
//!   |  core        process spawn + relay      |
//!   +-----------------------------------------+
//!   |  foundation   error, logging            |
//!   +-----------------------------------------+
//! ```

pub mod cli;
pub mod cmd;
pub mod config;
pub mod core;
pub mod error;
pub mod fileops;
pub mod git;
pub mod jail;
pub mod logging;
pub mod namespace;
pub mod session;
