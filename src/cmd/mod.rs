// gitgood: Git Good - contained git hosting over ssh
//
// SPDX-FileCopyrightText: 2026 Git Good Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Command implementations.
//!
//! ```text
//! CLI args --> cmd::run_* handlers
//!   serve, create, options
//!
//! Config --> services::Services
//!   PathJail(repos) --> CommandDispatcher --> Router
//!   PathJail(files) --> FileOperationHandler
//! ```

pub mod config;
pub mod create;
pub mod serve;
pub mod services;
