// gitgood: Git Good - contained git hosting over ssh
//
// SPDX-FileCopyrightText: 2026 Git Good Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! The `serve` command: one ssh session over the process's stdio.

use anyhow::Context;
use tokio::io::{stderr, stdin, stdout};
use tokio::signal::unix::{SignalKind, signal};
use tracing::{debug, warn};

use super::services::Services;
use crate::cli::global::GlobalOptions;
use crate::cli::serve::ServeArgs;
use crate::config::Config;
use crate::error::Result;
use crate::logging::LogLevel;
use crate::session::{Route, SessionOutcome, route};

/// Console log level for a session.
///
/// Stderr belongs to the client during `serve`, so the console stays silent
/// unless `--log-level` asks for output. The file log is unaffected.
#[must_use]
pub fn console_log_level(global: &GlobalOptions, config: &Config) -> LogLevel {
    match global.log_level {
        Some(_) => config.global.output_log_level,
        None => LogLevel::SILENT,
    }
}

/// Run one session and return the process exit code.
///
/// A git session exits with the service's own code. Dispatch failures have
/// already been reported on stderr and exit with 1. A hangup or terminate
/// signal abandons the session, killing any running service, and exits
/// with 1.
///
/// # Errors
///
/// Returns an error if the services cannot be built or the shell's streams
/// fail.
pub async fn run_serve_command(args: &ServeArgs, config: &Config) -> Result<i32> {
    let services = Services::from_config(config)?;
    let argv = args.argv();
    let git = matches!(route(argv.as_slice()), Route::Git { .. });
    debug!(user = %args.user, argc = argv.len(), git, "serve");

    let mut hangup = signal(SignalKind::hangup()).context("failed to watch SIGHUP")?;
    let mut terminate = signal(SignalKind::terminate()).context("failed to watch SIGTERM")?;

    let session = services
        .router
        .serve(&args.user, argv.as_slice(), stdin(), stdout(), stderr());

    let outcome = tokio::select! {
        outcome = session => outcome,
        _ = hangup.recv() => {
            warn!(user = %args.user, "hangup, abandoning session");
            return Ok(1);
        }
        _ = terminate.recv() => {
            warn!(user = %args.user, "terminated, abandoning session");
            return Ok(1);
        }
    };

    match outcome {
        Ok(SessionOutcome::Git(outcome)) => Ok(outcome.exit_code),
        Ok(SessionOutcome::Shell) => Ok(0),
        Err(_) if git => Ok(1),
        Err(e) => Err(e.into()),
    }
}
