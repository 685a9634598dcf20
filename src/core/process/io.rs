// gitgood: Git Good - contained git hosting over ssh
//
// SPDX-FileCopyrightText: 2026 Git Good Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Stream relaying between a session and a child process.
//!
//! ```text
//! caller stdin  --copy-->  child stdin    (dropped on EOF / abandoned on exit)
//! child stdout  --copy-->  caller stdout  (drained before returning)
//! child stderr  --copy-->  caller stderr  (drained before returning)
//!                           child.wait()
//! ```
//!
//! The three copies run concurrently and independently; one finishing does
//! not cancel another. Only the inbound copy is abandoned, once the child
//! has exited and nothing can consume its input any more.

use std::process::ExitStatus;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::process::Child;
use tracing::{debug, trace};

/// Relays the caller's streams to `child` and waits for it to exit.
pub(super) async fn relay_child<I, O, E>(
    name: &str,
    child: &mut Child,
    mut stdin: I,
    mut stdout: O,
    mut stderr: E,
) -> std::io::Result<ExitStatus>
where
    I: AsyncRead + Unpin,
    O: AsyncWrite + Unpin,
    E: AsyncWrite + Unpin,
{
    let child_stdin = child.stdin.take();
    let child_stdout = child.stdout.take();
    let child_stderr = child.stderr.take();

    let inbound = async move {
        let Some(mut child_stdin) = child_stdin else {
            return Ok(0);
        };
        let copied = tokio::io::copy(&mut stdin, &mut child_stdin).await;
        // Dropping the pipe is what tells the child its input ended
        drop(child_stdin);
        copied
    };

    let outbound = async {
        if let Some(mut child_stdout) = child_stdout {
            tokio::io::copy(&mut child_stdout, &mut stdout).await?;
        }
        stdout.flush().await
    };

    let errbound = async {
        if let Some(mut child_stderr) = child_stderr {
            tokio::io::copy(&mut child_stderr, &mut stderr).await?;
        }
        stderr.flush().await
    };

    let finished = async {
        let (out, err) = tokio::join!(outbound, errbound);
        let status = child.wait().await;
        (out, err, status)
    };

    tokio::pin!(inbound);
    tokio::pin!(finished);

    let mut inbound_done = false;
    let (out, err, status) = loop {
        tokio::select! {
            copied = &mut inbound, if !inbound_done => {
                inbound_done = true;
                match copied {
                    Ok(bytes) => trace!(process = %name, bytes, "stdin closed"),
                    Err(e) => debug!(process = %name, error = %e, "stdin relay stopped"),
                }
            }
            result = &mut finished => break result,
        }
    };

    if !inbound_done {
        trace!(process = %name, "child exited before stdin closed");
    }

    let status = status?;
    out?;
    err?;
    Ok(status)
}
