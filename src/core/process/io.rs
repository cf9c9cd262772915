// gitbackup: Git Clone Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! I/O streaming and output capture for processes.
//!
//! ```text
//! run_child()
//!   stdout/stderr reader tasks
//!   mpsc channels buffer lines
//!   wait (or kill on timeout)
//!   --> ProcessOutput { exit_code, stdout, stderr }
//! ```

use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Child;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{trace, warn};

use super::builder::{ProcessBuilder, ProcessOutput, StreamFlags};
use crate::error::ProcessError;

/// Spawns a reader task for one output stream if anything consumes it.
fn spawn_reader<R>(
    stream: Option<R>,
    flags: StreamFlags,
    process_name: &str,
    stream_name: &'static str,
    tx: mpsc::UnboundedSender<String>,
) -> Option<JoinHandle<()>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    if !flags.intersects(StreamFlags::FORWARD_TO_LOG | StreamFlags::KEEP_IN_STRING) {
        return None;
    }
    stream.map(|stream| {
        let name = process_name.to_string();
        tokio::spawn(async move {
            read_stream(stream, flags, &name, stream_name, tx).await;
        })
    })
}

/// Drains captured lines into a single string.
fn collect_output(rx: &mut mpsc::UnboundedReceiver<String>, flags: StreamFlags) -> String {
    if !flags.contains(StreamFlags::KEEP_IN_STRING) {
        return String::new();
    }
    let mut output = String::new();
    while let Ok(line) = rx.try_recv() {
        if !output.is_empty() {
            output.push('\n');
        }
        output.push_str(&line);
    }
    output
}

async fn await_readers(handles: [Option<JoinHandle<()>>; 2]) {
    for handle in handles.into_iter().flatten() {
        let _ = handle.await;
    }
}

impl ProcessBuilder {
    /// Runs the child process, streaming its output and waiting for completion.
    pub(super) async fn run_child(
        &self,
        name: &str,
        cmd_line: &str,
        child: &mut Child,
    ) -> Result<ProcessOutput, ProcessError> {
        let (stdout_tx, mut stdout_rx) = mpsc::unbounded_channel::<String>();
        let (stderr_tx, mut stderr_rx) = mpsc::unbounded_channel::<String>();

        let stdout_handle = spawn_reader(
            child.stdout.take(),
            self.stdout_flags_value(),
            name,
            "stdout",
            stdout_tx,
        );
        let stderr_handle = spawn_reader(
            child.stderr.take(),
            self.stderr_flags_value(),
            name,
            "stderr",
            stderr_tx,
        );

        let wait_error = |e: std::io::Error| ProcessError::OutputError {
            command: cmd_line.to_string(),
            message: e.to_string(),
        };

        let exit_status = if let Some(limit) = self.timeout_duration() {
            tokio::select! {
                status = child.wait() => status.map_err(wait_error)?,
                () = tokio::time::sleep(limit) => {
                    warn!(process = %name, timeout = ?limit, "process timed out");
                    child.kill().await.ok();
                    // Grandchildren may still hold the pipes open
                    for handle in [stdout_handle, stderr_handle].into_iter().flatten() {
                        handle.abort();
                    }
                    return Err(ProcessError::Timeout {
                        command: cmd_line.to_string(),
                        timeout_secs: timeout_secs(limit),
                    });
                }
            }
        } else {
            child.wait().await.map_err(wait_error)?
        };

        await_readers([stdout_handle, stderr_handle]).await;

        Ok(ProcessOutput::new(
            exit_status.code().unwrap_or(-1),
            collect_output(&mut stdout_rx, self.stdout_flags_value()),
            collect_output(&mut stderr_rx, self.stderr_flags_value()),
        ))
    }
}

/// Whole seconds for error reporting, rounding sub-second limits up.
fn timeout_secs(limit: Duration) -> u64 {
    if limit.subsec_nanos() > 0 {
        limit.as_secs() + 1
    } else {
        limit.as_secs()
    }
}

/// Reads a stream line by line, forwarding and/or keeping each line.
///
/// Bytes that are not UTF-8 are replaced rather than ending the read, so the
/// pipe is always drained to EOF.
async fn read_stream<R>(
    reader: R,
    flags: StreamFlags,
    process_name: &str,
    stream_name: &str,
    tx: mpsc::UnboundedSender<String>,
) where
    R: AsyncRead + Unpin,
{
    let mut segments = BufReader::new(reader).split(b'\n');
    loop {
        match segments.next_segment().await {
            Ok(Some(mut bytes)) => {
                if bytes.last() == Some(&b'\r') {
                    bytes.pop();
                }
                let line = String::from_utf8_lossy(&bytes).into_owned();
                if flags.contains(StreamFlags::FORWARD_TO_LOG) {
                    trace!(process = %process_name, stream = %stream_name, line = %line, "output");
                }
                if flags.contains(StreamFlags::KEEP_IN_STRING) {
                    let _ = tx.send(line);
                }
            }
            Ok(None) => break,
            Err(e) => {
                warn!(
                    process = %process_name,
                    stream = %stream_name,
                    error = %e,
                    "error reading stream"
                );
                break;
            }
        }
    }
}
