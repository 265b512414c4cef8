// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Probe runner backed by the container runtime's `exec` subcommand.

use std::process::{ExitStatus, Stdio};

use async_trait::async_trait;
use hce_core::Config;
use tokio::process::Command;

use super::{ProbeOutcome, ProbeRunner};

/// Maximum bytes of stderr retained for diagnostic logging.
const STDERR_CAP: usize = 4096;

/// Runs a probe by shelling out to `<runtime_path> exec <container_id> <test...>`.
///
/// Mirrors the fork/exec/wait sequence of §4.3: stdout discarded, stderr
/// captured and capped, termination mapped to `(exit_code, ok)`. `timeout_s`
/// is never enforced here; it travels with the `Config` purely for
/// reporting.
#[derive(Debug, Clone)]
pub struct RealProbeRunner {
    runtime_path: String,
}

impl RealProbeRunner {
    pub fn new(runtime_path: impl Into<String>) -> Self {
        RealProbeRunner {
            runtime_path: runtime_path.into(),
        }
    }
}

#[async_trait]
impl ProbeRunner for RealProbeRunner {
    async fn run(&self, container_id: &str, config: &Config) -> ProbeOutcome {
        let mut cmd = Command::new(&self.runtime_path);
        cmd.arg("exec")
            .arg(container_id)
            .args(&config.test)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        let child = match cmd.spawn() {
            Ok(child) => child,
            Err(err) => {
                tracing::warn!(container_id, runtime_path = %self.runtime_path, error = %err, "probe spawn failed");
                return ProbeOutcome::spawn_failed();
            }
        };

        match child.wait_with_output().await {
            Ok(output) => {
                let (exit_code, ok) = map_exit_status(output.status);
                let stderr_snippet = snippet(&output.stderr);
                if !ok {
                    tracing::warn!(container_id, ?output.status, "probe terminated abnormally");
                }
                ProbeOutcome {
                    exit_code,
                    ok,
                    stderr_snippet,
                }
            }
            Err(err) => {
                tracing::warn!(container_id, error = %err, "probe wait failed");
                ProbeOutcome::spawn_failed()
            }
        }
    }
}

/// Maps a terminated child's exit status to `(exit_code, ok)` per §4.3 step 4.
fn map_exit_status(status: ExitStatus) -> (i64, bool) {
    if let Some(code) = status.code() {
        return (i64::from(code), true);
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return (128 + i64::from(signal), true);
        }
    }

    (-1, false)
}

/// Caps captured stderr to [`STDERR_CAP`] bytes and trims trailing newlines.
fn snippet(bytes: &[u8]) -> String {
    let capped = &bytes[..bytes.len().min(STDERR_CAP)];
    String::from_utf8_lossy(capped).trim_end_matches('\n').to_string()
}

#[cfg(test)]
#[path = "real_tests.rs"]
mod tests;
