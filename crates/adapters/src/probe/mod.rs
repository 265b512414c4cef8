// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Probe execution adapters.
//!
//! A [`ProbeRunner`] runs one configured `test` command against a container
//! and reports back an exit code (or the fact that the command could not be
//! run at all). The timer state machine only ever sees a [`ProbeOutcome`]; it
//! never touches a subprocess directly.

mod real;

pub use real::RealProbeRunner;

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeProbeRunner;

use async_trait::async_trait;
use hce_core::Config;

/// Outcome of a single probe execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutcome {
    /// Mapped exit code. Only meaningful when `ok` is `true`.
    pub exit_code: i64,
    /// `false` when the probe command itself could not be spawned or its
    /// exit status could not be determined (distinct from the command
    /// running and exiting non-zero, which is `ok: true` with a non-zero
    /// `exit_code`).
    pub ok: bool,
    /// Up to 4 KiB of captured stderr, trailing newlines trimmed. Carried
    /// for diagnostic logging only; never parsed for health semantics.
    pub stderr_snippet: String,
}

impl ProbeOutcome {
    /// A successful probe run with no captured diagnostic output.
    pub fn success(exit_code: i64) -> Self {
        ProbeOutcome {
            exit_code,
            ok: true,
            stderr_snippet: String::new(),
        }
    }

    /// The probe command itself could not be run.
    pub fn spawn_failed() -> Self {
        ProbeOutcome {
            exit_code: -1,
            ok: false,
            stderr_snippet: String::new(),
        }
    }
}

/// Runs a container's configured healthcheck command.
#[async_trait]
pub trait ProbeRunner: Send + Sync + 'static {
    /// Execute `config.test` inside `container_id` and report the outcome.
    ///
    /// Implementations must never enforce `config.timeout_s` by killing the
    /// probe; the timeout is advisory information reported alongside status,
    /// not a deadline this call observes.
    async fn run(&self, container_id: &str, config: &Config) -> ProbeOutcome;
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
