// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake probe runner for testing

use std::collections::VecDeque;

use async_trait::async_trait;
use hce_core::Config;
use parking_lot::Mutex;

use super::{ProbeOutcome, ProbeRunner};

/// A single recorded call to [`FakeProbeRunner::run`].
#[derive(Debug, Clone)]
pub struct ProbeCall {
    pub container_id: String,
    pub test: Vec<String>,
}

struct FakeProbeRunnerState {
    queue: VecDeque<ProbeOutcome>,
    calls: Vec<ProbeCall>,
}

/// Probe runner driven by a scripted queue of [`ProbeOutcome`]s.
///
/// Scenario tests push the exact sequence of outcomes a tick-by-tick walk
/// requires; once the queue is drained, further calls return
/// [`ProbeOutcome::success(0)`].
#[derive(Clone)]
pub struct FakeProbeRunner {
    inner: std::sync::Arc<Mutex<FakeProbeRunnerState>>,
}

impl FakeProbeRunner {
    /// A runner with no scripted outcomes; every call succeeds with exit 0.
    pub fn new() -> Self {
        FakeProbeRunner {
            inner: std::sync::Arc::new(Mutex::new(FakeProbeRunnerState {
                queue: VecDeque::new(),
                calls: Vec::new(),
            })),
        }
    }

    /// A runner that replays `outcomes` in order, one per call.
    pub fn with_outcomes(outcomes: impl IntoIterator<Item = ProbeOutcome>) -> Self {
        let runner = Self::new();
        runner.inner.lock().queue.extend(outcomes);
        runner
    }

    /// Pushes another scripted outcome onto the back of the queue.
    pub fn push(&self, outcome: ProbeOutcome) {
        self.inner.lock().queue.push_back(outcome);
    }

    /// Returns every call made so far, in order.
    pub fn calls(&self) -> Vec<ProbeCall> {
        self.inner.lock().calls.clone()
    }

    /// Number of calls made so far.
    pub fn call_count(&self) -> usize {
        self.inner.lock().calls.len()
    }
}

impl Default for FakeProbeRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProbeRunner for FakeProbeRunner {
    async fn run(&self, container_id: &str, config: &Config) -> ProbeOutcome {
        let mut state = self.inner.lock();
        state.calls.push(ProbeCall {
            container_id: container_id.to_string(),
            test: config.test.clone(),
        });
        state.queue.pop_front().unwrap_or_else(|| ProbeOutcome::success(0))
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
