// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake reporter for testing

use std::sync::Arc;

use async_trait::async_trait;
use hce_core::StatusUpdate;
use parking_lot::Mutex;

use super::{ReportError, Reporter};

struct FakeReporterState {
    sent: Vec<StatusUpdate>,
    fail: bool,
}

/// Reporter that records every sent [`StatusUpdate`] in memory.
///
/// [`FakeReporter::failing`] builds a variant that always returns an error,
/// for exercising the §4.6 "log and swallow" write-failure path.
#[derive(Clone)]
pub struct FakeReporter {
    inner: Arc<Mutex<FakeReporterState>>,
}

impl FakeReporter {
    pub fn new() -> Self {
        FakeReporter {
            inner: Arc::new(Mutex::new(FakeReporterState {
                sent: Vec::new(),
                fail: false,
            })),
        }
    }

    /// A reporter whose `send` always fails with an I/O error.
    pub fn failing() -> Self {
        let reporter = Self::new();
        reporter.inner.lock().fail = true;
        reporter
    }

    /// All updates successfully sent so far, in order.
    pub fn sent(&self) -> Vec<StatusUpdate> {
        self.inner.lock().sent.clone()
    }
}

impl Default for FakeReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Reporter for FakeReporter {
    async fn send(&self, update: StatusUpdate) -> Result<(), ReportError> {
        let mut state = self.inner.lock();
        if state.fail {
            return Err(ReportError::Io(std::io::Error::other("fake reporter configured to fail")));
        }
        state.sent.push(update);
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
