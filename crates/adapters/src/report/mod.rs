// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Status-update reporting adapters.
//!
//! A [`Reporter`] serializes a [`StatusUpdate`] and writes it to the sync
//! channel shared with the parent engine. The channel itself (its transport,
//! lifecycle, and the process on the other end) is an external collaborator;
//! this module only owns the framing written onto it.

mod framed;

pub use framed::FramedReporter;

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeReporter;

use async_trait::async_trait;
use hce_core::StatusUpdate;
use thiserror::Error;

/// Errors from writing a status update.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("serializing status update: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("writing status update: {0}")]
    Io(#[from] std::io::Error),
}

/// Sends `StatusUpdate` records to the parent engine.
///
/// Per §4.6/§7, write failures are the caller's to log and swallow — they
/// never abort the probe loop — so implementations return a plain
/// `Result` and leave that policy to callers rather than retrying here.
#[async_trait]
pub trait Reporter: Send + Sync + 'static {
    async fn send(&self, update: StatusUpdate) -> Result<(), ReportError>;
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
