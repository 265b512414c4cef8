// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Length-prefixed JSON reporter.
//!
//! Wire format: 1-byte message tag + 4-byte big-endian length + JSON payload.
//! The tag distinguishes a healthcheck status update from any other message
//! type the parent engine's sync channel may carry; it is an implementation
//! detail of this channel, not part of the JSON payload itself.

use std::sync::Arc;

use async_trait::async_trait;
use hce_core::StatusUpdate;
use tokio::io::AsyncWrite;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use super::{ReportError, Reporter};

/// Tag identifying a healthcheck status update frame on the sync channel.
pub const HEALTHCHECK_STATUS_TAG: u8 = 1;

/// Reporter that writes tag-prefixed, length-prefixed JSON frames to an
/// async writer, serializing concurrent writers behind a [`tokio::sync::Mutex`]
/// so two Timer workers never interleave their frames.
pub struct FramedReporter<W> {
    writer: Arc<Mutex<W>>,
}

impl<W> FramedReporter<W>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    pub fn new(writer: W) -> Self {
        FramedReporter {
            writer: Arc::new(Mutex::new(writer)),
        }
    }
}

impl<W> Clone for FramedReporter<W> {
    fn clone(&self) -> Self {
        FramedReporter {
            writer: Arc::clone(&self.writer),
        }
    }
}

#[async_trait]
impl<W> Reporter for FramedReporter<W>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    async fn send(&self, update: StatusUpdate) -> Result<(), ReportError> {
        let payload = update.to_json()?;
        let len = u32::try_from(payload.len()).unwrap_or(u32::MAX);

        let mut writer = self.writer.lock().await;
        writer.write_all(&[HEALTHCHECK_STATUS_TAG]).await?;
        writer.write_all(&len.to_be_bytes()).await?;
        writer.write_all(&payload).await?;
        writer.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "framed_tests.rs"]
mod tests;
