// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! hce-monitor: the container runtime's entry point into the healthcheck
//! engine.
//!
//! [`Supervisor`] ties bundle discovery (`hce_adapters::discover_from_bundle`)
//! to the timer registry (`hce_engine::Registry`), applying §7's propagation
//! policy: discovery/parse failures are logged and swallowed, a registry
//! conflict is surfaced. [`RealSupervisor`] is the production instantiation
//! over the real probe runner, framed reporter, and system clock.

pub mod error;
pub mod supervisor;

pub use error::MonitorError;
pub use supervisor::Supervisor;

use std::sync::Arc;

use hce_adapters::{FramedReporter, RealProbeRunner};
use hce_core::SystemClock;
use tokio::io::AsyncWrite;

/// The concrete `Supervisor` instantiation a real container runtime
/// constructs: real `exec`-backed probes, a framed writer over the sync
/// channel, and the system clock.
pub type RealSupervisor<W> = Supervisor<RealProbeRunner, FramedReporter<W>, SystemClock>;

/// Builds a [`RealSupervisor`] writing status updates to `writer` and
/// running probes via `<runtime_path> exec <container_id> <test...>`.
pub fn init_real<W>(runtime_path: impl Into<String>, writer: W) -> RealSupervisor<W>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    Supervisor::init(
        Arc::new(RealProbeRunner::new(runtime_path)),
        Arc::new(FramedReporter::new(writer)),
        Arc::new(SystemClock),
    )
}
