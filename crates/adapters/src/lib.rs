// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! hce-adapters: I/O-facing implementations of the engine's abstract seams.
//!
//! Holds the [`probe::ProbeRunner`] trait and its `tokio::process`-backed
//! implementation, the [`report::Reporter`] trait and its length-prefixed
//! framed implementation, and [`bundle::discover_from_bundle`], which reads
//! an OCI bundle's `config.json` off disk and delegates to
//! `hce_core::parse_annotation`. `test-support` exposes fakes of the first
//! two for deterministic tests in the engine and monitor crates.

pub mod bundle;
pub mod probe;
pub mod report;

pub use bundle::{discover_from_bundle, DiscoveryError};
pub use probe::{ProbeOutcome, ProbeRunner, RealProbeRunner};
pub use report::{FramedReporter, ReportError, Reporter};

#[cfg(any(test, feature = "test-support"))]
pub use probe::FakeProbeRunner;
#[cfg(any(test, feature = "test-support"))]
pub use report::FakeReporter;
