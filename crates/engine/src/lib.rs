// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! hce-engine: the per-container timer state machine and its registry.
//!
//! [`Timer`] owns one container's tick/grace/retry state machine and the
//! tokio task that drives it; [`Registry`] is the process-wide map from
//! container id to `Timer` that owns every timer it holds and guarantees
//! each is stopped and joined before it is ever dropped.

pub mod error;
pub mod registry;
pub mod timer;

pub use error::{RegistryError, TimerStartError};
pub use registry::Registry;
pub use timer::{apply_probe, begin_tick, grace_emission, TickAction, Timer, TimerSnapshot, TimerState};
