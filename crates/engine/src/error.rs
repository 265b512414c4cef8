// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the timer/registry boundary.

use thiserror::Error;

/// Errors from [`crate::timer::Timer::start`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TimerStartError {
    #[error("cannot start a timer whose config is disabled")]
    Disabled,
    #[error("cannot start a timer with an empty test command")]
    EmptyTest,
    #[error("timer is already active")]
    AlreadyActive,
}

/// Errors from [`crate::registry::Registry`] operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("a timer is already registered for container {0}")]
    DuplicateContainer(String),
}
