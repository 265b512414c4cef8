// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors surfaced by the monitor to its caller.
//!
//! Per §7's propagation policy, most discovery/parse problems are logged and
//! swallowed — the container simply runs without a healthcheck. Only a
//! registry conflict (the same container id registered twice) is ever
//! returned to the caller.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MonitorError {
    #[error(transparent)]
    RegistryConflict(#[from] hce_engine::RegistryError),
}
