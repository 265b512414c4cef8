// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Healthcheck status state tag.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The four-valued status of a container's healthcheck.
///
/// `Starting` is sticky only while the timer's startup grace period has not
/// yet elapsed; outside the grace period the status is always `Healthy` or
/// `Unhealthy`. `None` is both the pre-start value and the value restored on
/// `stop()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    None,
    Starting,
    Healthy,
    Unhealthy,
}

impl Status {
    /// The wire string form of this status, per the external status-update contract.
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::None => "none",
            Status::Starting => "starting",
            Status::Healthy => "healthy",
            Status::Unhealthy => "unhealthy",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Default for Status {
    fn default() -> Self {
        Status::None
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
