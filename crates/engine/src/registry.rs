// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process-wide mapping from container id to [`Timer`], per §4.5.
//!
//! The registry owns every `Timer` it holds (via a strong `Arc`); each
//! `Timer`'s own worker task only ever holds a `Weak` back-reference (see
//! `timer.rs`). `teardown` stops and joins every timer before the map itself
//! is dropped, which is what lets that `Weak` reference be sound: the
//! registry guarantees no `Timer` is ever dropped while its worker might
//! still be running.

use std::collections::HashMap;
use std::sync::Arc;

use hce_adapters::{ProbeRunner, Reporter};
use hce_core::{Clock, ContainerId};
use parking_lot::Mutex;

use crate::error::RegistryError;
use crate::timer::{Timer, TimerSnapshot};

/// A process-wide, explicitly-constructed registry of active timers.
///
/// Per §9's design note, this replaces a process-wide mutable global: the
/// monitor constructs one `Registry` at startup (`Registry::init`) and holds
/// it for its lifetime, passing it by reference rather than reaching for
/// ambient state.
pub struct Registry<P, R, C> {
    timers: Mutex<HashMap<ContainerId, Arc<Timer<P, R, C>>>>,
}

impl<P, R, C> Registry<P, R, C>
where
    P: ProbeRunner,
    R: Reporter,
    C: Clock,
{
    /// Allocates an empty registry. Idempotent in the sense that calling it
    /// again just produces another empty registry; there is no hidden
    /// global state to reset.
    pub fn init() -> Self {
        Registry {
            timers: Mutex::new(HashMap::new()),
        }
    }

    /// Registers `timer` under its container id.
    ///
    /// Per §4.5, a second `insert` for the same container id is rejected
    /// rather than replacing the existing timer.
    pub fn insert(&self, timer: Arc<Timer<P, R, C>>) -> Result<(), RegistryError> {
        let mut timers = self.timers.lock();
        if timers.contains_key(timer.container_id()) {
            return Err(RegistryError::DuplicateContainer(timer.container_id().to_string()));
        }
        tracing::info!(container_id = %timer.container_id(), "timer registered");
        timers.insert(timer.container_id().clone(), timer);
        Ok(())
    }

    /// Removes and returns the timer registered for `container_id`, if any.
    ///
    /// Used by callers that want to `stop()` a single container's
    /// healthcheck without tearing down the whole registry.
    pub fn remove(&self, container_id: &str) -> Option<Arc<Timer<P, R, C>>> {
        self.timers.lock().remove(container_id)
    }

    /// A best-effort administrative snapshot of one container's timer.
    ///
    /// Per §4.5: "a weak reference used only for administrative status
    /// queries" — the caller gets a point-in-time clone, not a handle it
    /// can use to mutate the timer.
    pub fn lookup(&self, container_id: &str) -> Option<TimerSnapshot> {
        self.timers.lock().get(container_id).map(|timer| timer.snapshot())
    }

    /// Number of timers currently registered.
    pub fn len(&self) -> usize {
        self.timers.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.lock().is_empty()
    }

    /// Stops every registered timer, joining its worker, then clears the
    /// map. Per §4.7, called exactly once at monitor exit; no further
    /// `insert` calls are expected to succeed usefully afterwards since the
    /// registry is empty and about to be dropped.
    pub async fn teardown(&self) {
        let timers: Vec<_> = {
            let mut timers = self.timers.lock();
            timers.drain().map(|(_, timer)| timer).collect()
        };
        for timer in timers {
            timer.stop().await;
        }
        tracing::info!("healthcheck registry torn down");
    }
}

impl<P, R, C> Default for Registry<P, R, C>
where
    P: ProbeRunner,
    R: Reporter,
    C: Clock,
{
    fn default() -> Self {
        Self::init()
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
