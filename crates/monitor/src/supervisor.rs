// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wires bundle discovery, the timer registry, and the probe/report/clock
//! adapters into the single entry point a container runtime calls into:
//! "here is a new container's OCI bundle, start its healthcheck if it has
//! one."

use std::path::Path;
use std::sync::Arc;

use hce_adapters::{DiscoveryError, ProbeRunner, Reporter};
use hce_core::{Clock, ContainerId};
use hce_engine::{Registry, Timer};

use crate::error::MonitorError;

/// Owns the timer registry and the shared adapters every `Timer` is built
/// from, for the lifetime of the container runtime process.
///
/// Generic over the same three seams as [`Timer`] so tests can substitute
/// `hce_adapters::FakeProbeRunner` / `FakeReporter` / `hce_core::FakeClock`
/// without touching this type.
pub struct Supervisor<P, R, C> {
    registry: Registry<P, R, C>,
    probe: Arc<P>,
    reporter: Arc<R>,
    clock: Arc<C>,
}

impl<P, R, C> Supervisor<P, R, C>
where
    P: ProbeRunner,
    R: Reporter,
    C: Clock,
{
    /// Constructs an empty supervisor over the given adapters. Corresponds
    /// to §4.7's `init()`.
    pub fn init(probe: Arc<P>, reporter: Arc<R>, clock: Arc<C>) -> Self {
        Supervisor {
            registry: Registry::init(),
            probe,
            reporter,
            clock,
        }
    }

    /// Discovers and starts a healthcheck for the container whose OCI bundle
    /// lives at `bundle_path`, registering it under `container_id`.
    ///
    /// Per §7's propagation policy: a missing `config.json` or missing
    /// annotation ([`DiscoveryError::BundleConfigMissing`] /
    /// [`DiscoveryError::AnnotationMissing`]) is not an error at this level —
    /// the container simply runs without a healthcheck, logged at `info`. An
    /// invalid annotation is logged at `warn` and likewise non-fatal. Only a
    /// [`hce_engine::RegistryError`] (duplicate container id) is surfaced.
    pub fn register_from_bundle(
        &self,
        container_id: impl Into<String>,
        bundle_path: &Path,
    ) -> Result<(), MonitorError> {
        let container_id = container_id.into();
        let config = match hce_adapters::discover_from_bundle(bundle_path) {
            Ok(config) => config,
            Err(DiscoveryError::BundleConfigMissing(_) | DiscoveryError::AnnotationMissing) => {
                tracing::info!(container_id, "no healthcheck declared for container");
                return Ok(());
            }
            Err(err) => {
                tracing::warn!(container_id, error = %err, "invalid healthcheck configuration; container runs without healthchecks");
                return Ok(());
            }
        };

        if !config.enabled {
            tracing::info!(container_id, "healthcheck declared but disabled");
            return Ok(());
        }

        let timer = Timer::new(
            ContainerId::new(container_id.clone()),
            config,
            Arc::clone(&self.probe),
            Arc::clone(&self.reporter),
            Arc::clone(&self.clock),
        );

        self.registry.insert(Arc::clone(&timer))?;

        if let Err(err) = timer.start() {
            // Validated by discover_from_bundle/Config::validate already, so
            // this should be unreachable in practice; treated as non-fatal
            // and logged rather than panicking on an adapter-layer surprise.
            tracing::warn!(container_id, error = %err, "healthcheck timer failed to start");
        }

        Ok(())
    }

    /// Stops the healthcheck for a single container, if one is registered.
    pub async fn unregister(&self, container_id: &str) {
        if let Some(timer) = self.registry.remove(container_id) {
            timer.stop().await;
        }
    }

    /// A best-effort administrative snapshot of one container's healthcheck.
    pub fn lookup(&self, container_id: &str) -> Option<hce_engine::TimerSnapshot> {
        self.registry.lookup(container_id)
    }

    /// Stops every registered timer and clears the registry. Corresponds to
    /// §4.7's `teardown()`; called exactly once at monitor exit.
    pub async fn teardown(&self) {
        self.registry.teardown().await;
    }
}

#[cfg(test)]
#[path = "supervisor_tests.rs"]
mod tests;
