// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reads an OCI bundle's `config.json` and locates its healthcheck annotation.
//!
//! The pure JSON-to-`Config` parsing lives in `hce_core::annotation`; this
//! module is the I/O-facing wrapper that finds the annotation string in the
//! first place, per spec §4.2's `discover_from_bundle` helper.

use std::path::Path;

use hce_core::{AnnotationError, Config};
use thiserror::Error;

/// Errors from discovering a healthcheck configuration in an OCI bundle.
///
/// Distinct from [`AnnotationError`] so callers can tell "no healthcheck
/// declared" (not an error at the monitor level) apart from "healthcheck
/// declared but invalid" (logged, healthcheck disabled for this container).
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("bundle has no config.json at {0}")]
    BundleConfigMissing(std::path::PathBuf),
    #[error("reading {0}: {1}")]
    Io(std::path::PathBuf, #[source] std::io::Error),
    #[error("config.json is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("config.json has no annotations.{key} entry", key = ANNOTATION_KEY)]
    AnnotationMissing,
    #[error("config.json's annotations.{key} entry is not a string", key = ANNOTATION_KEY)]
    AnnotationNotString,
    #[error("healthcheck annotation is invalid: {0}")]
    Invalid(#[from] AnnotationError),
}

/// The OCI annotation key carrying the healthcheck JSON blob.
pub const ANNOTATION_KEY: &str = "io.podman.healthcheck";

/// Reads `<bundle_path>/config.json`, locates `annotations."io.podman.healthcheck"`,
/// and parses it into a validated [`Config`].
pub fn discover_from_bundle(bundle_path: &Path) -> Result<Config, DiscoveryError> {
    let config_path = bundle_path.join("config.json");
    let contents = std::fs::read_to_string(&config_path).map_err(|err| {
        if err.kind() == std::io::ErrorKind::NotFound {
            DiscoveryError::BundleConfigMissing(config_path.clone())
        } else {
            DiscoveryError::Io(config_path.clone(), err)
        }
    })?;

    let root: serde_json::Value = serde_json::from_str(&contents)?;
    let annotation = root
        .get("annotations")
        .and_then(|annotations| annotations.get(ANNOTATION_KEY));

    match annotation {
        None => Err(DiscoveryError::AnnotationMissing),
        Some(serde_json::Value::String(json)) => {
            hce_core::parse_annotation(json).map_err(DiscoveryError::Invalid)
        }
        Some(_) => Err(DiscoveryError::AnnotationNotString),
    }
}

#[cfg(test)]
#[path = "bundle_tests.rs"]
mod tests;
