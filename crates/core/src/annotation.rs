// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Parses the `io.podman.healthcheck` OCI annotation into a validated [`Config`].
//!
//! This module is pure: it takes the annotation's JSON string value and
//! returns a [`Config`] or an [`AnnotationError`]. Locating the annotation
//! inside `config.json` on disk is a bundle-discovery concern that lives in
//! the adapters crate, which calls through to [`parse_annotation`] once it
//! has extracted the string.

use serde_json::Value;
use thiserror::Error;

use crate::config::{Config, ConfigError, CMD_SHELL_LEN_RANGE};

/// Errors from parsing the annotation JSON into a [`Config`].
#[derive(Debug, Error)]
pub enum AnnotationError {
    #[error("annotation is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("annotation JSON must be an object")]
    NotAnObject,
    #[error("missing required field {0:?}")]
    MissingField(&'static str),
    #[error("field {0:?} has the wrong type")]
    WrongType(&'static str),
    #[error("test must be a JSON array of length >= 2")]
    TestTooShort,
    #[error("test[0] must be \"CMD\" or \"CMD-SHELL\", got {0:?}")]
    UnsupportedTestTag(String),
    #[error("CMD-SHELL test must have exactly 2 elements")]
    CmdShellWrongArity,
    #[error("CMD-SHELL command string must be non-empty and at most {max} bytes, got {len}", max = CMD_SHELL_LEN_RANGE.1)]
    CmdShellLength { len: usize },
    #[error("CMD test arguments must all be strings")]
    CmdArgNotString,
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Parses the decoded JSON value of the `io.podman.healthcheck` annotation
/// into a validated, enabled [`Config`].
///
/// See module docs and spec §4.2 for the exact field rules. On success,
/// `enabled` is always `true`. On any failure, no partially-built `Config`
/// is returned to the caller.
pub fn parse_annotation(json: &str) -> Result<Config, AnnotationError> {
    let value: Value = serde_json::from_str(json)?;
    let obj = value.as_object().ok_or(AnnotationError::NotAnObject)?;

    let test = parse_test(obj.get("test").ok_or(AnnotationError::MissingField("test"))?)?;
    let interval_s = require_u32(obj, "interval")?;
    let timeout_s = require_u32(obj, "timeout")?;
    let start_period_s = require_u32(obj, "start_period")?;
    let retries = require_u32(obj, "retries")?;

    let config = Config {
        test,
        interval_s,
        timeout_s,
        start_period_s,
        retries,
        enabled: true,
    };
    config.validate()?;
    Ok(config)
}

fn parse_test(value: &Value) -> Result<Vec<String>, AnnotationError> {
    let items = value.as_array().ok_or(AnnotationError::WrongType("test"))?;
    if items.len() < 2 {
        return Err(AnnotationError::TestTooShort);
    }
    let tag = items[0].as_str().ok_or(AnnotationError::WrongType("test[0]"))?;

    match tag {
        "CMD" => items[1..]
            .iter()
            .map(|v| v.as_str().map(str::to_string).ok_or(AnnotationError::CmdArgNotString))
            .collect(),
        "CMD-SHELL" => {
            if items.len() != 2 {
                return Err(AnnotationError::CmdShellWrongArity);
            }
            let command = items[1].as_str().ok_or(AnnotationError::WrongType("test[1]"))?;
            let (min, max) = CMD_SHELL_LEN_RANGE;
            if command.len() < min || command.len() > max {
                return Err(AnnotationError::CmdShellLength { len: command.len() });
            }
            Ok(vec!["/bin/sh".to_string(), "-c".to_string(), command.to_string()])
        }
        other => Err(AnnotationError::UnsupportedTestTag(other.to_string())),
    }
}

fn require_u32(obj: &serde_json::Map<String, Value>, field: &'static str) -> Result<u32, AnnotationError> {
    let value = obj.get(field).ok_or(AnnotationError::MissingField(field))?;
    let as_u64 = value.as_u64().ok_or(AnnotationError::WrongType(field))?;
    u32::try_from(as_u64).map_err(|_| AnnotationError::WrongType(field))
}

#[cfg(test)]
#[path = "annotation_tests.rs"]
mod tests;
