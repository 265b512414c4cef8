// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire-format status-update record sent back to the parent engine.

use crate::status::Status;
use serde::Serialize;

/// `{"type":"healthcheck_status","container_id":...,"status":...,"exit_code":...,"timestamp":...}`
///
/// Field order is part of the wire contract and is preserved by declaration
/// order: `serde_json` serializes struct fields in the order they are
/// declared, so this struct must never be reordered.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StatusUpdate {
    #[serde(rename = "type")]
    pub kind: StatusUpdateKind,
    pub container_id: String,
    pub status: Status,
    pub exit_code: i64,
    pub timestamp: i64,
}

/// Tag-only marker serialized as the literal string `"healthcheck_status"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusUpdateKind;

impl Serialize for StatusUpdateKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str("healthcheck_status")
    }
}

impl StatusUpdate {
    pub fn new(container_id: impl Into<String>, status: Status, exit_code: i64, timestamp: i64) -> Self {
        StatusUpdate {
            kind: StatusUpdateKind,
            container_id: container_id.into(),
            status,
            exit_code,
            timestamp,
        }
    }

    /// Serializes to the exact-field-order wire payload described in §6.
    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

#[cfg(test)]
#[path = "status_update_tests.rs"]
mod tests;
