// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn success_is_ok_with_empty_stderr() {
    let outcome = ProbeOutcome::success(0);
    assert!(outcome.ok);
    assert_eq!(outcome.exit_code, 0);
    assert!(outcome.stderr_snippet.is_empty());
}

#[test]
fn spawn_failed_is_not_ok_with_exit_code_negative_one() {
    let outcome = ProbeOutcome::spawn_failed();
    assert!(!outcome.ok);
    assert_eq!(outcome.exit_code, -1);
}
