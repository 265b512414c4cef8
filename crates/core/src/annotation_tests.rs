// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn parses_cmd_shell() {
    let config = parse_annotation(
        r#"{"test":["CMD-SHELL","true"],"interval":1,"timeout":5,"start_period":0,"retries":3}"#,
    )
    .unwrap();
    assert_eq!(config.test, vec!["/bin/sh", "-c", "true"]);
    assert_eq!(config.interval_s, 1);
    assert_eq!(config.timeout_s, 5);
    assert_eq!(config.start_period_s, 0);
    assert_eq!(config.retries, 3);
    assert!(config.enabled);
}

#[test]
fn parses_cmd() {
    let config = parse_annotation(
        r#"{"test":["CMD","/usr/bin/curl","-f","http://localhost/health"],"interval":30,"timeout":5,"start_period":10,"retries":2}"#,
    )
    .unwrap();
    assert_eq!(config.test, vec!["/usr/bin/curl", "-f", "http://localhost/health"]);
}

#[test]
fn cmd_with_only_tag_is_rejected() {
    let err = parse_annotation(r#"{"test":["CMD"],"interval":1,"timeout":1,"start_period":0,"retries":0}"#).unwrap_err();
    assert!(matches!(err, AnnotationError::TestTooShort));
}

#[test]
fn unknown_tag_is_rejected() {
    let err = parse_annotation(r#"{"test":["NONE","x"],"interval":1,"timeout":1,"start_period":0,"retries":0}"#).unwrap_err();
    assert!(matches!(err, AnnotationError::UnsupportedTestTag(tag) if tag == "NONE"));
}

#[test]
fn shell_tag_with_wrong_arity_is_rejected() {
    let err = parse_annotation(
        r#"{"test":["CMD-SHELL","a","b"],"interval":1,"timeout":1,"start_period":0,"retries":0}"#,
    )
    .unwrap_err();
    assert!(matches!(err, AnnotationError::CmdShellWrongArity));
}

#[test]
fn shell_empty_string_is_rejected() {
    let err =
        parse_annotation(r#"{"test":["CMD-SHELL",""],"interval":1,"timeout":1,"start_period":0,"retries":0}"#)
            .unwrap_err();
    assert!(matches!(err, AnnotationError::CmdShellLength { len: 0 }));
}

#[test]
fn shell_string_at_max_length_is_accepted() {
    let command = "a".repeat(4096);
    let json = serde_json::json!({
        "test": ["CMD-SHELL", command],
        "interval": 1, "timeout": 1, "start_period": 0, "retries": 0,
    });
    assert!(parse_annotation(&json.to_string()).is_ok());
}

#[test]
fn shell_string_over_max_length_is_rejected() {
    let command = "a".repeat(4097);
    let json = serde_json::json!({
        "test": ["CMD-SHELL", command],
        "interval": 1, "timeout": 1, "start_period": 0, "retries": 0,
    });
    let err = parse_annotation(&json.to_string()).unwrap_err();
    assert!(matches!(err, AnnotationError::CmdShellLength { len: 4097 }));
}

#[test]
fn missing_required_numeric_field_is_rejected() {
    let err = parse_annotation(r#"{"test":["CMD-SHELL","true"],"interval":1,"timeout":1,"start_period":0}"#)
        .unwrap_err();
    assert!(matches!(err, AnnotationError::MissingField("retries")));
}

#[test]
fn non_integral_numeric_field_is_rejected() {
    let err = parse_annotation(
        r#"{"test":["CMD-SHELL","true"],"interval":1.5,"timeout":1,"start_period":0,"retries":0}"#,
    )
    .unwrap_err();
    assert!(matches!(err, AnnotationError::WrongType("interval")));
}

#[test]
fn negative_numeric_field_is_rejected() {
    let err = parse_annotation(
        r#"{"test":["CMD-SHELL","true"],"interval":-1,"timeout":1,"start_period":0,"retries":0}"#,
    )
    .unwrap_err();
    assert!(matches!(err, AnnotationError::WrongType("interval")));
}

#[test]
fn out_of_range_value_surfaces_as_config_error() {
    let err = parse_annotation(
        r#"{"test":["CMD-SHELL","true"],"interval":3601,"timeout":1,"start_period":0,"retries":0}"#,
    )
    .unwrap_err();
    assert!(matches!(err, AnnotationError::Config(ConfigError::OutOfRange { field: "interval", .. })));
}

#[test]
fn not_an_object_is_rejected() {
    let err = parse_annotation("[1,2,3]").unwrap_err();
    assert!(matches!(err, AnnotationError::NotAnObject));
}

#[test]
fn invalid_json_is_rejected() {
    let err = parse_annotation("not json").unwrap_err();
    assert!(matches!(err, AnnotationError::Json(_)));
}

#[test]
fn cmd_argument_must_be_string() {
    let err = parse_annotation(r#"{"test":["CMD","curl",1],"interval":1,"timeout":1,"start_period":0,"retries":0}"#)
        .unwrap_err();
    assert!(matches!(err, AnnotationError::CmdArgNotString));
}

#[test]
fn reparsing_canonical_serialization_is_idempotent() {
    let config = parse_annotation(
        r#"{"test":["CMD-SHELL","true"],"interval":2,"timeout":5,"start_period":4,"retries":3}"#,
    )
    .unwrap();
    let canonical = serde_json::to_string(&config).unwrap();
    let reparsed: Config = serde_json::from_str(&canonical).unwrap();
    assert_eq!(config, reparsed);
}
