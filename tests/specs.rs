// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end checks driving the monitor/engine/adapters/core stack
//! together, exercising the six literal scenarios and the invariant,
//! round-trip, and boundary properties documented alongside them.

use std::sync::Arc;

use hce_adapters::{FakeProbeRunner, FakeReporter, ProbeOutcome};
use hce_core::{parse_annotation, ContainerId, FakeClock, Status, StatusUpdate};
use hce_engine::Timer;
use hce_monitor::Supervisor;

fn timer(
    cfg: hce_core::Config,
    clock: FakeClock,
    probe: FakeProbeRunner,
    reporter: FakeReporter,
) -> Arc<Timer<FakeProbeRunner, FakeReporter, FakeClock>> {
    Timer::new(ContainerId::new("scenario"), cfg, Arc::new(probe), Arc::new(reporter), Arc::new(clock))
}

async fn drive(timer: &Arc<Timer<FakeProbeRunner, FakeReporter, FakeClock>>, clock: &FakeClock, ticks: u32, interval_s: u32) {
    for _ in 0..ticks {
        clock.advance(i64::from(interval_s));
        tokio::time::advance(std::time::Duration::from_secs(u64::from(interval_s))).await;
        tokio::task::yield_now().await;
    }
}

#[tokio::test(start_paused = true)]
async fn scenario_1_always_healthy_no_grace() {
    let annotation = r#"{"test":["CMD-SHELL","true"],"interval":1,"timeout":5,"start_period":0,"retries":3}"#;
    let cfg = parse_annotation(annotation).unwrap();
    let clock = FakeClock::new(0);
    let probe = FakeProbeRunner::with_outcomes([ProbeOutcome::success(0); 3]);
    let reporter = FakeReporter::new();
    let t = timer(cfg, clock.clone(), probe, reporter.clone());

    t.start().unwrap();
    drive(&t, &clock, 3, 1).await;
    t.stop().await;

    let sent = reporter.sent();
    assert_eq!(sent.len(), 3);
    for update in &sent {
        assert_eq!(update.status, Status::Healthy);
        assert_eq!(update.exit_code, 0);
    }
}

#[tokio::test(start_paused = true)]
async fn scenario_2_startup_then_healthy() {
    let annotation = r#"{"test":["CMD-SHELL","true"],"interval":2,"timeout":5,"start_period":4,"retries":3}"#;
    let cfg = parse_annotation(annotation).unwrap();
    let clock = FakeClock::new(0);
    let probe = FakeProbeRunner::with_outcomes([ProbeOutcome::success(0); 2]);
    let reporter = FakeReporter::new();
    let t = timer(cfg, clock.clone(), probe, reporter.clone());

    t.start().unwrap();
    drive(&t, &clock, 3, 2).await;
    t.stop().await;

    let sent = reporter.sent();
    assert_eq!(sent.len(), 3);
    assert_eq!(sent[0].status, Status::Starting);
    assert_eq!(sent[1].status, Status::Healthy);
    assert_eq!(sent[2].status, Status::Healthy);
}

#[tokio::test(start_paused = true)]
async fn scenario_3_retry_threshold() {
    let annotation = r#"{"test":["CMD-SHELL","false"],"interval":1,"timeout":5,"start_period":0,"retries":2}"#;
    let cfg = parse_annotation(annotation).unwrap();
    let clock = FakeClock::new(0);
    let probe = FakeProbeRunner::with_outcomes([ProbeOutcome::success(1); 4]);
    let reporter = FakeReporter::new();
    let t = timer(cfg, clock.clone(), probe, reporter.clone());

    t.start().unwrap();
    drive(&t, &clock, 4, 1).await;
    t.stop().await;

    let sent = reporter.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].status, Status::Unhealthy);
    assert_eq!(sent[0].exit_code, 1);
    assert_eq!(sent[1].status, Status::Unhealthy);
}

#[tokio::test(start_paused = true)]
async fn scenario_4_recovery() {
    let annotation = r#"{"test":["CMD-SHELL","sh"],"interval":1,"timeout":5,"start_period":0,"retries":2}"#;
    let cfg = parse_annotation(annotation).unwrap();
    let clock = FakeClock::new(0);
    let probe = FakeProbeRunner::with_outcomes([
        ProbeOutcome::success(1),
        ProbeOutcome::success(1),
        ProbeOutcome::success(0),
        ProbeOutcome::success(0),
    ]);
    let reporter = FakeReporter::new();
    let t = timer(cfg, clock.clone(), probe, reporter.clone());

    t.start().unwrap();
    drive(&t, &clock, 4, 1).await;
    t.stop().await;

    let sent = reporter.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].status, Status::Healthy);
    assert_eq!(sent[0].exit_code, 0);
    assert_eq!(sent[1].status, Status::Healthy);
}

#[tokio::test(start_paused = true)]
async fn scenario_5_failure_during_grace_is_not_counted() {
    let annotation = r#"{"test":["CMD-SHELL","false"],"interval":2,"timeout":5,"start_period":4,"retries":1}"#;
    let cfg = parse_annotation(annotation).unwrap();
    let clock = FakeClock::new(0);
    let probe = FakeProbeRunner::with_outcomes([ProbeOutcome::success(1); 3]);
    let reporter = FakeReporter::new();
    let t = timer(cfg, clock.clone(), probe, reporter.clone());

    t.start().unwrap();
    drive(&t, &clock, 3, 2).await;
    t.stop().await;

    let sent = reporter.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].status, Status::Starting);
    assert_eq!(sent[1].status, Status::Unhealthy);
    assert_eq!(sent[1].exit_code, 1);
}

#[tokio::test]
async fn scenario_6_unknown_command_tag_rejected_before_any_registration() {
    let annotation = r#"{"test":["SHELL","echo"],"interval":1,"timeout":5,"start_period":0,"retries":3}"#;
    let err = parse_annotation(annotation).unwrap_err();
    assert!(matches!(err, hce_core::AnnotationError::UnsupportedTestTag(tag) if tag == "SHELL"));

    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("config.json"),
        format!(
            r#"{{"annotations":{{"io.podman.healthcheck":{escaped}}}}}"#,
            escaped = serde_json::to_string(annotation).unwrap()
        ),
    )
    .unwrap();

    let supervisor: Supervisor<FakeProbeRunner, FakeReporter, FakeClock> = Supervisor::init(
        Arc::new(FakeProbeRunner::new()),
        Arc::new(FakeReporter::new()),
        Arc::new(FakeClock::new(0)),
    );
    supervisor.register_from_bundle("c1", dir.path()).unwrap();
    assert!(supervisor.lookup("c1").is_none());
}

#[test]
fn invariant_start_period_zero_never_emits_starting() {
    let annotation = r#"{"test":["CMD-SHELL","true"],"interval":1,"timeout":5,"start_period":0,"retries":3}"#;
    let cfg = parse_annotation(annotation).unwrap();
    assert_eq!(cfg.start_period_s, 0);

    let mut state = hce_engine::TimerState::started(&cfg, 0);
    for outcome in [ProbeOutcome::success(0), ProbeOutcome::success(1)] {
        let remaining_before = state.start_period_remaining_s;
        match hce_engine::begin_tick(&mut state, &cfg) {
            hce_engine::TickAction::Grace => panic!("start_period=0 must never enter grace"),
            hce_engine::TickAction::Probe => {
                hce_engine::apply_probe(&mut state, &cfg, remaining_before, &outcome, 0);
            }
        }
    }
}

#[test]
fn invariant_status_update_json_has_fields_in_declared_order() {
    let update = StatusUpdate::new("c1", Status::Healthy, 0, 1_700_000_000);
    let json = String::from_utf8(update.to_json().unwrap()).unwrap();
    similar_asserts::assert_eq!(
        json,
        r#"{"type":"healthcheck_status","container_id":"c1","status":"healthy","exit_code":0,"timestamp":1700000000}"#
    );
}

#[test]
fn round_trip_reparsing_canonical_annotation_is_idempotent() {
    let annotation = r#"{"test":["CMD-SHELL","true"],"interval":1,"timeout":5,"start_period":0,"retries":3}"#;
    let cfg = parse_annotation(annotation).unwrap();
    let canonical = serde_json::json!({
        "test": ["CMD", cfg.test[0], cfg.test[1], cfg.test[2]],
        "interval": cfg.interval_s,
        "timeout": cfg.timeout_s,
        "start_period": cfg.start_period_s,
        "retries": cfg.retries,
    })
    .to_string();
    let reparsed = parse_annotation(&canonical).unwrap();
    assert_eq!(reparsed.test, cfg.test);
    assert_eq!(reparsed.interval_s, cfg.interval_s);
}

#[test]
fn boundary_interval_values() {
    let make = |interval: u32| {
        serde_json::json!({
            "test": ["CMD-SHELL", "true"],
            "interval": interval,
            "timeout": 5,
            "start_period": 0,
            "retries": 3,
        })
        .to_string()
    };
    assert!(parse_annotation(&make(1)).is_ok());
    assert!(parse_annotation(&make(3600)).is_ok());
    assert!(parse_annotation(&make(0)).is_err());
    assert!(parse_annotation(&make(3601)).is_err());
}

#[test]
fn boundary_cmd_shell_length() {
    let make = |len: usize| {
        serde_json::json!({
            "test": ["CMD-SHELL", "x".repeat(len)],
            "interval": 1,
            "timeout": 5,
            "start_period": 0,
            "retries": 3,
        })
        .to_string()
    };
    assert!(parse_annotation(&make(0)).is_err());
    assert!(parse_annotation(&make(4096)).is_ok());
    assert!(parse_annotation(&make(4097)).is_err());
}

#[test]
fn boundary_cmd_with_only_tag_is_rejected() {
    let annotation = r#"{"test":["CMD"],"interval":1,"timeout":5,"start_period":0,"retries":3}"#;
    assert!(parse_annotation(annotation).is_err());
}

#[tokio::test]
async fn registry_rejects_duplicate_container_id_and_teardown_stops_every_timer() {
    let registry: hce_engine::Registry<FakeProbeRunner, FakeReporter, FakeClock> = hce_engine::Registry::init();
    let cfg = parse_annotation(r#"{"test":["CMD-SHELL","true"],"interval":1,"timeout":5,"start_period":0,"retries":3}"#).unwrap();
    let a = timer(cfg.clone(), FakeClock::new(0), FakeProbeRunner::new(), FakeReporter::new());
    let b = timer(cfg, FakeClock::new(0), FakeProbeRunner::new(), FakeReporter::new());

    a.start().unwrap();
    registry.insert(a.clone()).unwrap();
    let err = registry.insert(b).unwrap_err();
    assert!(matches!(err, hce_engine::RegistryError::DuplicateContainer(id) if id == "scenario"));

    registry.teardown().await;
    assert!(!a.is_active());
    assert!(registry.is_empty());
}
