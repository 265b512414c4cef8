// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The per-container timer and its status state machine.
//!
//! The state machine itself (§3/§4.4) is expressed as a handful of pure,
//! synchronously-testable functions over [`TimerState`] — [`begin_tick`],
//! [`grace_emission`], and [`apply_probe`] — so the scenario tests in §8 can
//! assert exact tick-by-tick transitions without touching a clock, a probe
//! runner, or the async worker loop at all. [`Timer`] wraps that pure core
//! with the tokio task that actually schedules ticks and runs probes.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use hce_adapters::{ProbeOutcome, ProbeRunner, Reporter};
use hce_core::{Clock, Config, ContainerId, Status, StatusUpdate};
use parking_lot::Mutex;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

use crate::error::TimerStartError;

/// Mutable per-tick state of a [`Timer`], guarded by a single lock.
///
/// Kept separate from [`Timer`] itself so the transition functions below can
/// be exercised directly in tests, with no `Timer`, no clock, and no probe
/// runner in the picture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerState {
    pub status: Status,
    pub consecutive_failures: u32,
    pub start_period_remaining_s: u32,
    pub last_check_time: i64,
    /// Tracks whether the single `Starting` emission for this run has
    /// already happened, independent of `status` itself (which is set to
    /// `Starting` by `start()`, before any tick has run and before that
    /// value has ever been reported to the parent engine).
    starting_emitted: bool,
}

impl TimerState {
    /// The pre-start state: never reported, matches `Status::None`.
    fn idle(now: i64) -> Self {
        TimerState {
            status: Status::None,
            consecutive_failures: 0,
            start_period_remaining_s: 0,
            last_check_time: now,
            starting_emitted: false,
        }
    }

    /// The state immediately after `start()`, per §4.4: `status = Starting`,
    /// failure count reset, grace clock initialized from `config`.
    pub fn started(config: &Config, now: i64) -> Self {
        TimerState {
            status: Status::Starting,
            consecutive_failures: 0,
            start_period_remaining_s: config.start_period_s,
            last_check_time: now,
            starting_emitted: false,
        }
    }
}

/// What a tick should do, decided by [`begin_tick`] before any probe runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickAction {
    /// Still within the startup grace period; no probe this tick.
    Grace,
    /// Grace has elapsed (possibly just this tick); run the probe.
    Probe,
}

/// Decrements the grace counter and decides whether to probe this tick.
///
/// Per §4.4 step 2: the counter is decremented by `interval_s`, floored at
/// zero, every tick regardless of outcome. Returns [`TickAction::Probe`] as
/// soon as the counter reaches zero — including the tick on which it first
/// reaches zero ("transition out of grace").
pub fn begin_tick(state: &mut TimerState, config: &Config) -> TickAction {
    state.start_period_remaining_s = state.start_period_remaining_s.saturating_sub(config.interval_s);
    if state.start_period_remaining_s > 0 {
        TickAction::Grace
    } else {
        TickAction::Probe
    }
}

/// Called only after [`begin_tick`] returns [`TickAction::Grace`].
///
/// Returns `Some(Status::Starting)` exactly once per timer run — on the
/// first grace tick — and `None` on every grace tick after that, per §4.4's
/// "emitting a status update only on transition into Starting."
pub fn grace_emission(state: &mut TimerState) -> Option<Status> {
    if state.starting_emitted {
        return None;
    }
    state.starting_emitted = true;
    state.status = Status::Starting;
    Some(Status::Starting)
}

/// Called only after [`begin_tick`] returns [`TickAction::Probe`].
///
/// `remaining_before` is the grace counter's value *before* `begin_tick`'s
/// decrement, captured by the caller; it distinguishes the single tick on
/// which grace elapses (exempt from retry counting, per spec §8 scenario 5)
/// from every probe tick after it (fully outside grace).
///
/// Returns `Some((status, exit_code))` when a status update should be
/// emitted this tick, `None` when the tick is silent to the parent engine.
pub fn apply_probe(
    state: &mut TimerState,
    config: &Config,
    remaining_before: u32,
    outcome: &ProbeOutcome,
    now: i64,
) -> Option<(Status, i64)> {
    state.last_check_time = now;

    if !outcome.ok {
        // The probe itself could not be run or its exit status could not be
        // determined. Forced Unhealthy regardless of grace or retries: a
        // spawn failure is never silently swallowed by the retry threshold.
        state.consecutive_failures += 1;
        state.status = Status::Unhealthy;
        return Some((Status::Unhealthy, outcome.exit_code));
    }

    if outcome.exit_code == 0 {
        state.consecutive_failures = 0;
        state.status = Status::Healthy;
        // Keep-alive: emitted every tick regardless of transition.
        return Some((Status::Healthy, 0));
    }

    state.consecutive_failures += 1;
    let just_exited_grace = remaining_before > 0;
    if just_exited_grace {
        // The tick on which the grace counter first reached zero: this
        // failure doesn't count against the retry threshold.
        return None;
    }

    if state.consecutive_failures > config.retries {
        state.status = Status::Unhealthy;
        return Some((Status::Unhealthy, outcome.exit_code));
    }
    None
}

/// A best-effort, cloned snapshot of a [`Timer`]'s administrative fields,
/// for read-only inspection via `Registry::lookup` (§4.5, §AMBIENT).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerSnapshot {
    pub container_id: ContainerId,
    pub status: Status,
    pub consecutive_failures: u32,
    pub last_check_time: i64,
}

/// A per-container periodic healthcheck timer.
///
/// Always held behind an `Arc` so its worker task can hold only a [`Weak`]
/// reference back to it (§9 design note: "represent as an arena-index or a
/// weak reference whose validity the Registry guarantees by stop-then-join
/// before drop"). The worker never keeps the `Timer` alive by itself.
pub struct Timer<P, R, C> {
    container_id: ContainerId,
    config: Config,
    probe: Arc<P>,
    reporter: Arc<R>,
    clock: Arc<C>,
    state: Mutex<TimerState>,
    active: AtomicBool,
    notify: Notify,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl<P, R, C> Timer<P, R, C>
where
    P: ProbeRunner,
    R: Reporter,
    C: Clock,
{
    /// Constructs a new, unstarted timer. Does not register it anywhere.
    pub fn new(container_id: ContainerId, config: Config, probe: Arc<P>, reporter: Arc<R>, clock: Arc<C>) -> Arc<Self> {
        let now = clock.now_unix();
        Arc::new(Timer {
            container_id,
            config,
            probe,
            reporter,
            clock,
            state: Mutex::new(TimerState::idle(now)),
            active: AtomicBool::new(false),
            notify: Notify::new(),
            join: Mutex::new(None),
        })
    }

    pub fn container_id(&self) -> &ContainerId {
        &self.container_id
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// A best-effort snapshot of the timer's current administrative fields.
    pub fn snapshot(&self) -> TimerSnapshot {
        let state = self.state.lock();
        TimerSnapshot {
            container_id: self.container_id.clone(),
            status: state.status,
            consecutive_failures: state.consecutive_failures,
            last_check_time: state.last_check_time,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Starts the timer's worker task.
    ///
    /// Per §4.4: requires `enabled && !test.is_empty() && !active`. Sets
    /// `status = Starting` and spawns the worker; emits no status update
    /// itself — the first `Starting` emission happens from the first tick
    /// still inside grace (or, if `start_period_s == 0`, never at all).
    pub fn start(self: &Arc<Self>) -> Result<(), TimerStartError> {
        if !self.config.enabled {
            return Err(TimerStartError::Disabled);
        }
        if self.config.test.is_empty() {
            return Err(TimerStartError::EmptyTest);
        }
        if self.active.swap(true, Ordering::SeqCst) {
            return Err(TimerStartError::AlreadyActive);
        }

        let now = self.clock.now_unix();
        *self.state.lock() = TimerState::started(&self.config, now);

        let weak = Arc::downgrade(self);
        let handle = tokio::spawn(run_worker(weak));
        *self.join.lock() = Some(handle);

        tracing::info!(container_id = %self.container_id, interval_s = self.config.interval_s, "healthcheck timer started");
        Ok(())
    }

    /// Stops the timer: signals the worker, waits for it to exit, and
    /// resets `status` to `None`. Idempotent.
    pub async fn stop(&self) {
        self.active.store(false, Ordering::SeqCst);
        self.notify.notify_waiters();

        let handle = self.join.lock().take();
        if let Some(handle) = handle {
            if let Err(err) = handle.await {
                tracing::warn!(container_id = %self.container_id, error = %err, "healthcheck worker task panicked");
            }
        }

        self.state.lock().status = Status::None;
        tracing::info!(container_id = %self.container_id, "healthcheck timer stopped");
    }

    /// Runs exactly one tick: grace bookkeeping or a probe, and whatever
    /// emission the state machine decides on.
    async fn run_tick(&self) {
        let remaining_before;
        let action;
        {
            let mut state = self.state.lock();
            remaining_before = state.start_period_remaining_s;
            action = begin_tick(&mut state, &self.config);
        }

        match action {
            TickAction::Grace => {
                let now = self.clock.now_unix();
                let emit = {
                    let mut state = self.state.lock();
                    grace_emission(&mut state)
                };
                match emit {
                    Some(status) => {
                        tracing::info!(container_id = %self.container_id, %status, "healthcheck entered startup grace period");
                        self.emit(status, 0, now).await;
                    }
                    None => {
                        tracing::debug!(container_id = %self.container_id, "healthcheck tick within startup grace period");
                    }
                }
            }
            TickAction::Probe => {
                let outcome = self.probe.run(self.container_id.as_str(), &self.config).await;
                if !outcome.stderr_snippet.is_empty() {
                    tracing::debug!(container_id = %self.container_id, stderr = %outcome.stderr_snippet, "probe stderr output");
                }
                let now = self.clock.now_unix();
                let (emit, consecutive_failures) = {
                    let mut state = self.state.lock();
                    let emit = apply_probe(&mut state, &self.config, remaining_before, &outcome, now);
                    (emit, state.consecutive_failures)
                };
                match emit {
                    Some((status, exit_code)) => {
                        tracing::info!(container_id = %self.container_id, %status, exit_code, "healthcheck status transition");
                        self.emit(status, exit_code, now).await;
                    }
                    None => {
                        tracing::debug!(
                            container_id = %self.container_id,
                            exit_code = outcome.exit_code,
                            consecutive_failures,
                            "healthcheck tick produced no status update"
                        );
                    }
                }
            }
        }
    }

    async fn emit(&self, status: Status, exit_code: i64, now: i64) {
        let update = StatusUpdate::new(self.container_id.as_str(), status, exit_code, now);
        if let Err(err) = self.reporter.send(update).await {
            tracing::warn!(container_id = %self.container_id, error = %err, "failed to report healthcheck status update");
        }
    }
}

/// The worker task body: sleeps one `interval_s`, ticks, and repeats until
/// `stop()` clears `active` or the `Timer` itself is dropped.
async fn run_worker<P, R, C>(weak: Weak<Timer<P, R, C>>)
where
    P: ProbeRunner,
    R: Reporter,
    C: Clock,
{
    loop {
        let interval_s = {
            let Some(timer) = weak.upgrade() else { return };
            if !timer.is_active() {
                return;
            }
            timer.config.interval_s
        };

        if !sleep_interruptible(&weak, interval_s).await {
            return;
        }

        let Some(timer) = weak.upgrade() else { return };
        if !timer.is_active() {
            return;
        }
        timer.run_tick().await;
    }
}

/// Sleeps up to `total_s` seconds in <=1s chunks, checking `active` between
/// chunks and waking immediately on `stop()`'s notification, so stop is
/// observed within ~1s regardless of `interval_s` (§5).
///
/// Returns `false` if the sleep was cut short by a stop or a dropped timer.
async fn sleep_interruptible<P, R, C>(weak: &Weak<Timer<P, R, C>>, total_s: u32) -> bool
where
    P: ProbeRunner,
    R: Reporter,
    C: Clock,
{
    const CHUNK: Duration = Duration::from_secs(1);
    let mut remaining = Duration::from_secs(u64::from(total_s));

    while remaining > Duration::ZERO {
        let Some(timer) = weak.upgrade() else { return false };
        if !timer.is_active() {
            return false;
        }
        let chunk = remaining.min(CHUNK);

        tokio::select! {
            _ = tokio::time::sleep(chunk) => {}
            _ = timer.notify.notified() => return false,
        }
        remaining = remaining.saturating_sub(chunk);
    }

    match weak.upgrade() {
        Some(timer) => timer.is_active(),
        None => false,
    }
}

#[cfg(test)]
#[path = "timer_tests.rs"]
mod tests;
