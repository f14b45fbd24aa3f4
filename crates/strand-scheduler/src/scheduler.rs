//! Fixed-step scheduler — background thread, pause gate, overrun handling.
//!
//! The loop, per cycle:
//! 1. **Gate** — stop if the running flag dropped; idle while paused
//!    unless a single step was requested
//! 2. **Measure** — wall-clock delta since the previous cycle, clamped
//! 3. **Broadcast** — `sub_step_count` rounds of `on_tick(delta / sub_steps)`
//! 4. **Sleep** — the rest of the frame, or count an overrun and move on
//!
//! Overruns are never caught up: the next cycle measures from where the
//! previous one actually started, and the clamp bounds the step.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use strand_telemetry::{EventKind, EventSender, SimulationEvent};
use strand_types::{StrandError, StrandResult, SubscriberId};

use crate::config::SchedulerConfig;
use crate::subscriber::TickSubscriber;
use crate::timing::{clamp_frame_delta, remaining_sleep, sub_step_dt};

/// How often a paused or delayed loop re-checks its flags.
const GATE_POLL: Duration = Duration::from_millis(1);

/// Scheduler lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchedulerState {
    Idle,
    Running,
    Stopped,
}

impl SchedulerState {
    pub fn as_str(self) -> &'static str {
        match self {
            SchedulerState::Idle => "idle",
            SchedulerState::Running => "running",
            SchedulerState::Stopped => "stopped",
        }
    }
}

type SubscriberList = Vec<(SubscriberId, Box<dyn TickSubscriber>)>;

/// State shared between the scheduler and its thread.
struct Shared {
    subscribers: Mutex<SubscriberList>,
    running: AtomicBool,
    paused: AtomicBool,
    step_requests: AtomicU32,
    cycles: AtomicU64,
    ticks: AtomicU64,
    overruns: AtomicU64,
}

impl Shared {
    /// Broadcasts one sub-step to every subscriber.
    fn broadcast(&self, dt: f32) {
        let mut subscribers = self.subscribers.lock();
        for (_, subscriber) in subscribers.iter_mut() {
            subscriber.on_tick(dt);
        }
        self.ticks.fetch_add(1, Ordering::Relaxed);
    }

    /// One full cycle over `frame_delta`.
    fn run_cycle(&self, frame_delta: Duration, sub_steps: u32) {
        let dt = sub_step_dt(frame_delta, sub_steps);
        for _ in 0..sub_steps.max(1) {
            self.broadcast(dt);
        }
        self.cycles.fetch_add(1, Ordering::Relaxed);
    }

    /// Consumes one pending single-step request, if any.
    fn take_step_request(&self) -> bool {
        self.step_requests
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1))
            .is_ok()
    }
}

/// Background fixed-step scheduler.
///
/// ```text
/// let mut scheduler = FixedStepScheduler::new(SchedulerConfig::default())?;
/// scheduler.register(Box::new(shared_cable));
/// scheduler.start()?;
/// ...
/// scheduler.stop()?;
/// ```
pub struct FixedStepScheduler {
    config: SchedulerConfig,
    shared: Arc<Shared>,
    state: SchedulerState,
    thread: Option<JoinHandle<()>>,
    events: Option<EventSender>,
    next_id: u64,
}

impl FixedStepScheduler {
    /// Creates an idle scheduler. Invalid configuration is rejected here.
    pub fn new(config: SchedulerConfig) -> StrandResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            shared: Arc::new(Shared {
                subscribers: Mutex::new(Vec::new()),
                running: AtomicBool::new(false),
                paused: AtomicBool::new(false),
                step_requests: AtomicU32::new(0),
                cycles: AtomicU64::new(0),
                ticks: AtomicU64::new(0),
                overruns: AtomicU64::new(0),
            }),
            state: SchedulerState::Idle,
            thread: None,
            events: None,
            next_id: 0,
        })
    }

    /// Emits lifecycle and overrun events through `sender`.
    pub fn with_events(mut self, sender: EventSender) -> Self {
        self.events = Some(sender);
        self
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Adds a subscriber. Safe while running; it joins at the next sub-step.
    pub fn register(&mut self, subscriber: Box<dyn TickSubscriber>) -> SubscriberId {
        let id = SubscriberId(self.next_id);
        self.next_id += 1;
        tracing::debug!(id = id.0, name = subscriber.name(), "tick subscriber registered");
        self.shared.subscribers.lock().push((id, subscriber));
        id
    }

    /// Removes and returns a subscriber. `None` if the id is unknown.
    pub fn unregister(&mut self, id: SubscriberId) -> Option<Box<dyn TickSubscriber>> {
        let mut subscribers = self.shared.subscribers.lock();
        let pos = subscribers.iter().position(|(sid, _)| *sid == id)?;
        let (_, subscriber) = subscribers.remove(pos);
        tracing::debug!(id = id.0, name = subscriber.name(), "tick subscriber unregistered");
        Some(subscriber)
    }

    pub fn subscriber_count(&self) -> usize {
        self.shared.subscribers.lock().len()
    }

    /// Spawns the loop thread. Only valid from [`SchedulerState::Idle`].
    pub fn start(&mut self) -> StrandResult<()> {
        if self.state != SchedulerState::Idle {
            return Err(StrandError::Scheduler(format!(
                "cannot start a scheduler that is {}",
                self.state.as_str()
            )));
        }

        self.shared.running.store(true, Ordering::Release);
        let shared = Arc::clone(&self.shared);
        let config = self.config.clone();
        let events = self.events.clone();

        let handle = thread::Builder::new()
            .name("strand-scheduler".into())
            .spawn(move || run_loop(shared, config, events))
            .map_err(|e| {
                self.shared.running.store(false, Ordering::Release);
                StrandError::Scheduler(format!("failed to spawn scheduler thread: {e}"))
            })?;

        self.thread = Some(handle);
        self.set_state(SchedulerState::Running);
        Ok(())
    }

    /// Stops the loop and joins its thread. Idempotent.
    pub fn stop(&mut self) -> StrandResult<()> {
        if self.state == SchedulerState::Stopped {
            return Ok(());
        }
        self.shared.running.store(false, Ordering::Release);
        self.set_state(SchedulerState::Stopped);

        if let Some(handle) = self.thread.take() {
            handle
                .join()
                .map_err(|_| StrandError::Scheduler("scheduler thread panicked".into()))?;
        }
        Ok(())
    }

    /// Closes the pause gate. Allowed before `start`, in which case the
    /// loop begins paused.
    pub fn pause(&self) {
        if !self.shared.paused.swap(true, Ordering::AcqRel) {
            tracing::debug!("scheduler paused");
            self.emit_state("paused");
        }
    }

    /// Opens the pause gate. Timing restarts from now.
    pub fn resume(&self) {
        if self.shared.paused.swap(false, Ordering::AcqRel) {
            self.shared.step_requests.store(0, Ordering::Release);
            tracing::debug!("scheduler resumed");
            self.emit_state("resumed");
        }
    }

    pub fn is_paused(&self) -> bool {
        self.shared.paused.load(Ordering::Acquire)
    }

    /// Requests exactly one cycle at the nominal interval while paused.
    ///
    /// Returns `false` (and does nothing) unless running and paused.
    pub fn step(&self) -> bool {
        if self.state != SchedulerState::Running || !self.is_paused() {
            return false;
        }
        self.shared.step_requests.fetch_add(1, Ordering::AcqRel);
        true
    }

    /// Broadcasts one sub-step of `dt` on the calling thread.
    ///
    /// For deterministic drivers that run without the background loop.
    pub fn broadcast(&self, dt: f32) {
        self.shared.broadcast(dt);
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Completed cycles.
    pub fn cycle_count(&self) -> u64 {
        self.shared.cycles.load(Ordering::Relaxed)
    }

    /// Completed sub-step broadcasts.
    pub fn tick_count(&self) -> u64 {
        self.shared.ticks.load(Ordering::Relaxed)
    }

    /// Cycles that took longer than the frame interval.
    pub fn overrun_count(&self) -> u64 {
        self.shared.overruns.load(Ordering::Relaxed)
    }

    fn set_state(&mut self, state: SchedulerState) {
        self.state = state;
        tracing::debug!(state = state.as_str(), "scheduler state");
        self.emit_state(state.as_str());
    }

    fn emit_state(&self, state: &str) {
        if let Some(events) = &self.events {
            events.emit(SimulationEvent::new(
                self.cycle_count(),
                EventKind::SchedulerState { state: state.to_string() },
            ));
        }
    }
}

impl Drop for FixedStepScheduler {
    fn drop(&mut self) {
        if self.state == SchedulerState::Running {
            if let Err(e) = self.stop() {
                tracing::warn!(error = %e, "scheduler did not stop cleanly");
            }
        }
    }
}

fn run_loop(shared: Arc<Shared>, config: SchedulerConfig, events: Option<EventSender>) {
    let interval = config.frame_interval();
    let limit = config.frame_delta_limit();
    let sub_steps = config.sub_step_count;

    let delay_end = Instant::now() + config.startup_delay();
    while Instant::now() < delay_end {
        if !shared.running.load(Ordering::Acquire) {
            return;
        }
        thread::sleep(GATE_POLL);
    }

    // `None` means the next cycle uses the nominal interval.
    let mut last_start: Option<Instant> = None;

    while shared.running.load(Ordering::Acquire) {
        if shared.paused.load(Ordering::Acquire) {
            last_start = None;
            if shared.take_step_request() {
                shared.run_cycle(interval, sub_steps);
            } else {
                thread::sleep(GATE_POLL);
            }
            continue;
        }

        let cycle_start = Instant::now();
        let frame_delta = match last_start {
            Some(prev) => clamp_frame_delta(cycle_start - prev, limit),
            None => interval,
        };
        last_start = Some(cycle_start);

        shared.run_cycle(frame_delta, sub_steps);

        let elapsed = cycle_start.elapsed();
        match remaining_sleep(elapsed, interval) {
            Some(rest) => thread::sleep(rest),
            None => {
                let cycle = shared.cycles.load(Ordering::Relaxed);
                shared.overruns.fetch_add(1, Ordering::Relaxed);
                let elapsed_ms = elapsed.as_secs_f64() * 1e3;
                let budget_ms = interval.as_secs_f64() * 1e3;
                tracing::warn!(cycle, elapsed_ms, budget_ms, "scheduler cycle overran its frame");
                if let Some(events) = &events {
                    events.emit(SimulationEvent::new(
                        cycle,
                        EventKind::SchedulerOverrun { cycle, elapsed_ms, budget_ms },
                    ));
                }
            }
        }
    }
}
