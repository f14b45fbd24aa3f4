//! Pluggable event sinks.
//!
//! Sinks consume events from the bus and process them
//! (collect in memory, forward to `tracing`, etc.).

use std::sync::Arc;

use parking_lot::Mutex;

use crate::events::{EventKind, SimulationEvent};

/// Trait for event consumers.
///
/// Implement this to create custom telemetry outputs.
pub trait EventSink: Send {
    /// Process a single event.
    fn handle(&mut self, event: &SimulationEvent);

    /// Called when the simulation ends. Flush buffers, close files, etc.
    fn finalize(&mut self) {}

    /// Returns a human-readable name for this sink.
    fn name(&self) -> &str;
}

/// A sink that collects events into a shared `Vec` for tests and
/// inspection.
pub struct VecSink {
    events: Arc<Mutex<Vec<SimulationEvent>>>,
}

impl VecSink {
    /// Creates an empty vec sink.
    pub fn new() -> Self {
        Self { events: Arc::new(Mutex::new(Vec::new())) }
    }

    /// Returns a handle to the collected events that stays readable
    /// after the sink is boxed into a bus.
    pub fn events(&self) -> Arc<Mutex<Vec<SimulationEvent>>> {
        Arc::clone(&self.events)
    }
}

impl Default for VecSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for VecSink {
    fn handle(&mut self, event: &SimulationEvent) {
        self.events.lock().push(event.clone());
    }

    fn name(&self) -> &str {
        "vec_sink"
    }
}

/// A sink that logs events using the `tracing` crate.
///
/// Overruns are always logged at `warn`; everything else at the
/// configured level.
pub struct TracingSink {
    level: tracing::Level,
}

impl TracingSink {
    /// Creates a new tracing sink at the given log level.
    pub fn new(level: tracing::Level) -> Self {
        Self { level }
    }
}

impl EventSink for TracingSink {
    fn handle(&mut self, event: &SimulationEvent) {
        if matches!(event.kind, EventKind::SchedulerOverrun { .. }) {
            tracing::warn!(timestep = event.timestep, event = ?event.kind, "simulation_event");
            return;
        }

        match self.level {
            tracing::Level::ERROR => {
                tracing::error!(timestep = event.timestep, event = ?event.kind, "simulation_event")
            }
            tracing::Level::WARN => {
                tracing::warn!(timestep = event.timestep, event = ?event.kind, "simulation_event")
            }
            tracing::Level::INFO => {
                tracing::info!(timestep = event.timestep, event = ?event.kind, "simulation_event")
            }
            tracing::Level::DEBUG => {
                tracing::debug!(timestep = event.timestep, event = ?event.kind, "simulation_event")
            }
            tracing::Level::TRACE => {
                tracing::trace!(timestep = event.timestep, event = ?event.kind, "simulation_event")
            }
        }
    }

    fn name(&self) -> &str {
        "tracing_sink"
    }
}
