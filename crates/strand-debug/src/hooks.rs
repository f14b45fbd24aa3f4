//! Inspection hooks for live debugging.
//!
//! Hooks are called by whoever drives the tick loop (the bench runner,
//! the CLI) at tick begin, after every constraint pass, and at tick end.

use strand_solver::TickResult;
use strand_telemetry::events::{EventKind, SimulationEvent};
use strand_types::CableId;

/// Trait for simulation inspection hooks.
///
/// Implement this to observe a cable without modifying the solver.
/// Hooks should be read-only.
///
/// # Lifecycle
///
/// ```text
/// for each tick:
///   hook.on_tick_begin(...)
///   for each constraint pass:
///     hook.on_pass(...)
///   hook.on_tick_end(...)
/// hook.on_simulation_end()
/// ```
pub trait InspectionHook: Send {
    /// Called at the beginning of each tick.
    fn on_tick_begin(&mut self, timestep: u64, sim_time: f64, dt: f32) {
        let _ = (timestep, sim_time, dt);
    }

    /// Called after each constraint pass.
    fn on_pass(&mut self, timestep: u64, pass: u32, max_stretch: f32) {
        let _ = (timestep, pass, max_stretch);
    }

    /// Called at the end of each tick.
    fn on_tick_end(&mut self, timestep: u64, result: &TickResult) {
        let _ = (timestep, result);
    }

    /// Called when the simulation completes.
    fn on_simulation_end(&mut self) {}

    /// Returns the hook's name for logging.
    fn name(&self) -> &str;
}

/// Hook that buffers telemetry events for later dispatch.
pub struct TelemetryHook {
    cable: CableId,
    events: Vec<SimulationEvent>,
}

impl TelemetryHook {
    /// Creates a hook reporting for `cable`.
    pub fn new(cable: CableId) -> Self {
        Self { cable, events: Vec::new() }
    }

    /// Drains collected events for dispatch.
    pub fn drain_events(&mut self) -> Vec<SimulationEvent> {
        std::mem::take(&mut self.events)
    }
}

impl Default for TelemetryHook {
    fn default() -> Self {
        Self::new(CableId(0))
    }
}

impl InspectionHook for TelemetryHook {
    fn on_tick_begin(&mut self, timestep: u64, sim_time: f64, dt: f32) {
        self.events.push(SimulationEvent::new(
            timestep,
            EventKind::TickBegin { cable: self.cable.0, dt, sim_time },
        ));
    }

    fn on_pass(&mut self, timestep: u64, pass: u32, max_stretch: f32) {
        self.events.push(SimulationEvent::new(
            timestep,
            EventKind::SolverPass { pass, max_stretch },
        ));
    }

    fn on_tick_end(&mut self, timestep: u64, result: &TickResult) {
        if result.collided_nodes > 0 {
            self.events.push(SimulationEvent::new(
                timestep,
                EventKind::Collision {
                    cable: self.cable.0,
                    colliding_nodes: result.collided_nodes,
                    max_correction: result.contacts.max_correction,
                },
            ));
        }
        self.events.push(SimulationEvent::new(
            timestep,
            EventKind::TickEnd { cable: self.cable.0, wall_time: result.wall_time },
        ));
    }

    fn name(&self) -> &str {
        "telemetry_hook"
    }
}
