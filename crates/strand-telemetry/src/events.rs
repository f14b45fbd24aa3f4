//! Simulation event types.
//!
//! Structured events emitted by the cable drivers and the scheduler.
//! Events are lightweight value types that carry just enough data to be
//! useful for monitoring and debugging.

use serde::{Deserialize, Serialize};

/// A simulation event.
///
/// Events are tagged with the tick index of the emitter and carry
/// domain-specific data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationEvent {
    /// Tick number of the emitter (0-indexed).
    pub timestep: u64,
    /// Event payload.
    pub kind: EventKind,
}

/// Event payload variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventKind {
    /// A cable tick started.
    TickBegin {
        /// Cable identifier.
        cable: u32,
        /// Sub-step size (seconds).
        dt: f32,
        /// Accumulated simulated time before this tick (seconds).
        sim_time: f64,
    },

    /// A cable tick finished.
    TickEnd {
        /// Cable identifier.
        cable: u32,
        /// Wall-clock time spent in the tick (seconds).
        wall_time: f64,
    },

    /// One solver pass completed.
    SolverPass {
        /// Pass number within the tick.
        pass: u32,
        /// Largest relative stretch left after the pass.
        max_stretch: f32,
    },

    /// Obstacle contacts during a tick.
    Collision {
        /// Cable identifier.
        cable: u32,
        /// Number of nodes corrected by an obstacle.
        colliding_nodes: u32,
        /// Largest single correction distance (meters).
        max_correction: f32,
    },

    /// Node indices that left every active collision window.
    LocalityReleased {
        /// Cable identifier.
        cable: u32,
        /// Released node indices.
        indices: Vec<usize>,
    },

    /// Committed state reported back for a virtual point.
    VirtualPointFeedback {
        /// Virtual point id.
        point: u32,
        /// Bound node index.
        node: usize,
        /// Committed node position.
        position: [f32; 3],
        /// Inferred node velocity (m/s).
        velocity: [f32; 3],
    },

    /// A scheduler cycle took longer than its frame budget.
    SchedulerOverrun {
        /// Cycle number.
        cycle: u64,
        /// Time spent in the cycle (milliseconds).
        elapsed_ms: f64,
        /// Frame budget (milliseconds).
        budget_ms: f64,
    },

    /// Scheduler lifecycle transition.
    SchedulerState {
        /// New state name.
        state: String,
    },

    /// Custom event for extensibility.
    Custom {
        /// Arbitrary label.
        label: String,
        /// JSON-encoded payload.
        payload: String,
    },
}

impl SimulationEvent {
    /// Creates a new event for the given timestep.
    pub fn new(timestep: u64, kind: EventKind) -> Self {
        Self { timestep, kind }
    }
}
