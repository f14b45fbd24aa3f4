//! Physical constants and simulation defaults.

/// Gravitational acceleration (m/s²).
pub const GRAVITY: f32 = 9.81;

/// Default number of nodes in a cable.
pub const DEFAULT_NODE_COUNT: usize = 40;

/// Default rest distance between two adjacent nodes (meters).
pub const DEFAULT_NODE_DISTANCE: f32 = 0.1;

/// Default number of solver passes per tick.
pub const DEFAULT_SOLVER_ITERATIONS: u32 = 10;

/// Default cable thickness (meters). Half of it is kept clear of obstacles.
pub const DEFAULT_CABLE_THICKNESS: f32 = 0.05;

/// Default per-node mass (kg).
pub const DEFAULT_NODE_MASS: f32 = 0.5;

/// Default gain applied to dynamic virtual point pulls.
pub const DEFAULT_DYNAMIC_PULL_GAIN: f32 = 50.0;

/// Half-width of the neighbour window tracked around a colliding node.
pub const DEFAULT_LOCALITY_EXTRA_RANGE: usize = 5;

/// Default scheduler cycle frequency (Hz).
pub const DEFAULT_TICK_FREQUENCY: u32 = 100;

/// Default number of sub-steps per scheduler cycle.
pub const DEFAULT_SUB_STEPS: u32 = 2;
