//! Cable configuration.
//!
//! Parameters that control one cable: discretization, solver passes,
//! gravity, obstacle thickness, and the behavioural variants that are
//! selected as data rather than as separate solvers.

use serde::{Deserialize, Serialize};
use strand_contact::SelfCollisionPass;
use strand_math::vector::normalize_or;
use strand_math::Vec3;
use strand_types::constants;
use strand_types::{StrandError, StrandResult};

/// How the gravity term is scaled by the step size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrationMode {
    /// `gravity * dt²` (position Verlet).
    #[default]
    Verlet,
    /// `gravity * dt`.
    Velocity,
}

/// Which sign of constraint error the distance solver corrects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompressionPolicy {
    /// Only pull nodes together when the segment is stretched.
    #[default]
    StretchOnly,
    /// Correct stretch and compression alike.
    Bidirectional,
}

/// Node mass assignment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum MassMode {
    /// Every node has the same fixed mass (kg).
    PerNode { mass: f32 },
    /// A total mass (kg) split evenly across the nodes.
    Distributed { total: f32 },
}

impl Default for MassMode {
    fn default() -> Self {
        MassMode::PerNode { mass: constants::DEFAULT_NODE_MASS }
    }
}

impl MassMode {
    /// Mass of a single node for a cable of `node_count` nodes.
    pub fn node_mass(&self, node_count: usize) -> f32 {
        match *self {
            MassMode::PerNode { mass } => mass,
            MassMode::Distributed { total } => total / node_count.max(1) as f32,
        }
    }
}

/// Configuration for a single cable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CableConfig {
    /// Number of nodes (at least two).
    pub node_count: usize,

    /// Uniform rest distance between adjacent nodes (meters).
    pub node_distance: f32,

    /// Constraint passes per tick.
    pub solver_iterations: u32,

    /// Fraction of the constraint error corrected per pass, in (0, 1].
    pub elasticity: f32,

    /// Gravity magnitude (m/s²).
    pub gravity: f32,

    /// Gravity direction; normalized on use.
    pub gravity_direction: [f32; 3],

    /// Multiplier on the carried velocity, in (0.9, 1].
    pub gravity_dampening: f32,

    /// Cable diameter. Obstacles keep nodes `thickness / 2` away.
    pub cable_thickness: f32,

    /// Pin the last node to the end anchor.
    pub end_handle_enabled: bool,

    /// Node mass assignment.
    pub mass: MassMode,

    /// Scale the gravity term by node mass.
    pub mass_weighted_gravity: bool,

    /// Gravity step scaling.
    pub integration: IntegrationMode,

    /// Which constraint errors are corrected.
    pub compression: CompressionPolicy,

    /// Gain on the dynamic virtual point pull.
    pub dynamic_pull_gain: f32,

    /// Half-width of the collision locality window.
    pub locality_extra_range: usize,

    /// Optional pairwise self-collision. Off by default.
    pub self_collision: Option<SelfCollisionPass>,

    /// Direction along which nodes are laid out from the anchor.
    pub initial_direction: [f32; 3],
}

impl Default for CableConfig {
    fn default() -> Self {
        Self {
            node_count: constants::DEFAULT_NODE_COUNT,
            node_distance: constants::DEFAULT_NODE_DISTANCE,
            solver_iterations: constants::DEFAULT_SOLVER_ITERATIONS,
            elasticity: 1.0,
            gravity: constants::GRAVITY,
            gravity_direction: [0.0, -1.0, 0.0],
            gravity_dampening: 1.0,
            cable_thickness: constants::DEFAULT_CABLE_THICKNESS,
            end_handle_enabled: false,
            mass: MassMode::default(),
            mass_weighted_gravity: false,
            integration: IntegrationMode::default(),
            compression: CompressionPolicy::default(),
            dynamic_pull_gain: constants::DEFAULT_DYNAMIC_PULL_GAIN,
            locality_extra_range: constants::DEFAULT_LOCALITY_EXTRA_RANGE,
            self_collision: None,
            initial_direction: [0.0, -1.0, 0.0],
        }
    }
}

impl CableConfig {
    /// Creates a config for debugging (few nodes, few passes).
    pub fn debug() -> Self {
        Self {
            node_count: 10,
            solver_iterations: 3,
            ..Default::default()
        }
    }

    /// Creates a high-quality config (denser cable, more passes, self-collision).
    pub fn high_quality() -> Self {
        Self {
            node_count: 80,
            node_distance: 0.05,
            solver_iterations: 30,
            self_collision: Some(SelfCollisionPass::new(0.02, 2)),
            ..Default::default()
        }
    }

    /// Gravity as a vector: magnitude along the normalized direction.
    pub fn gravity_vector(&self) -> Vec3 {
        Vec3::from_array(self.gravity_direction).normalize_or_zero() * self.gravity
    }

    /// Normalized layout direction.
    pub fn layout_direction(&self) -> Vec3 {
        normalize_or(Vec3::from_array(self.initial_direction), Vec3::NEG_Y)
    }

    /// Node mass for the configured node count.
    pub fn node_mass(&self) -> f32 {
        self.mass.node_mass(self.node_count)
    }

    /// Checks every field is within range.
    pub fn validate(&self) -> StrandResult<()> {
        fn invalid(msg: String) -> StrandResult<()> {
            Err(StrandError::InvalidConfig(msg))
        }

        if self.node_count < 2 {
            return invalid(format!("node_count must be > 1 (got {})", self.node_count));
        }
        if !self.node_distance.is_finite() || self.node_distance < 0.0 {
            return invalid(format!("node_distance must be >= 0 (got {})", self.node_distance));
        }
        if self.solver_iterations == 0 {
            return invalid("solver_iterations must be >= 1".into());
        }
        if !(self.elasticity > 0.0 && self.elasticity <= 1.0) {
            return invalid(format!("elasticity must be in (0, 1] (got {})", self.elasticity));
        }
        if !self.gravity.is_finite() {
            return invalid("gravity must be finite".into());
        }
        if !Vec3::from_array(self.gravity_direction).is_finite() {
            return invalid("gravity_direction must be finite".into());
        }
        if !(self.gravity_dampening > 0.9 && self.gravity_dampening <= 1.0) {
            return invalid(format!(
                "gravity_dampening must be in (0.9, 1] (got {})",
                self.gravity_dampening
            ));
        }
        if !self.cable_thickness.is_finite() || self.cable_thickness < 0.0 {
            return invalid(format!(
                "cable_thickness must be >= 0 (got {})",
                self.cable_thickness
            ));
        }
        if !self.node_mass().is_finite() || self.node_mass() <= 0.0 {
            return invalid(format!("node mass must be > 0 (got {})", self.node_mass()));
        }
        if !self.dynamic_pull_gain.is_finite() || self.dynamic_pull_gain <= 0.0 {
            return invalid(format!(
                "dynamic_pull_gain must be > 0 (got {})",
                self.dynamic_pull_gain
            ));
        }
        let layout = Vec3::from_array(self.initial_direction);
        if !layout.is_finite() || layout.length_squared() == 0.0 {
            return invalid("initial_direction must be a finite non-zero vector".into());
        }
        if let Some(pass) = &self.self_collision {
            if !pass.min_radius.is_finite() || pass.min_radius <= 0.0 {
                return invalid(format!(
                    "self_collision.min_radius must be > 0 (got {})",
                    pass.min_radius
                ));
            }
        }
        Ok(())
    }
}
