//! Benchmark scenarios — cable layout + obstacles + config for each test case.
//!
//! Four canonical scenarios for regression testing:
//! 1. **Hanging cable** — 10 nodes hanging from one anchor under gravity
//! 2. **Sphere drape** — horizontal cable swinging down onto a sphere
//! 3. **Box drape** — horizontal cable swinging onto a rotated box
//! 4. **Bridge** — cable pinned at both ends, sagging between them

use serde::{Deserialize, Serialize};

use strand_contact::{BoxDescriptor, ColliderSet, SphereDescriptor};
use strand_math::{Quat, Vec3};
use strand_solver::CableConfig;
use strand_types::StrandResult;

/// Which benchmark scenario to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScenarioKind {
    /// Cable pinned at one end, hanging under gravity.
    HangingCable,
    /// Cable draped over a sphere.
    SphereDrape,
    /// Cable draped over a rotated box.
    BoxDrape,
    /// Cable pinned at both ends.
    Bridge,
}

impl ScenarioKind {
    /// Returns all scenario kinds.
    pub fn all() -> &'static [ScenarioKind] {
        &[
            ScenarioKind::HangingCable,
            ScenarioKind::SphereDrape,
            ScenarioKind::BoxDrape,
            ScenarioKind::Bridge,
        ]
    }

    /// Returns a human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            ScenarioKind::HangingCable => "hanging_cable",
            ScenarioKind::SphereDrape => "sphere_drape",
            ScenarioKind::BoxDrape => "box_drape",
            ScenarioKind::Bridge => "bridge",
        }
    }

    /// Looks a kind up by its [`name`](Self::name).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().iter().copied().find(|k| k.name() == name)
    }
}

/// A fully specified benchmark scenario.
pub struct Scenario {
    /// Scenario type.
    pub kind: ScenarioKind,
    /// Cable configuration.
    pub config: CableConfig,
    /// Start anchor.
    pub anchor: Vec3,
    /// End anchor, used when the end handle is enabled.
    pub end_anchor: Option<Vec3>,
    /// Sphere obstacles.
    pub spheres: Vec<SphereDescriptor>,
    /// Box obstacles.
    pub boxes: Vec<BoxDescriptor>,
    /// Number of ticks to simulate.
    pub timesteps: u32,
    /// Tick size (seconds).
    pub dt: f32,
}

impl Scenario {
    /// Create the hanging cable scenario.
    ///
    /// 10 nodes 0.1 m apart, elasticity 1, 10 passes, 100 ticks of 20 ms.
    pub fn hanging_cable() -> Self {
        Self {
            kind: ScenarioKind::HangingCable,
            config: CableConfig {
                node_count: 10,
                node_distance: 0.1,
                elasticity: 1.0,
                solver_iterations: 10,
                ..Default::default()
            },
            anchor: Vec3::new(0.0, 2.0, 0.0),
            end_anchor: None,
            spheres: Vec::new(),
            boxes: Vec::new(),
            timesteps: 100,
            dt: 0.02,
        }
    }

    /// Create the sphere drape scenario.
    ///
    /// A 1.5 m cable laid out horizontally swings down onto a sphere of
    /// radius 0.3 m under its anchor.
    pub fn sphere_drape() -> Self {
        let sphere = SphereDescriptor { center: Vec3::new(0.1, 0.6, 0.0), radius: 0.3 };
        Self {
            kind: ScenarioKind::SphereDrape,
            config: horizontal(30, 0.05),
            anchor: Vec3::new(0.0, 1.0, 0.0),
            end_anchor: None,
            spheres: vec![sphere],
            boxes: Vec::new(),
            timesteps: 300,
            dt: 0.01,
        }
    }

    /// Create the box drape scenario.
    ///
    /// Same cable as the sphere drape, falling onto a box tilted 15°
    /// about Z.
    pub fn box_drape() -> Self {
        let obstacle = BoxDescriptor {
            center: Vec3::new(0.3, 0.6, 0.0),
            rotation: Quat::from_rotation_z(15f32.to_radians()),
            scale: Vec3::ONE,
            size: Vec3::new(0.5, 0.2, 0.5),
        };
        Self {
            kind: ScenarioKind::BoxDrape,
            config: horizontal(30, 0.05),
            anchor: Vec3::new(0.0, 1.0, 0.0),
            end_anchor: None,
            spheres: Vec::new(),
            boxes: vec![obstacle],
            timesteps: 300,
            dt: 0.01,
        }
    }

    /// Create the bridge scenario.
    ///
    /// 20 nodes spanning 1.6 m between two anchors at equal height.
    pub fn bridge() -> Self {
        Self {
            kind: ScenarioKind::Bridge,
            config: CableConfig {
                end_handle_enabled: true,
                ..horizontal(20, 0.1)
            },
            anchor: Vec3::new(0.0, 1.0, 0.0),
            end_anchor: Some(Vec3::new(1.6, 1.0, 0.0)),
            spheres: Vec::new(),
            boxes: Vec::new(),
            timesteps: 200,
            dt: 0.01,
        }
    }

    /// Create a scenario by kind.
    pub fn from_kind(kind: ScenarioKind) -> Self {
        match kind {
            ScenarioKind::HangingCable => Self::hanging_cable(),
            ScenarioKind::SphereDrape => Self::sphere_drape(),
            ScenarioKind::BoxDrape => Self::box_drape(),
            ScenarioKind::Bridge => Self::bridge(),
        }
    }

    /// Validates the descriptors and snapshots the obstacles.
    pub fn colliders(&self) -> StrandResult<ColliderSet> {
        ColliderSet::from_descriptors(&self.spheres, &self.boxes)
    }

    /// Checks the configuration before a run.
    pub fn validate(&self) -> StrandResult<()> {
        self.config.validate()
    }
}

fn horizontal(node_count: usize, node_distance: f32) -> CableConfig {
    CableConfig {
        node_count,
        node_distance,
        initial_direction: [1.0, 0.0, 0.0],
        ..Default::default()
    }
}
