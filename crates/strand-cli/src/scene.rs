//! TOML scene files.
//!
//! A scene bundles everything the host would normally supply: the cable
//! configuration, scheduler timing, anchors, obstacles, and virtual points.
//! Top-level keys (`anchor`, `end_anchor`) must come before any table.
//!
//! ```toml
//! anchor = [0.0, 2.0, 0.0]
//!
//! [cable]
//! node_count = 20
//! node_distance = 0.1
//!
//! [[spheres]]
//! center = [0.0, 0.8, 0.0]
//! radius = 0.3
//! ```

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use strand_contact::{BoxDescriptor, ColliderSet, SphereDescriptor};
use strand_math::Vec3;
use strand_scheduler::SchedulerConfig;
use strand_solver::{Cable, CableConfig, VirtualPoint};
use strand_types::{StrandError, StrandResult};

/// A complete simulation input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scene {
    /// Start anchor (node 0).
    pub anchor: Vec3,
    /// End anchor. Only used when the end handle is enabled; defaults to
    /// wherever the last node is laid out.
    pub end_anchor: Option<Vec3>,
    pub cable: CableConfig,
    pub scheduler: SchedulerConfig,
    pub spheres: Vec<SphereDescriptor>,
    pub boxes: Vec<BoxDescriptor>,
    pub virtual_points: Vec<VirtualPoint>,
}

impl Scene {
    /// Reads and validates a scene file.
    pub fn load(path: impl AsRef<Path>) -> StrandResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let scene = Self::from_toml(&content)?;
        scene.validate()?;
        Ok(scene)
    }

    /// Parses a scene without validating it.
    pub fn from_toml(content: &str) -> StrandResult<Self> {
        toml::from_str(content).map_err(|e| StrandError::Serialization(e.to_string()))
    }

    /// Checks every part of the scene, including virtual point indices.
    pub fn validate(&self) -> StrandResult<()> {
        if !self.anchor.is_finite() || !self.end_anchor.map_or(true, |a| a.is_finite()) {
            return Err(StrandError::InvalidConfig("anchors must be finite".into()));
        }
        self.cable.validate()?;
        self.scheduler.validate()?;
        self.colliders()?;
        for point in &self.virtual_points {
            if point.node_index >= self.cable.node_count {
                return Err(StrandError::NodeOutOfRange {
                    index: point.node_index,
                    count: self.cable.node_count,
                });
            }
        }
        Ok(())
    }

    /// Snapshots the scene's obstacles.
    pub fn colliders(&self) -> StrandResult<ColliderSet> {
        ColliderSet::from_descriptors(&self.spheres, &self.boxes)
    }

    /// Builds the cable with anchors, obstacles, and virtual points applied.
    pub fn build_cable(&self) -> StrandResult<Cable> {
        let mut cable = Cable::new(self.cable.clone(), self.anchor)?;
        if let Some(end) = self.end_anchor {
            cable.set_end_anchor(end);
        }
        cable.set_colliders(Arc::new(self.colliders()?));
        for point in &self.virtual_points {
            cable.register_virtual_point(*point)?;
        }
        Ok(cable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strand_solver::VirtualPointMode;
    use strand_types::VirtualPointId;

    const SCENE: &str = r#"
anchor = [0.0, 2.0, 0.0]
end_anchor = [1.0, 2.0, 0.0]

[cable]
node_count = 12
node_distance = 0.1
end_handle_enabled = true

[scheduler]
target_tick_frequency = 30
sub_step_count = 2

[[spheres]]
center = [0.5, 1.5, 0.0]
radius = 0.2

[[boxes]]
center = [0.5, 1.0, 0.0]
size = [0.4, 0.1, 0.4]

[[virtual_points]]
id = 7
node_index = 5
mode = "dynamic"
target_position = [0.5, 2.5, 0.0]
max_pull_strength = 0.05
"#;

    #[test]
    fn parses_full_scene() {
        let scene = Scene::from_toml(SCENE).unwrap();
        scene.validate().unwrap();

        assert_eq!(scene.anchor, Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(scene.end_anchor, Some(Vec3::new(1.0, 2.0, 0.0)));
        assert_eq!(scene.cable.node_count, 12);
        assert!(scene.cable.end_handle_enabled);
        assert_eq!(scene.scheduler.sub_step_count, 2);
        assert_eq!(scene.spheres.len(), 1);
        assert_eq!(scene.boxes[0].scale, Vec3::ONE);

        let vp = scene.virtual_points[0];
        assert_eq!(vp.id, VirtualPointId(7));
        assert_eq!(vp.mode, VirtualPointMode::Dynamic);
    }

    #[test]
    fn empty_scene_uses_defaults() {
        let scene = Scene::from_toml("").unwrap();
        assert_eq!(scene.cable, CableConfig::default());
        assert!(scene.spheres.is_empty());
        assert!(scene.validate().is_ok());
    }

    #[test]
    fn rejects_virtual_point_past_the_tail() {
        let mut scene = Scene::from_toml(SCENE).unwrap();
        scene.virtual_points[0].node_index = 12;
        assert!(matches!(
            scene.validate(),
            Err(StrandError::NodeOutOfRange { index: 12, count: 12 })
        ));
    }

    #[test]
    fn rejects_negative_sphere_radius() {
        let mut scene = Scene::from_toml(SCENE).unwrap();
        scene.spheres[0].radius = -1.0;
        assert!(matches!(scene.validate(), Err(StrandError::InvalidCollider(_))));
    }

    #[test]
    fn built_cable_holds_both_anchors() {
        let scene = Scene::from_toml(SCENE).unwrap();
        let mut cable = scene.build_cable().unwrap();
        cable.tick(0.02);

        let positions = cable.positions();
        assert_eq!(positions[0], scene.anchor);
        assert_eq!(positions[11], Vec3::new(1.0, 2.0, 0.0));
        assert_eq!(cable.virtual_points().len(), 1);
        assert_eq!(cable.colliders().len(), 2);
    }
}
