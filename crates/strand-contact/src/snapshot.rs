//! Collider descriptors and immutable per-tick snapshots.
//!
//! The host describes its obstacles with plain descriptors. A
//! [`ColliderSet`] copies them once into solver-friendly snapshots so the
//! simulation thread never touches live scene transforms. A tick holds one
//! `Arc<ColliderSet>` for all of its passes.

use serde::{Deserialize, Serialize};
use strand_math::{Quat, Transform, Vec3};
use strand_types::{StrandError, StrandResult};

use crate::box_collider::BoxSnapshot;
use crate::sphere::SphereSnapshot;

/// Host-side sphere description.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SphereDescriptor {
    /// World position of the center.
    pub center: Vec3,
    /// Radius in world units.
    pub radius: f32,
}

/// Host-side box description.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxDescriptor {
    /// World position of the center.
    pub center: Vec3,
    /// World orientation.
    #[serde(default = "identity_rotation")]
    pub rotation: Quat,
    /// Local scale.
    #[serde(default = "unit_scale")]
    pub scale: Vec3,
    /// Unscaled box size (full edge lengths).
    pub size: Vec3,
}

fn identity_rotation() -> Quat {
    Quat::IDENTITY
}

fn unit_scale() -> Vec3 {
    Vec3::ONE
}

impl SphereDescriptor {
    /// Checks the descriptor can be snapshotted.
    pub fn validate(&self) -> StrandResult<()> {
        if !self.center.is_finite() || !self.radius.is_finite() {
            return Err(StrandError::InvalidCollider(
                "sphere center and radius must be finite".into(),
            ));
        }
        if self.radius < 0.0 {
            return Err(StrandError::InvalidCollider(format!(
                "sphere radius must be >= 0 (got {})",
                self.radius
            )));
        }
        Ok(())
    }
}

impl BoxDescriptor {
    /// Axis-aligned, unscaled box.
    pub fn axis_aligned(center: Vec3, size: Vec3) -> Self {
        Self { center, rotation: Quat::IDENTITY, scale: Vec3::ONE, size }
    }

    /// Checks the descriptor can be snapshotted (finite, invertible).
    pub fn validate(&self) -> StrandResult<()> {
        let transform = Transform::new(self.center, self.rotation, self.scale);
        if !transform.is_invertible() {
            return Err(StrandError::InvalidCollider(
                "box transform must be finite with non-zero scale".into(),
            ));
        }
        if !self.size.is_finite() || self.size.min_element() < 0.0 {
            return Err(StrandError::InvalidCollider(format!(
                "box size must be finite and >= 0 (got {:?})",
                self.size
            )));
        }
        Ok(())
    }
}

/// Immutable set of obstacle snapshots.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColliderSet {
    spheres: Vec<SphereSnapshot>,
    boxes: Vec<BoxSnapshot>,
}

impl ColliderSet {
    /// An obstacle-free set.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Validates and snapshots host descriptors.
    pub fn from_descriptors(
        spheres: &[SphereDescriptor],
        boxes: &[BoxDescriptor],
    ) -> StrandResult<Self> {
        let mut sphere_snaps = Vec::with_capacity(spheres.len());
        for s in spheres {
            s.validate()?;
            sphere_snaps.push(SphereSnapshot::new(s.center, s.radius));
        }

        let mut box_snaps = Vec::with_capacity(boxes.len());
        for b in boxes {
            b.validate()?;
            box_snaps.push(BoxSnapshot::new(b.center, b.rotation, b.scale, b.size));
        }

        Ok(Self { spheres: sphere_snaps, boxes: box_snaps })
    }

    /// Sphere snapshots.
    pub fn spheres(&self) -> &[SphereSnapshot] {
        &self.spheres
    }

    /// Box snapshots.
    pub fn boxes(&self) -> &[BoxSnapshot] {
        &self.boxes
    }

    /// True when there is nothing to collide with.
    pub fn is_empty(&self) -> bool {
        self.spheres.is_empty() && self.boxes.is_empty()
    }

    /// Total number of obstacles.
    pub fn len(&self) -> usize {
        self.spheres.len() + self.boxes.len()
    }

    /// Resolves one node against every obstacle, spheres first, each
    /// obstacle seeing the output of the previous one.
    ///
    /// Returns the corrected position when at least one obstacle fired.
    pub fn resolve(&self, position: Vec3, thickness: f32) -> Option<Vec3> {
        let mut current = position;
        let mut hit = false;

        for sphere in &self.spheres {
            if let Some(corrected) = sphere.resolve(current, thickness) {
                current = corrected;
                hit = true;
            }
        }

        for b in &self.boxes {
            if let Some(corrected) = b.resolve(current, thickness) {
                current = corrected;
                hit = true;
            }
        }

        hit.then_some(current)
    }

    /// Smallest signed clearance between `position` and any sphere surface
    /// inflated by half the thickness. `None` when there are no spheres.
    pub fn min_sphere_clearance(&self, position: Vec3, thickness: f32) -> Option<f32> {
        self.spheres
            .iter()
            .map(|s| s.signed_distance(position, thickness))
            .reduce(f32::min)
    }
}
