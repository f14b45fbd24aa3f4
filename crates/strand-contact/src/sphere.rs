//! Analytical sphere collision.
//!
//! Nodes inside `radius + thickness / 2` of the center are projected
//! radially back onto that shell.

use serde::{Deserialize, Serialize};
use strand_math::vector::normalize_or;
use strand_math::Vec3;

/// Snapshot of a sphere obstacle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SphereSnapshot {
    /// Center of the sphere.
    pub center: Vec3,
    /// Radius of the sphere.
    pub radius: f32,
}

impl SphereSnapshot {
    /// Creates a new sphere snapshot.
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Returns the corrected position if `position` lies within the
    /// sphere inflated by half the cable thickness.
    ///
    /// The corrected point stays on the ray from the center through
    /// `position`. A node exactly at the center is pushed along +Y.
    pub fn resolve(&self, position: Vec3, thickness: f32) -> Option<Vec3> {
        let surface = self.radius + thickness * 0.5;
        let offset = position - self.center;

        if offset.length_squared() > surface * surface {
            return None;
        }

        let normal = normalize_or(offset, Vec3::Y);
        Some(self.center + normal * surface)
    }

    /// Signed distance from `position` to the inflated surface
    /// (negative inside).
    pub fn signed_distance(&self, position: Vec3, thickness: f32) -> f32 {
        (position - self.center).length() - (self.radius + thickness * 0.5)
    }
}
