//! Analytical oriented box collision.
//!
//! The node is taken into box-local space, tested against the half
//! extents inflated by half the cable thickness, and pushed out through
//! the face with the least scale-weighted penetration.

use serde::{Deserialize, Serialize};
use strand_math::{Mat4, Quat, Transform, Vec3};

/// Snapshot of an oriented, possibly non-uniformly scaled box.
///
/// The world↔local matrices are derived once at construction so the
/// per-node test is two matrix-point products.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxSnapshot {
    /// World position of the box center.
    pub center: Vec3,
    /// World orientation.
    pub rotation: Quat,
    /// Local scale.
    pub scale: Vec3,
    /// Half of the unscaled box size.
    pub half_extents: Vec3,
    /// Cached world → local matrix.
    pub world_to_local: Mat4,
    /// Cached local → world matrix.
    pub local_to_world: Mat4,
}

impl BoxSnapshot {
    /// Builds a snapshot from a transform and the unscaled box size.
    pub fn new(center: Vec3, rotation: Quat, scale: Vec3, size: Vec3) -> Self {
        let transform = Transform::new(center, rotation, scale);
        Self {
            center,
            rotation,
            scale,
            half_extents: size * 0.5,
            world_to_local: transform.world_to_local(),
            local_to_world: transform.local_to_world(),
        }
    }

    /// Returns the corrected position if `position` is inside the box
    /// inflated by half the cable thickness.
    ///
    /// All three local axes must penetrate. The exit axis is
    /// `argmin(p_x * s_x, p_y * s_y, p_z * s_z)`, ties going to the first
    /// axis in x, y, z order. This is nearest-face only up to the scale
    /// weighting and is not a minimum translation for every rotated,
    /// scaled box.
    pub fn resolve(&self, position: Vec3, thickness: f32) -> Option<Vec3> {
        let mut local = self.world_to_local.transform_point3(position);
        let half = self.half_extents + Vec3::splat(thickness * 0.5);
        let penetration = half - local.abs();

        if penetration.x <= 0.0 || penetration.y <= 0.0 || penetration.z <= 0.0 {
            return None;
        }

        let axis = exit_axis(penetration * self.scale.abs());
        let sign = if local[axis] < 0.0 { -1.0 } else { 1.0 };
        local[axis] = half[axis] * sign;

        Some(self.local_to_world.transform_point3(local))
    }

    /// True when `position` lies inside the box inflated by half the
    /// cable thickness.
    pub fn contains(&self, position: Vec3, thickness: f32) -> bool {
        let local = self.world_to_local.transform_point3(position);
        let half = self.half_extents + Vec3::splat(thickness * 0.5);
        let penetration = half - local.abs();
        penetration.x > 0.0 && penetration.y > 0.0 && penetration.z > 0.0
    }
}

/// Index of the smallest component; exact ties resolve to x, then y.
fn exit_axis(weighted: Vec3) -> usize {
    if weighted.x <= weighted.y && weighted.x <= weighted.z {
        0
    } else if weighted.y <= weighted.z {
        1
    } else {
        2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_axis_tie_breaks_in_xyz_order() {
        assert_eq!(exit_axis(Vec3::new(1.0, 1.0, 1.0)), 0);
        assert_eq!(exit_axis(Vec3::new(2.0, 1.0, 1.0)), 1);
        assert_eq!(exit_axis(Vec3::new(2.0, 3.0, 1.0)), 2);
    }
}
