//! Translation / rotation / scale transforms.
//!
//! Mirrors what a host scene graph hands us for an obstacle: a world
//! position, an orientation and a (possibly non-uniform) local scale.
//! Matrices are derived on demand; callers that query them in a hot
//! loop cache the result (see `BoxSnapshot` in `strand-contact`).

use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// A TRS transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// World position.
    pub translation: Vec3,
    /// World orientation.
    pub rotation: Quat,
    /// Local scale, applied before rotation.
    pub scale: Vec3,
}

impl Transform {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    /// Creates a transform from its three components.
    pub fn new(translation: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self { translation, rotation, scale }
    }

    /// Creates a pure translation.
    pub fn from_translation(translation: Vec3) -> Self {
        Self { translation, ..Self::IDENTITY }
    }

    /// Matrix mapping local coordinates to world coordinates.
    pub fn local_to_world(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }

    /// Matrix mapping world coordinates to local coordinates.
    ///
    /// Only meaningful when [`is_invertible`](Self::is_invertible) holds.
    pub fn world_to_local(&self) -> Mat4 {
        self.local_to_world().inverse()
    }

    /// True when every scale component is finite and non-zero and the
    /// rotation is a finite quaternion.
    pub fn is_invertible(&self) -> bool {
        self.scale.is_finite()
            && self.scale.x != 0.0
            && self.scale.y != 0.0
            && self.scale.z != 0.0
            && self.rotation.is_finite()
            && self.translation.is_finite()
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_through_local_space() {
        let t = Transform::new(
            Vec3::new(1.0, 2.0, 3.0),
            Quat::from_rotation_y(0.7),
            Vec3::new(2.0, 0.5, 1.5),
        );
        let p = Vec3::new(-0.3, 4.0, 0.25);
        let local = t.world_to_local().transform_point3(p);
        let back = t.local_to_world().transform_point3(local);
        assert!((back - p).length() < 1e-5);
    }

    #[test]
    fn zero_scale_is_not_invertible() {
        let t = Transform::new(Vec3::ZERO, Quat::IDENTITY, Vec3::new(1.0, 0.0, 1.0));
        assert!(!t.is_invertible());
    }
}
