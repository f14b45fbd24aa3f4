//! Integration tests for strand-math.

use strand_math::vector::{clamp_length, flatten, normalize_or, unflatten};
use strand_math::{Quat, Transform, Vec3};

// ─── Transform Tests ──────────────────────────────────────────

#[test]
fn identity_is_noop() {
    let t = Transform::IDENTITY;
    let p = Vec3::new(1.0, -2.0, 3.0);
    assert_eq!(t.local_to_world().transform_point3(p), p);
    assert_eq!(t.world_to_local().transform_point3(p), p);
}

#[test]
fn scaled_box_local_coordinates() {
    // A box scaled 2x along X: world x = 2 maps to local x = 1.
    let t = Transform::new(Vec3::ZERO, Quat::IDENTITY, Vec3::new(2.0, 1.0, 1.0));
    let local = t.world_to_local().transform_point3(Vec3::new(2.0, 0.0, 0.0));
    assert!((local.x - 1.0).abs() < 1e-6);
}

#[test]
fn rotated_translation() {
    let t = Transform::new(
        Vec3::new(0.0, 1.0, 0.0),
        Quat::from_rotation_z(std::f32::consts::FRAC_PI_2),
        Vec3::ONE,
    );
    // Local +X becomes world +Y after a 90° turn about Z.
    let world = t.local_to_world().transform_point3(Vec3::X);
    assert!((world - Vec3::new(0.0, 2.0, 0.0)).length() < 1e-5);
}

#[test]
fn transform_serialization() {
    let t = Transform::from_translation(Vec3::new(0.5, 0.0, -1.0));
    let json = serde_json::to_string(&t).unwrap();
    let recovered: Transform = serde_json::from_str(&json).unwrap();
    assert_eq!(recovered, t);
}

// ─── Vector Helper Tests ──────────────────────────────────────

#[test]
fn normalize_or_uses_fallback_for_zero() {
    assert_eq!(normalize_or(Vec3::ZERO, Vec3::Y), Vec3::Y);
    let n = normalize_or(Vec3::new(3.0, 0.0, 4.0), Vec3::Y);
    assert!((n.length() - 1.0).abs() < 1e-6);
}

#[test]
fn clamp_length_limits_magnitude() {
    let v = clamp_length(Vec3::new(0.0, 10.0, 0.0), 2.0);
    assert!((v.length() - 2.0).abs() < 1e-6);
    let short = clamp_length(Vec3::new(0.1, 0.0, 0.0), 2.0);
    assert_eq!(short, Vec3::new(0.1, 0.0, 0.0));
}

#[test]
fn flatten_layout() {
    let pts = vec![Vec3::new(1.0, 2.0, 3.0), Vec3::new(4.0, 5.0, 6.0)];
    let flat = flatten(&pts);
    assert_eq!(flat, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    assert_eq!(unflatten(&flat), pts);
}
