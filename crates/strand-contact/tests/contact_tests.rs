//! Integration tests for strand-contact.

use strand_contact::locality::CollisionLocalityTracker;
use strand_contact::self_collision::SelfCollisionPass;
use strand_contact::snapshot::{BoxDescriptor, ColliderSet, SphereDescriptor};
use strand_contact::{BoxSnapshot, ContactResult, SphereSnapshot};
use strand_math::{Quat, Vec3};
use strand_types::StrandError;

// ─── Sphere Tests ─────────────────────────────────────────────

#[test]
fn sphere_outside_is_untouched() {
    let sphere = SphereSnapshot::new(Vec3::ZERO, 1.0);
    assert!(sphere.resolve(Vec3::new(0.0, 1.2, 0.0), 0.1).is_none());
}

#[test]
fn sphere_projects_onto_inflated_shell_along_ray() {
    let sphere = SphereSnapshot::new(Vec3::new(1.0, 0.0, 0.0), 0.5);
    let thickness = 0.1;
    let inside = Vec3::new(1.1, 0.2, -0.1);
    let corrected = sphere.resolve(inside, thickness).unwrap();

    let dist = (corrected - sphere.center).length();
    assert!((dist - 0.55).abs() < 1e-5, "dist = {dist}");

    let ray_in = (inside - sphere.center).normalize();
    let ray_out = (corrected - sphere.center).normalize();
    assert!(ray_in.dot(ray_out) > 0.99999);
}

#[test]
fn sphere_within_thickness_band_collides() {
    // Outside the radius but inside radius + thickness / 2.
    let sphere = SphereSnapshot::new(Vec3::ZERO, 1.0);
    let corrected = sphere.resolve(Vec3::new(0.0, 1.01, 0.0), 0.05).unwrap();
    assert!((corrected.y - 1.025).abs() < 1e-6);
}

#[test]
fn sphere_center_pushes_up() {
    let sphere = SphereSnapshot::new(Vec3::ZERO, 1.0);
    let corrected = sphere.resolve(Vec3::ZERO, 0.0).unwrap();
    assert_eq!(corrected, Vec3::new(0.0, 1.0, 0.0));
}

// ─── Box Tests ────────────────────────────────────────────────

#[test]
fn box_outside_on_one_axis_is_untouched() {
    let b = BoxSnapshot::new(Vec3::ZERO, Quat::IDENTITY, Vec3::ONE, Vec3::splat(2.0));
    assert!(b.resolve(Vec3::new(0.0, 1.5, 0.0), 0.1).is_none());
    assert!(b.resolve(Vec3::new(1.2, 0.0, 0.5), 0.1).is_none());
}

#[test]
fn box_pushes_to_nearest_face_plus_half_thickness() {
    let b = BoxSnapshot::new(Vec3::ZERO, Quat::IDENTITY, Vec3::ONE, Vec3::splat(2.0));
    let thickness = 0.1;
    // Closest face is +Y (0.2 away), the others are 0.9+ away.
    let corrected = b.resolve(Vec3::new(0.1, 0.8, -0.05), thickness).unwrap();
    assert!((corrected.y - 1.05).abs() < 1e-5);
    assert!((corrected.x - 0.1).abs() < 1e-6);
    assert!((corrected.z + 0.05).abs() < 1e-6);
}

#[test]
fn box_negative_side_uses_sign() {
    let b = BoxSnapshot::new(Vec3::ZERO, Quat::IDENTITY, Vec3::ONE, Vec3::splat(2.0));
    let corrected = b.resolve(Vec3::new(-0.95, 0.0, 0.1), 0.0).unwrap();
    assert!((corrected.x + 1.0).abs() < 1e-6);
}

#[test]
fn box_exact_tie_prefers_x() {
    let b = BoxSnapshot::new(Vec3::ZERO, Quat::IDENTITY, Vec3::ONE, Vec3::splat(2.0));
    let corrected = b.resolve(Vec3::new(0.5, 0.5, 0.5), 0.0).unwrap();
    assert!((corrected.x - 1.0).abs() < 1e-6);
    assert!((corrected.y - 0.5).abs() < 1e-6);
    assert!((corrected.z - 0.5).abs() < 1e-6);
}

#[test]
fn scaled_box_weighs_penetration_by_scale() {
    // Local penetration is equal on x and y, but x is stretched 4x so
    // pushing out through y is the shorter world-space move.
    let b = BoxSnapshot::new(Vec3::ZERO, Quat::IDENTITY, Vec3::new(4.0, 1.0, 1.0), Vec3::splat(1.0));
    let world = Vec3::new(4.0 * 0.3, 0.3, 0.0);
    let corrected = b.resolve(world, 0.0).unwrap();
    assert!((corrected.y - 0.5).abs() < 1e-5);
    assert!((corrected.x - 1.2).abs() < 1e-5);
}

#[test]
fn rotated_box_resolves_in_local_space() {
    let rotation = Quat::from_rotation_z(std::f32::consts::FRAC_PI_4);
    let b = BoxSnapshot::new(Vec3::new(0.0, 2.0, 0.0), rotation, Vec3::ONE, Vec3::splat(1.0));
    let inside = Vec3::new(0.0, 2.1, 0.0);
    let corrected = b.resolve(inside, 0.0).unwrap();
    let nudged = corrected + (corrected - inside).normalize() * 1e-3;
    assert!(!b.contains(nudged, 0.0));
    let local = b.world_to_local.transform_point3(corrected);
    let on_face = (local.x.abs() - 0.5).abs() < 1e-5
        || (local.y.abs() - 0.5).abs() < 1e-5
        || (local.z.abs() - 0.5).abs() < 1e-5;
    assert!(on_face, "local = {local:?}");
}

// ─── Collider Set Tests ───────────────────────────────────────

#[test]
fn empty_set_yields_no_corrections() {
    let set = ColliderSet::empty();
    assert!(set.is_empty());
    assert!(set.resolve(Vec3::ZERO, 0.1).is_none());
}

#[test]
fn set_snapshots_descriptors() {
    let set = ColliderSet::from_descriptors(
        &[SphereDescriptor { center: Vec3::new(0.0, -1.0, 0.0), radius: 0.3 }],
        &[BoxDescriptor::axis_aligned(Vec3::new(2.0, 0.0, 0.0), Vec3::ONE)],
    )
    .unwrap();
    assert_eq!(set.len(), 2);
    assert_eq!(set.boxes()[0].half_extents, Vec3::splat(0.5));

    let hit = set.resolve(Vec3::new(0.0, -1.1, 0.0), 0.0).unwrap();
    assert!((hit.y + 1.3).abs() < 1e-5);
}

#[test]
fn invalid_descriptors_are_rejected() {
    let err = ColliderSet::from_descriptors(
        &[SphereDescriptor { center: Vec3::ZERO, radius: -1.0 }],
        &[],
    )
    .unwrap_err();
    assert!(matches!(err, StrandError::InvalidCollider(_)));

    let zero_scale = BoxDescriptor {
        center: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::new(1.0, 0.0, 1.0),
        size: Vec3::ONE,
    };
    assert!(ColliderSet::from_descriptors(&[], &[zero_scale]).is_err());
}

#[test]
fn box_descriptor_defaults_from_json() {
    let json = r#"{ "center": [0.0, 1.0, 0.0], "size": [1.0, 2.0, 1.0] }"#;
    let desc: BoxDescriptor = serde_json::from_str(json).unwrap();
    assert_eq!(desc.scale, Vec3::ONE);
    assert_eq!(desc.rotation, Quat::IDENTITY);
}

#[test]
fn contact_result_accumulates() {
    let mut result = ContactResult::default();
    result.record(Vec3::ZERO, Vec3::new(0.0, 0.3, 0.0));
    result.record(Vec3::ZERO, Vec3::new(0.1, 0.0, 0.0));
    assert_eq!(result.resolved_count, 2);
    assert!((result.max_correction - 0.3).abs() < 1e-6);
    assert!((result.total_correction - 0.4).abs() < 1e-6);
}

// ─── Locality Tests ───────────────────────────────────────────

#[test]
fn locality_window_is_clamped() {
    let mut tracker = CollisionLocalityTracker::new(40, 5);
    tracker.add_collision(2).unwrap();
    assert_eq!(tracker.neighbour_list(), (0..=7).collect::<Vec<_>>());

    let mut tail = CollisionLocalityTracker::new(40, 5);
    tail.add_collision(37).unwrap();
    assert_eq!(tail.neighbour_list(), (32..=39).collect::<Vec<_>>());
}

#[test]
fn locality_symmetry_for_every_index() {
    for k in 0..40 {
        let mut tracker = CollisionLocalityTracker::new(40, 5);
        tracker.add_collision(k).unwrap();
        let expected: Vec<usize> = (k.saturating_sub(5)..=(k + 5).min(39)).collect();
        assert_eq!(tracker.neighbour_list(), expected);

        let released = tracker.remove_collision(k);
        assert_eq!(released, expected);
        assert!(tracker.neighbours().is_empty());
    }
}

#[test]
fn locality_removal_keeps_shared_indices() {
    let mut tracker = CollisionLocalityTracker::new(40, 5);
    tracker.add_collision(10).unwrap();
    tracker.add_collision(14).unwrap();
    assert_eq!(tracker.neighbour_list(), (5..=19).collect::<Vec<_>>());

    let released = tracker.remove_collision(10);
    assert_eq!(released, vec![5, 6, 7, 8]);
    assert_eq!(tracker.neighbour_list(), (9..=19).collect::<Vec<_>>());
}

#[test]
fn locality_add_is_idempotent_and_bounds_checked() {
    let mut tracker = CollisionLocalityTracker::new(10, 5);
    assert!(tracker.add_collision(3).unwrap());
    assert!(!tracker.add_collision(3).unwrap());
    assert_eq!(tracker.colliding_count(), 1);

    let err = tracker.add_collision(10).unwrap_err();
    assert!(matches!(err, StrandError::NodeOutOfRange { index: 10, count: 10 }));
    assert!(tracker.remove_collision(7).is_empty());
}

#[test]
fn locality_update_reports_transitions() {
    let mut tracker = CollisionLocalityTracker::new(20, 2);
    let mut flags = vec![false; 20];
    flags[5] = true;
    flags[6] = true;

    let first = tracker.update(&flags).unwrap();
    assert_eq!(first.entered, vec![5, 6]);
    assert!(first.exited.is_empty());
    assert_eq!(tracker.neighbour_list(), (3..=8).collect::<Vec<_>>());

    flags[5] = false;
    let second = tracker.update(&flags).unwrap();
    assert!(second.entered.is_empty());
    assert_eq!(second.exited, vec![5]);
    assert_eq!(second.released, vec![3]);

    let third = tracker.update(&flags).unwrap();
    assert!(third.is_empty());
}

#[test]
fn locality_update_rejects_wrong_length() {
    let mut tracker = CollisionLocalityTracker::new(5, 1);
    assert!(tracker.update(&[false; 4]).is_err());
}

// ─── Self Collision Tests ─────────────────────────────────────

#[test]
fn self_collision_skips_chain_neighbours() {
    let mut positions = vec![Vec3::ZERO, Vec3::new(0.01, 0.0, 0.0), Vec3::new(0.02, 0.0, 0.0)];
    let inv_mass = vec![1.0; 3];
    let pass = SelfCollisionPass::new(0.05, 2);
    let result = pass.solve(&mut positions, &inv_mass);
    assert_eq!(result.tested_pairs, 0);
    assert_eq!(result.corrections, 0);
}

#[test]
fn self_collision_separates_distant_nodes() {
    let mut positions = vec![
        Vec3::ZERO,
        Vec3::new(0.0, -1.0, 0.0),
        Vec3::new(0.0, -2.0, 0.0),
        Vec3::new(0.02, 0.0, 0.0),
    ];
    let inv_mass = vec![1.0; 4];
    let pass = SelfCollisionPass::new(0.05, 1);
    let result = pass.solve(&mut positions, &inv_mass);
    assert_eq!(result.corrections, 1);
    assert!((positions[3] - positions[0]).length() >= 0.1 - 1e-5);
}

#[test]
fn self_collision_respects_pins() {
    let mut positions = vec![Vec3::ZERO, Vec3::new(5.0, 0.0, 0.0), Vec3::new(0.0, 0.05, 0.0)];
    let inv_mass = vec![0.0, 1.0, 1.0];
    let pass = SelfCollisionPass::new(0.1, 1);
    pass.solve(&mut positions, &inv_mass);
    assert_eq!(positions[0], Vec3::ZERO);
    assert!((positions[2].y - 0.2).abs() < 1e-5);
}
