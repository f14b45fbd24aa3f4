//! Vector helpers shared across crates.

use glam::Vec3;

/// Normalizes `v`, falling back to `fallback` when `v` has no usable length.
#[inline]
pub fn normalize_or(v: Vec3, fallback: Vec3) -> Vec3 {
    let len_sq = v.length_squared();
    if len_sq > 1e-24 && len_sq.is_finite() {
        v / len_sq.sqrt()
    } else {
        fallback
    }
}

/// Scales `v` down so its length does not exceed `max_length`.
#[inline]
pub fn clamp_length(v: Vec3, max_length: f32) -> Vec3 {
    let len = v.length();
    if len > max_length && len > 0.0 {
        v * (max_length / len)
    } else {
        v
    }
}

/// Flattens points into `[x0, y0, z0, x1, ...]`.
pub fn flatten(points: &[Vec3]) -> Vec<f32> {
    let mut out = Vec::with_capacity(points.len() * 3);
    for p in points {
        out.extend_from_slice(&[p.x, p.y, p.z]);
    }
    out
}

/// Inverse of [`flatten`]. Trailing components that do not form a
/// full point are ignored.
pub fn unflatten(flat: &[f32]) -> Vec<Vec3> {
    flat.chunks_exact(3)
        .map(|c| Vec3::new(c[0], c[1], c[2]))
        .collect()
}
