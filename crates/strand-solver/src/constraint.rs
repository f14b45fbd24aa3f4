//! Distance constraint between adjacent nodes.
//!
//! The correction is not mass-weighted: both nodes move by the same
//! translation in opposite directions, and the caller re-pins anchors
//! afterwards.

use strand_math::Vec3;

use crate::config::CompressionPolicy;

/// Outcome of one pair evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PairCorrection {
    /// Coincident nodes: no direction to correct along, skipped this pass.
    Degenerate,
    /// Within tolerance for the active policy (e.g. slack under stretch-only).
    Satisfied,
    /// Add `translation` to the first node and subtract it from the second.
    Apply {
        /// Translation applied to the first node.
        translation: Vec3,
        /// Relative error `(distance - rest) / distance` before correction.
        push_pull: f32,
    },
}

/// Evaluates the distance constraint between `p1` and `p2`.
///
/// `direction = p2 - p1`, `push_pull = (|direction| - rest) / |direction|`,
/// `translation = direction * elasticity * push_pull`.
///
/// Both nodes take the full translation, so at elasticity 1 a free pair
/// lands at `|2 * rest - distance|`, not at `rest`. Only a pinned neighbour
/// (which is re-pinned afterwards) makes the correction exact. Chains
/// still converge over repeated passes.
#[inline]
pub fn distance_correction(
    p1: Vec3,
    p2: Vec3,
    rest: f32,
    elasticity: f32,
    policy: CompressionPolicy,
) -> PairCorrection {
    let direction = p2 - p1;
    let distance = direction.length();
    if distance == 0.0 {
        return PairCorrection::Degenerate;
    }

    let push_pull = (distance - rest) / distance;
    let active = match policy {
        CompressionPolicy::StretchOnly => push_pull > 0.0,
        CompressionPolicy::Bidirectional => push_pull != 0.0,
    };
    if !active {
        return PairCorrection::Satisfied;
    }

    PairCorrection::Apply { translation: direction * elasticity * push_pull, push_pull }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compression_ignored_when_stretch_only() {
        let c = distance_correction(
            Vec3::ZERO,
            Vec3::new(0.05, 0.0, 0.0),
            0.1,
            1.0,
            CompressionPolicy::StretchOnly,
        );
        assert_eq!(c, PairCorrection::Satisfied);
    }

    #[test]
    fn compression_pushes_apart_when_bidirectional() {
        let c = distance_correction(
            Vec3::ZERO,
            Vec3::new(0.05, 0.0, 0.0),
            0.1,
            1.0,
            CompressionPolicy::Bidirectional,
        );
        match c {
            PairCorrection::Apply { translation, .. } => assert!(translation.x < 0.0),
            other => panic!("expected a correction, got {other:?}"),
        }
    }

    #[test]
    fn free_pair_lands_at_mirrored_length() {
        let p1 = Vec3::ZERO;
        let p2 = Vec3::new(0.15, 0.0, 0.0);
        let c = distance_correction(p1, p2, 0.1, 1.0, CompressionPolicy::StretchOnly);
        let PairCorrection::Apply { translation, .. } = c else {
            panic!("expected a correction, got {c:?}");
        };
        let d = (p1 + translation).distance(p2 - translation);
        assert!((d - 0.05).abs() < 1e-6, "distance {d}");
    }

    #[test]
    fn coincident_nodes_are_degenerate() {
        let p = Vec3::new(1.0, 2.0, 3.0);
        let c = distance_correction(p, p, 0.1, 1.0, CompressionPolicy::Bidirectional);
        assert_eq!(c, PairCorrection::Degenerate);
    }
}
