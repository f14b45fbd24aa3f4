//! Pairwise self-collision for a single cable.
//!
//! Every node pair further apart along the chain than `exclusion_depth`
//! is tested against a minimum separation of `2 * min_radius`; overlapping
//! pairs are pushed apart along their connecting line with an
//! inverse-mass-weighted split, so pinned nodes (weight 0) stay put.
//!
//! This is a proximity pass, not a swept test. It is off unless the cable
//! configuration enables it.

use serde::{Deserialize, Serialize};
use strand_math::Vec3;

/// Self-collision parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelfCollisionPass {
    /// Collision radius around each node.
    pub min_radius: f32,
    /// Pairs with `j - i <= exclusion_depth` are chain neighbours and skipped.
    pub exclusion_depth: usize,
}

/// Result of one self-collision pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelfCollisionResult {
    /// Number of pairs tested after exclusion.
    pub tested_pairs: u32,
    /// Number of pairs pushed apart.
    pub corrections: u32,
}

impl Default for SelfCollisionPass {
    fn default() -> Self {
        Self { min_radius: 0.02, exclusion_depth: 2 }
    }
}

impl SelfCollisionPass {
    /// Creates a pass with the given radius and exclusion depth.
    pub fn new(min_radius: f32, exclusion_depth: usize) -> Self {
        Self { min_radius, exclusion_depth }
    }

    /// Pushes overlapping node pairs apart.
    ///
    /// `inv_mass` must have the same length as `positions`.
    pub fn solve(&self, positions: &mut [Vec3], inv_mass: &[f32]) -> SelfCollisionResult {
        let n = positions.len().min(inv_mass.len());
        let min_distance = self.min_radius * 2.0;
        let mut result = SelfCollisionResult::default();

        for i in 0..n {
            for j in (i + self.exclusion_depth + 1)..n {
                result.tested_pairs += 1;

                let delta = positions[j] - positions[i];
                let dist = delta.length();
                if dist >= min_distance || dist < 1e-10 {
                    continue;
                }

                let w_i = inv_mass[i];
                let w_j = inv_mass[j];
                let w_sum = w_i + w_j;
                if w_sum < 1e-10 {
                    continue; // Both pinned
                }

                let direction = delta / dist;
                let overlap = min_distance - dist;

                positions[i] -= direction * overlap * (w_i / w_sum);
                positions[j] += direction * overlap * (w_j / w_sum);

                result.corrections += 1;
            }
        }

        result
    }
}
