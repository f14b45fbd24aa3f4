//! Contact statistics.
//!
//! The resolvers are pure; the solver folds each correction into a
//! [`ContactResult`] so a tick can report how much obstacle work it did.

use serde::{Deserialize, Serialize};
use strand_math::Vec3;

/// Accumulated obstacle corrections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactResult {
    /// Number of corrections applied.
    pub resolved_count: u32,
    /// Largest single correction distance.
    pub max_correction: f32,
    /// Sum of all correction distances.
    pub total_correction: f32,
}

impl ContactResult {
    /// Records a projection from `before` to `after`.
    pub fn record(&mut self, before: Vec3, after: Vec3) {
        let moved = (after - before).length();
        self.resolved_count += 1;
        self.max_correction = self.max_correction.max(moved);
        self.total_correction += moved;
    }
}
