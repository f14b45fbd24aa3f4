//! Cable state — SoA buffers for all per-node data.
//!
//! This is the primary mutable data structure during simulation.
//! The solver reads and writes these buffers each tick; the host only
//! ever sees committed `current` positions.

use serde::{Deserialize, Serialize};
use strand_math::vector::normalize_or;
use strand_math::Vec3;
use strand_types::{StrandError, StrandResult};

use crate::config::CableConfig;

/// Read-only view of one node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CableNode {
    /// Committed position.
    pub current_position: Vec3,
    /// Position before the last commit. `current - old` is the velocity.
    pub old_position: Vec3,
    /// Pending position for the tick in progress.
    pub predicted_position: Vec3,
    /// Node mass (kg).
    pub mass: f32,
    /// Target distance to the next node.
    pub rest_distance: f32,
}

/// SoA cable state buffers.
///
/// All arrays have length `node_count`. `inv_mass` is zero for pinned
/// nodes. `rest_distance[i]` is the target spacing between `i` and `i + 1`;
/// the last entry is unused but kept so every buffer has the same length.
#[derive(Debug, Clone, PartialEq)]
pub struct CableState {
    /// Number of nodes.
    pub node_count: usize,

    // ─── Positions ───
    pub current: Vec<Vec3>,
    pub old: Vec<Vec3>,
    pub predicted: Vec<Vec3>,

    // ─── Per-node mass (inverse mass for pinning) ───
    pub mass: Vec<f32>,
    pub inv_mass: Vec<f32>,

    // ─── Constraint targets ───
    pub rest_distance: Vec<f32>,
}

impl CableState {
    /// Lays out a cable from `anchor` along the configured direction,
    /// one rest distance apart, at rest.
    ///
    /// Node 0 is pinned. The last node is pinned too when the end handle
    /// is enabled.
    pub fn from_anchor(anchor: Vec3, config: &CableConfig) -> StrandResult<Self> {
        config.validate()?;

        let n = config.node_count;
        let direction = config.layout_direction();
        let mass = config.node_mass();

        let current: Vec<Vec3> = (0..n)
            .map(|i| anchor + direction * (config.node_distance * i as f32))
            .collect();

        let mut state = Self {
            node_count: n,
            old: current.clone(),
            predicted: current.clone(),
            current,
            mass: vec![mass; n],
            inv_mass: vec![1.0 / mass; n],
            rest_distance: vec![config.node_distance; n],
        };
        state.set_pins(config.end_handle_enabled);
        Ok(state)
    }

    /// Marks node 0 (and optionally the last node) as pinned in the
    /// inverse-mass buffer. Everything else gets `1 / mass`.
    pub fn set_pins(&mut self, end_pinned: bool) {
        for i in 0..self.node_count {
            self.inv_mass[i] = 1.0 / self.mass[i];
        }
        if let Some(first) = self.inv_mass.first_mut() {
            *first = 0.0;
        }
        if end_pinned {
            if let Some(last) = self.inv_mass.last_mut() {
                *last = 0.0;
            }
        }
    }

    /// Returns a view of node `index`.
    pub fn node(&self, index: usize) -> StrandResult<CableNode> {
        self.check_index(index)?;
        Ok(CableNode {
            current_position: self.current[index],
            old_position: self.old[index],
            predicted_position: self.predicted[index],
            mass: self.mass[index],
            rest_distance: self.rest_distance[index],
        })
    }

    /// Iterates over node views in chain order.
    pub fn nodes(&self) -> impl Iterator<Item = CableNode> + '_ {
        (0..self.node_count).map(move |i| CableNode {
            current_position: self.current[i],
            old_position: self.old[i],
            predicted_position: self.predicted[i],
            mass: self.mass[i],
            rest_distance: self.rest_distance[i],
        })
    }

    /// Implicit per-tick displacement `current - old` of node `index`.
    pub fn displacement(&self, index: usize) -> Vec3 {
        self.current[index] - self.old[index]
    }

    /// Sets the rest distance between `index` and `index + 1`.
    ///
    /// `index` must name a segment, so the last node is out of range.
    pub fn set_rest_distance(&mut self, index: usize, distance: f32) -> StrandResult<()> {
        if index + 1 >= self.node_count {
            return Err(StrandError::NodeOutOfRange { index, count: self.node_count });
        }
        if !distance.is_finite() || distance < 0.0 {
            return Err(StrandError::InvalidConfig(format!(
                "rest distance must be >= 0 (got {distance})"
            )));
        }
        self.rest_distance[index] = distance;
        Ok(())
    }

    /// Commit: `old = current`, `current = predicted`.
    ///
    /// Nodes flagged in `settled` also get `old = current` so they carry
    /// no velocity into the next tick.
    pub fn commit(&mut self, settled: &[bool]) {
        for i in 0..self.node_count {
            self.old[i] = self.current[i];
            self.current[i] = self.predicted[i];
            if settled.get(i).copied().unwrap_or(false) {
                self.old[i] = self.current[i];
            }
        }
    }

    /// Inserts a node at `index` (`0..=node_count`), at rest.
    ///
    /// Interior insertions land on the midpoint of the two neighbours;
    /// appending extends the tail by one rest distance along the last
    /// segment; inserting at 0 mirrors that past the head.
    pub fn insert_node(&mut self, index: usize, mass: f32) -> StrandResult<()> {
        if index > self.node_count {
            return Err(StrandError::NodeOutOfRange { index, count: self.node_count });
        }
        if !mass.is_finite() || mass <= 0.0 {
            return Err(StrandError::InvalidConfig(format!("node mass must be > 0 (got {mass})")));
        }

        let n = self.node_count;
        let (position, rest) = if index == 0 {
            let rest = self.rest_distance[0];
            let outward = normalize_or(self.current[0] - self.current[1], Vec3::Y);
            (self.current[0] + outward * rest, rest)
        } else if index == n {
            let rest = self.rest_distance[n - 2];
            let outward = normalize_or(self.current[n - 1] - self.current[n - 2], Vec3::NEG_Y);
            (self.current[n - 1] + outward * rest, rest)
        } else {
            let half = self.rest_distance[index - 1] * 0.5;
            (self.current[index - 1].lerp(self.current[index], 0.5), half)
        };

        self.current.insert(index, position);
        self.old.insert(index, position);
        self.predicted.insert(index, position);
        self.mass.insert(index, mass);
        self.inv_mass.insert(index, 1.0 / mass);

        if index > 0 {
            // Split segment becomes two halves; an appended tail takes the
            // last segment's length.
            self.rest_distance[index - 1] = rest;
        }
        self.rest_distance.insert(index, rest);

        self.node_count += 1;
        Ok(())
    }

    /// Removes node `index`. A cable never drops below two nodes.
    pub fn remove_node(&mut self, index: usize) -> StrandResult<()> {
        self.check_index(index)?;
        if self.node_count <= 2 {
            return Err(StrandError::InvalidConfig(
                "a cable needs at least two nodes".into(),
            ));
        }

        // Merged segment keeps the combined rest length.
        if index > 0 && index < self.node_count - 1 {
            self.rest_distance[index - 1] += self.rest_distance[index];
        }

        self.current.remove(index);
        self.old.remove(index);
        self.predicted.remove(index);
        self.mass.remove(index);
        self.inv_mass.remove(index);
        self.rest_distance.remove(index);

        self.node_count -= 1;
        Ok(())
    }

    /// Loads committed and previous positions back into the buffers.
    ///
    /// Both slices must match the node count.
    pub fn restore(&mut self, current: &[Vec3], old: &[Vec3]) -> StrandResult<()> {
        if current.len() != self.node_count || old.len() != self.node_count {
            return Err(StrandError::InvalidConfig(format!(
                "snapshot node count ({}, {}) != cable node count ({})",
                current.len(),
                old.len(),
                self.node_count
            )));
        }
        self.current.copy_from_slice(current);
        self.old.copy_from_slice(old);
        self.predicted.copy_from_slice(current);
        Ok(())
    }

    /// Compute total kinetic energy: 0.5 * Σ m_i * ||v_i||², with
    /// `v_i = (current - old) / dt`. Pinned nodes are excluded.
    pub fn kinetic_energy(&self, dt: f32) -> f64 {
        if dt <= 0.0 {
            return 0.0;
        }
        let inv_dt = 1.0 / dt as f64;
        let mut energy = 0.0f64;
        for i in 0..self.node_count {
            if self.inv_mass[i] == 0.0 {
                continue;
            }
            let v = self.displacement(i).as_dvec3() * inv_dt;
            energy += 0.5 * self.mass[i] as f64 * v.length_squared();
        }
        energy
    }

    /// Largest relative deviation `|d - rest| / rest` over all segments.
    /// Segments with zero rest length report the absolute distance.
    pub fn max_spacing_error(&self) -> f32 {
        self.current
            .windows(2)
            .zip(&self.rest_distance)
            .map(|(pair, &rest)| {
                let d = pair[0].distance(pair[1]);
                if rest > 0.0 {
                    (d - rest).abs() / rest
                } else {
                    d
                }
            })
            .fold(0.0, f32::max)
    }

    fn check_index(&self, index: usize) -> StrandResult<()> {
        if index >= self.node_count {
            return Err(StrandError::NodeOutOfRange { index, count: self.node_count });
        }
        Ok(())
    }
}
