//! Cable snapshot serialization for replay and debugging.
//!
//! Snapshots capture committed node state at a point in time. Because
//! velocity is implicit (`current - old`), storing both position buffers
//! is enough to resume the simulation exactly.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use strand_math::vector::{flatten, unflatten};
use strand_math::Vec3;
use strand_solver::{Cable, CableFrame};
use strand_types::{StrandError, StrandResult};

/// A committed cable state snapshot.
///
/// Serialized with `bincode` for compact binary output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CableSnapshot {
    /// Tick index when this snapshot was taken.
    pub timestep: u64,
    /// Simulation time in seconds.
    pub sim_time: f64,
    /// Committed positions (flat: [x0, y0, z0, x1, y1, z1, ...]).
    pub positions: Vec<f32>,
    /// Positions before the last commit, same layout.
    pub old_positions: Vec<f32>,
    /// Number of nodes.
    pub node_count: usize,
}

impl CableSnapshot {
    /// Captures the committed state of `cable`.
    pub fn capture(cable: &Cable, sim_time: f64) -> Self {
        let state = cable.state();
        Self {
            timestep: cable.tick_count(),
            sim_time,
            positions: flatten(&state.current),
            old_positions: flatten(&state.old),
            node_count: state.node_count,
        }
    }

    /// Builds a snapshot from a frame published by a `SharedCable`, so a
    /// host can save state without touching the simulation thread.
    pub fn from_frame(frame: &CableFrame) -> Self {
        Self {
            timestep: frame.tick,
            sim_time: frame.sim_time,
            positions: flatten(&frame.positions),
            old_positions: flatten(&frame.old_positions),
            node_count: frame.positions.len(),
        }
    }

    /// Committed positions as points.
    pub fn current(&self) -> Vec<Vec3> {
        unflatten(&self.positions)
    }

    /// Previous positions as points.
    pub fn old(&self) -> Vec<Vec3> {
        unflatten(&self.old_positions)
    }

    /// Per-node displacement over the last tick.
    pub fn displacements(&self) -> Vec<Vec3> {
        self.current().into_iter().zip(self.old()).map(|(c, o)| c - o).collect()
    }

    /// Loads the snapshot back into a cable with the same node count.
    pub fn restore_into(&self, cable: &mut Cable) -> StrandResult<()> {
        self.check_layout()?;
        cable.restore(&self.current(), &self.old())
    }

    /// Serializes to compact binary format.
    pub fn to_bytes(&self) -> StrandResult<Vec<u8>> {
        bincode::serialize(self)
            .map_err(|e| StrandError::Serialization(format!("snapshot serialization failed: {e}")))
    }

    /// Deserializes from binary format.
    pub fn from_bytes(data: &[u8]) -> StrandResult<Self> {
        let snapshot: Self = bincode::deserialize(data).map_err(|e| {
            StrandError::Serialization(format!("snapshot deserialization failed: {e}"))
        })?;
        snapshot.check_layout()?;
        Ok(snapshot)
    }

    /// Writes the binary form to `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> StrandResult<()> {
        fs::write(path, self.to_bytes()?)?;
        Ok(())
    }

    /// Reads a snapshot written by [`save`](Self::save).
    pub fn load(path: impl AsRef<Path>) -> StrandResult<Self> {
        Self::from_bytes(&fs::read(path)?)
    }

    fn check_layout(&self) -> StrandResult<()> {
        let expected = self.node_count * 3;
        if self.positions.len() != expected || self.old_positions.len() != expected {
            return Err(StrandError::Serialization(format!(
                "snapshot buffers ({}, {}) do not match {} nodes",
                self.positions.len(),
                self.old_positions.len(),
                self.node_count
            )));
        }
        Ok(())
    }
}
