//! Virtual points — host-driven bindings on individual nodes.
//!
//! A binding either pins its node to a target (`Static`) or pulls it
//! towards the target with a clamped step (`Dynamic`). The registry keeps
//! only ids, node indices and targets; whatever the host attaches to the
//! cable stays on the host side and is fed through targets and feedback.

use serde::{Deserialize, Serialize};
use strand_math::vector::clamp_length;
use strand_math::Vec3;
use strand_types::VirtualPointId;

use crate::state::CableState;

/// Binding behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VirtualPointMode {
    /// Node is hard-set to the target every pass.
    Static,
    /// Node is pulled towards the target, at most `max_pull_strength` per application.
    Dynamic,
}

/// A binding of one node to a host-supplied target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VirtualPoint {
    pub id: VirtualPointId,
    pub node_index: usize,
    pub mode: VirtualPointMode,
    pub target_position: Vec3,
    #[serde(default)]
    pub max_pull_strength: f32,
}

impl VirtualPoint {
    /// A static pin at `target`.
    pub fn pinned(id: VirtualPointId, node_index: usize, target: Vec3) -> Self {
        Self {
            id,
            node_index,
            mode: VirtualPointMode::Static,
            target_position: target,
            max_pull_strength: 0.0,
        }
    }

    /// A dynamic pull towards `target`, clamped to `max_pull_strength`.
    pub fn pulling(
        id: VirtualPointId,
        node_index: usize,
        target: Vec3,
        max_pull_strength: f32,
    ) -> Self {
        Self {
            id,
            node_index,
            mode: VirtualPointMode::Dynamic,
            target_position: target,
            max_pull_strength,
        }
    }

    /// Applies the binding to a predicted position.
    ///
    /// Dynamic: `pull = (target - predicted) * dt * gain`, clamped in
    /// length to `max_pull_strength`. A zero pull leaves the node alone.
    ///
    /// The solver applies bindings on both nodes of every pair it visits,
    /// so an interior node gets two applications per pass (up to
    /// `2 * max_pull_strength`) while the tail node gets one.
    #[inline]
    pub fn apply(&self, predicted: Vec3, dt: f32, gain: f32) -> Vec3 {
        match self.mode {
            VirtualPointMode::Static => self.target_position,
            VirtualPointMode::Dynamic => {
                let pull = (self.target_position - predicted) * dt * gain;
                if pull.length_squared() == 0.0 {
                    return predicted;
                }
                predicted + clamp_length(pull, self.max_pull_strength.max(0.0))
            }
        }
    }
}

/// Committed node state reported back to the host after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VirtualPointFeedback {
    pub id: VirtualPointId,
    pub node_index: usize,
    /// Committed node position.
    pub actual_position: Vec3,
    /// `(current - old) / dt`.
    pub velocity: Vec3,
}

/// Registration-ordered set of bindings.
#[derive(Debug, Clone, Default)]
pub struct VirtualPointRegistry {
    points: Vec<VirtualPoint>,
}

impl VirtualPointRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a binding, or updates it in place when the id is already
    /// registered (keeping its original position in the order).
    ///
    /// Returns `true` if the id was new.
    pub fn register(&mut self, point: VirtualPoint) -> bool {
        if let Some(existing) = self.points.iter_mut().find(|p| p.id == point.id) {
            *existing = point;
            return false;
        }
        self.points.push(point);
        tracing::debug!(id = point.id.0, node = point.node_index, "virtual point registered");
        true
    }

    /// Removes a binding. Returns `false` if it was not registered.
    pub fn unregister(&mut self, id: VirtualPointId) -> bool {
        let before = self.points.len();
        self.points.retain(|p| p.id != id);
        let removed = self.points.len() != before;
        if removed {
            tracing::debug!(id = id.0, "virtual point unregistered");
        }
        removed
    }

    /// Moves the target of a registered binding.
    pub fn set_target(&mut self, id: VirtualPointId, target: Vec3) -> bool {
        match self.points.iter_mut().find(|p| p.id == id) {
            Some(point) => {
                point.target_position = target;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: VirtualPointId) -> Option<&VirtualPoint> {
        self.points.iter().find(|p| p.id == id)
    }

    /// Bindings in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &VirtualPoint> {
        self.points.iter()
    }

    /// Bindings on `node_index`, in registration order.
    pub fn bound_to(&self, node_index: usize) -> impl Iterator<Item = &VirtualPoint> {
        self.points.iter().filter(move |p| p.node_index == node_index)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Applies every binding on `node_index` to `predicted`, in order.
    pub fn apply_to(&self, node_index: usize, predicted: Vec3, dt: f32, gain: f32) -> Vec3 {
        self.bound_to(node_index)
            .fold(predicted, |p, point| point.apply(p, dt, gain))
    }

    /// Keeps bindings attached to the same nodes after a node is inserted
    /// at `index`.
    pub fn shift_after_insert(&mut self, index: usize) {
        for point in &mut self.points {
            if point.node_index >= index {
                point.node_index += 1;
            }
        }
    }

    /// Drops bindings on a removed node and shifts the ones above it.
    /// Returns the ids that were dropped.
    pub fn shift_after_remove(&mut self, index: usize) -> Vec<VirtualPointId> {
        let dropped: Vec<VirtualPointId> = self
            .points
            .iter()
            .filter(|p| p.node_index == index)
            .map(|p| p.id)
            .collect();
        self.points.retain(|p| p.node_index != index);
        for point in &mut self.points {
            if point.node_index > index {
                point.node_index -= 1;
            }
        }
        dropped
    }

    /// Feedback for every binding from committed state.
    pub fn feedback(&self, state: &CableState, dt: f32) -> Vec<VirtualPointFeedback> {
        let inv_dt = if dt > 0.0 { 1.0 / dt } else { 0.0 };
        self.points
            .iter()
            .filter(|p| p.node_index < state.node_count)
            .map(|p| VirtualPointFeedback {
                id: p.id,
                node_index: p.node_index,
                actual_position: state.current[p.node_index],
                velocity: state.displacement(p.node_index) * inv_dt,
            })
            .collect()
    }
}
