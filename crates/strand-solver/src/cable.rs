//! The cable solver — one rope simulated with position-based dynamics.
//!
//! Each tick runs:
//! 1. **Predict** — Verlet step with gravity into `predicted`
//! 2. **Collide** — resolve every free node against the obstacles once
//! 3. **Passes** — `solver_iterations` sweeps over adjacent pairs:
//!    pin, apply virtual points, distance correction, re-pin, collide
//! 4. **Self-collision** — optional, once per pass
//! 5. **Commit** — `old = current`, `current = predicted`
//! 6. **Bookkeeping** — locality windows and virtual point feedback

use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use strand_contact::{
    ColliderSet, CollisionLocalityTracker, ContactResult, LocalityUpdate, SelfCollisionResult,
};
use strand_math::Vec3;
use strand_types::{StrandError, StrandResult, VirtualPointId};

use crate::config::{CableConfig, MassMode};
use crate::constraint::{distance_correction, PairCorrection};
use crate::integrator::Integrator;
use crate::state::CableState;
use crate::virtual_point::{
    VirtualPoint, VirtualPointFeedback, VirtualPointMode, VirtualPointRegistry,
};

/// Result of one tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickResult {
    /// Constraint passes performed.
    pub passes: u32,
    /// Nodes corrected by an obstacle at least once.
    pub collided_nodes: u32,
    /// Obstacle correction statistics.
    pub contacts: ContactResult,
    /// Self-collision statistics, summed over passes.
    pub self_collision: SelfCollisionResult,
    /// Pair evaluations skipped because both nodes coincided.
    pub skipped_pairs: u32,
    /// Largest relative stretch seen by the constraint solver.
    pub max_stretch: f32,
    /// Largest relative spacing error after commit.
    pub max_spacing_error: f32,
    /// Wall-clock time for this tick (seconds).
    pub wall_time: f64,
}

/// A single simulated cable.
///
/// Owned by exactly one thread while it ticks. Hosts on other threads go
/// through [`SharedCable`](crate::shared::SharedCable).
pub struct Cable {
    config: CableConfig,
    state: CableState,
    integrator: Integrator,
    registry: VirtualPointRegistry,
    locality: CollisionLocalityTracker,
    colliders: Arc<ColliderSet>,
    anchor: Vec3,
    end_anchor: Vec3,
    /// Per-node "hit an obstacle this tick" flags.
    contact_flags: Vec<bool>,
    feedback: Vec<VirtualPointFeedback>,
    last_locality: LocalityUpdate,
    tick_count: u64,
}

impl Cable {
    /// Creates a cable hanging from `anchor`, at rest, with no obstacles.
    ///
    /// The end anchor starts where the last node was laid out.
    pub fn new(config: CableConfig, anchor: Vec3) -> StrandResult<Self> {
        if !anchor.is_finite() {
            return Err(StrandError::InvalidConfig("anchor must be finite".into()));
        }
        let state = CableState::from_anchor(anchor, &config)?;
        let n = state.node_count;
        let end_anchor = state.current[n - 1];

        Ok(Self {
            integrator: Integrator::from_config(&config),
            registry: VirtualPointRegistry::new(),
            locality: CollisionLocalityTracker::new(n, config.locality_extra_range),
            colliders: Arc::new(ColliderSet::empty()),
            contact_flags: vec![false; n],
            feedback: Vec::new(),
            last_locality: LocalityUpdate::default(),
            tick_count: 0,
            anchor,
            end_anchor,
            state,
            config,
        })
    }

    // ─── Accessors ───────────────────────────────────────────

    pub fn config(&self) -> &CableConfig {
        &self.config
    }

    pub fn state(&self) -> &CableState {
        &self.state
    }

    pub fn node_count(&self) -> usize {
        self.state.node_count
    }

    /// Committed positions in chain order.
    pub fn positions(&self) -> &[Vec3] {
        &self.state.current
    }

    pub fn anchor(&self) -> Vec3 {
        self.anchor
    }

    pub fn end_anchor(&self) -> Vec3 {
        self.end_anchor
    }

    pub fn colliders(&self) -> &Arc<ColliderSet> {
        &self.colliders
    }

    pub fn virtual_points(&self) -> &VirtualPointRegistry {
        &self.registry
    }

    /// Feedback published by the last tick.
    pub fn feedback(&self) -> &[VirtualPointFeedback] {
        &self.feedback
    }

    pub fn locality(&self) -> &CollisionLocalityTracker {
        &self.locality
    }

    /// Locality changes produced by the last tick.
    pub fn last_locality_update(&self) -> &LocalityUpdate {
        &self.last_locality
    }

    /// Ticks completed since creation.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn kinetic_energy(&self, dt: f32) -> f64 {
        self.state.kinetic_energy(dt)
    }

    // ─── Host inputs ─────────────────────────────────────────

    pub fn set_anchor(&mut self, anchor: Vec3) {
        self.anchor = anchor;
    }

    pub fn set_end_anchor(&mut self, anchor: Vec3) {
        self.end_anchor = anchor;
    }

    pub fn set_end_handle_enabled(&mut self, enabled: bool) {
        self.config.end_handle_enabled = enabled;
        self.state.set_pins(enabled);
    }

    /// Replaces the obstacle set. Takes effect at the next tick.
    pub fn set_colliders(&mut self, colliders: Arc<ColliderSet>) {
        self.colliders = colliders;
    }

    /// Registers (or updates) a virtual point.
    ///
    /// Returns `true` if the id was new.
    pub fn register_virtual_point(&mut self, point: VirtualPoint) -> StrandResult<bool> {
        if point.node_index >= self.state.node_count {
            return Err(StrandError::NodeOutOfRange {
                index: point.node_index,
                count: self.state.node_count,
            });
        }
        if !point.target_position.is_finite() {
            return Err(StrandError::InvalidConfig(
                "virtual point target must be finite".into(),
            ));
        }
        Ok(self.registry.register(point))
    }

    /// Unregisters a virtual point. Unknown ids are a no-op.
    pub fn unregister_virtual_point(&mut self, id: VirtualPointId) -> bool {
        self.registry.unregister(id)
    }

    pub fn set_virtual_point_target(&mut self, id: VirtualPointId, target: Vec3) -> bool {
        self.registry.set_target(id, target)
    }

    /// Sets the rest length of segment `index` (between `index` and
    /// `index + 1`). Takes effect at the next tick.
    pub fn set_rest_distance(&mut self, index: usize, distance: f32) -> StrandResult<()> {
        self.state.set_rest_distance(index, distance)
    }

    /// Inserts a node at `index` (`0..=node_count`).
    ///
    /// Virtual points follow their nodes; collision windows are reset.
    pub fn insert_node(&mut self, index: usize) -> StrandResult<()> {
        let mass = self.config.mass.node_mass(self.state.node_count + 1);
        self.state.insert_node(index, mass)?;
        self.registry.shift_after_insert(index);
        self.after_resize();
        Ok(())
    }

    /// Removes node `index`. Virtual points bound to it are dropped.
    pub fn remove_node(&mut self, index: usize) -> StrandResult<()> {
        self.state.remove_node(index)?;
        let dropped = self.registry.shift_after_remove(index);
        if !dropped.is_empty() {
            tracing::debug!(index, ?dropped, "virtual points dropped with their node");
        }
        self.after_resize();
        Ok(())
    }

    /// Loads committed positions, e.g. from a snapshot.
    pub fn restore(&mut self, current: &[Vec3], old: &[Vec3]) -> StrandResult<()> {
        self.state.restore(current, old)?;
        self.locality.reset(self.state.node_count);
        Ok(())
    }

    fn after_resize(&mut self) {
        let n = self.state.node_count;
        self.config.node_count = n;
        if let MassMode::Distributed { .. } = self.config.mass {
            let mass = self.config.mass.node_mass(n);
            self.state.mass.iter_mut().for_each(|m| *m = mass);
        }
        self.state.set_pins(self.config.end_handle_enabled);
        self.contact_flags = vec![false; n];
        self.locality.reset(n);
    }

    // ─── Tick ────────────────────────────────────────────────

    /// Advances the cable by `dt` seconds.
    pub fn tick(&mut self, dt: f32) -> TickResult {
        self.tick_observed(dt, |_, _| {})
    }

    /// Like [`tick`](Self::tick), calling `on_pass(pass, max_stretch)`
    /// after every constraint pass.
    pub fn tick_observed<F>(&mut self, dt: f32, mut on_pass: F) -> TickResult
    where
        F: FnMut(u32, f32),
    {
        if !dt.is_finite() || dt < 0.0 {
            tracing::warn!(dt, "ignoring tick with invalid step size");
            return TickResult::default();
        }

        let start = Instant::now();
        let colliders = Arc::clone(&self.colliders);
        let n = self.state.node_count;
        let mut result = TickResult::default();

        self.contact_flags.iter_mut().for_each(|f| *f = false);

        // 1. Predict
        self.integrator.predict(&mut self.state, dt);

        // 2. Obstacle pre-pass
        for i in 0..n {
            self.collide(i, &colliders, &mut result.contacts);
        }

        // 3. Constraint passes
        let elasticity = self.config.elasticity;
        let policy = self.config.compression;
        for pass in 0..self.config.solver_iterations {
            let mut pass_stretch = 0.0f32;

            for i in 0..n - 1 {
                self.pin(i);
                // Interior nodes belong to two pairs and see their bindings twice.
                self.apply_virtual_points(i, dt);
                self.apply_virtual_points(i + 1, dt);

                let rest = self.state.rest_distance[i];
                match distance_correction(
                    self.state.predicted[i],
                    self.state.predicted[i + 1],
                    rest,
                    elasticity,
                    policy,
                ) {
                    PairCorrection::Degenerate => result.skipped_pairs += 1,
                    PairCorrection::Satisfied => {}
                    PairCorrection::Apply { translation, push_pull } => {
                        self.state.predicted[i] += translation;
                        self.state.predicted[i + 1] -= translation;
                        pass_stretch = pass_stretch.max(push_pull.abs());
                    }
                }

                self.pin(i);
                self.collide(i, &colliders, &mut result.contacts);
                self.collide(i + 1, &colliders, &mut result.contacts);
            }

            // 4. Self-collision
            if let Some(self_pass) = &self.config.self_collision {
                let r = self_pass.solve(&mut self.state.predicted, &self.state.inv_mass);
                result.self_collision.tested_pairs += r.tested_pairs;
                result.self_collision.corrections += r.corrections;
            }

            result.max_stretch = result.max_stretch.max(pass_stretch);
            result.passes = pass + 1;
            on_pass(pass, pass_stretch);
        }

        // Final pinning: the last sweep and self-collision may have moved
        // pinned nodes.
        self.enforce_pins();

        // 5. Commit
        self.state.commit(&self.contact_flags);

        // 6. Bookkeeping
        result.collided_nodes = self.contact_flags.iter().filter(|&&f| f).count() as u32;
        match self.locality.update(&self.contact_flags) {
            Ok(update) => self.last_locality = update,
            Err(e) => {
                tracing::warn!(error = %e, "locality update skipped");
                self.last_locality = LocalityUpdate::default();
            }
        }
        self.feedback = self.registry.feedback(&self.state, dt);

        result.max_spacing_error = self.state.max_spacing_error();
        result.wall_time = start.elapsed().as_secs_f64();
        self.tick_count += 1;

        tracing::trace!(
            tick = self.tick_count,
            dt,
            collided = result.collided_nodes,
            max_stretch = result.max_stretch,
            "cable tick"
        );

        result
    }

    /// True for nodes owned by an anchor.
    #[inline]
    fn is_anchored(&self, index: usize) -> bool {
        index == 0 || (self.config.end_handle_enabled && index == self.state.node_count - 1)
    }

    /// Pins node 0 before/after evaluating pair `i`, and the last node
    /// when `i` is the final pair and the end handle is on.
    #[inline]
    fn pin(&mut self, i: usize) {
        let n = self.state.node_count;
        if i == 0 {
            self.state.predicted[0] = self.anchor;
        }
        if self.config.end_handle_enabled && i == n - 2 {
            self.state.predicted[n - 1] = self.end_anchor;
        }
    }

    fn enforce_pins(&mut self) {
        let n = self.state.node_count;
        self.state.predicted[0] = self.anchor;
        if self.config.end_handle_enabled {
            self.state.predicted[n - 1] = self.end_anchor;
        }
        for point in self.registry.iter() {
            if point.mode == VirtualPointMode::Static
                && point.node_index < n
                && !self.is_anchored(point.node_index)
            {
                self.state.predicted[point.node_index] = point.target_position;
            }
        }
    }

    #[inline]
    fn apply_virtual_points(&mut self, index: usize, dt: f32) {
        if self.registry.is_empty() || self.is_anchored(index) {
            return;
        }
        let predicted = self.state.predicted[index];
        self.state.predicted[index] =
            self.registry.apply_to(index, predicted, dt, self.config.dynamic_pull_gain);
    }

    #[inline]
    fn collide(&mut self, index: usize, colliders: &ColliderSet, contacts: &mut ContactResult) {
        if colliders.is_empty() || self.is_anchored(index) {
            return;
        }
        let before = self.state.predicted[index];
        if let Some(after) = colliders.resolve(before, self.config.cable_thickness) {
            self.state.predicted[index] = after;
            self.contact_flags[index] = true;
            contacts.record(before, after);
        }
    }
}
