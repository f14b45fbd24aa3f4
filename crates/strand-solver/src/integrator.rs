//! Verlet integration step.
//!
//! Writes only `predicted`; committed positions are untouched until the
//! tick commits.

use strand_math::Vec3;

use crate::config::{CableConfig, IntegrationMode};
use crate::state::CableState;

/// Gravity and damping parameters for one integration step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Integrator {
    /// Gravity vector (m/s²).
    pub gravity: Vec3,
    /// Multiplier on the carried velocity.
    pub dampening: f32,
    /// Step scaling of the gravity term.
    pub mode: IntegrationMode,
    /// Scale gravity by node mass.
    pub mass_weighted: bool,
}

impl Integrator {
    /// Builds an integrator from a cable configuration.
    pub fn from_config(config: &CableConfig) -> Self {
        Self {
            gravity: config.gravity_vector(),
            dampening: config.gravity_dampening,
            mode: config.integration,
            mass_weighted: config.mass_weighted_gravity,
        }
    }

    /// Gravity displacement for a node of `mass` over a step of `dt`.
    #[inline]
    pub fn gravity_term(&self, mass: f32, dt: f32) -> Vec3 {
        let step = match self.mode {
            IntegrationMode::Verlet => dt * dt,
            IntegrationMode::Velocity => dt,
        };
        let term = self.gravity * step;
        if self.mass_weighted {
            term * mass
        } else {
            term
        }
    }

    /// `predicted = current + (current - old) * dampening + gravity_term`
    /// for every node.
    pub fn predict(&self, state: &mut CableState, dt: f32) {
        for i in 0..state.node_count {
            let velocity = state.current[i] - state.old[i];
            state.predicted[i] =
                state.current[i] + velocity * self.dampening + self.gravity_term(state.mass[i], dt);
        }
    }
}
