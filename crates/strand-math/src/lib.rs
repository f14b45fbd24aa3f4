//! # strand-math
//!
//! Linear algebra primitives for the Strand cable simulator.
//!
//! Provides:
//! - Re-exports of `glam` types (`Vec3`, `Quat`, `Mat4`)
//! - [`Transform`] — translation/rotation/scale with cached world↔local matrices
//! - Small vector helpers shared by the solver and the collision code

pub mod transform;
pub mod vector;

// Re-export glam types as the canonical math types for Strand.
pub use glam::{Mat3, Mat4, Quat, Vec3};

pub use transform::Transform;
