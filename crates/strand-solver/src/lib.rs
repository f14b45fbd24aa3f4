//! # strand-solver
//!
//! Position-based dynamics for a single cable: Verlet integration,
//! iterative distance constraints, obstacle resolution, virtual points,
//! and the publish-on-commit handoff to host threads.
//!
//! ## Key Types
//!
//! - [`Cable`] — one simulated rope and its tick loop
//! - [`CableState`] — SoA node buffers
//! - [`CableConfig`] — discretization, solver and variant settings
//! - [`VirtualPoint`] — host-driven static or dynamic node bindings
//! - [`SharedCable`] / [`CableHandle`] — simulation-side owner and host handle

pub mod cable;
pub mod config;
pub mod constraint;
pub mod integrator;
pub mod shared;
pub mod state;
pub mod virtual_point;

pub use cable::{Cable, TickResult};
pub use config::{CableConfig, CompressionPolicy, IntegrationMode, MassMode};
pub use integrator::Integrator;
pub use shared::{CableChannel, CableFrame, CableHandle, CableInputs, SharedCable};
pub use state::{CableNode, CableState};
pub use virtual_point::{VirtualPoint, VirtualPointFeedback, VirtualPointMode, VirtualPointRegistry};
