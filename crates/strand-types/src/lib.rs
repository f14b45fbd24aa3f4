//! # strand-types
//!
//! Shared types, identifiers, error types, and physical constants
//! for the Strand cable simulator.
//!
//! This crate has zero domain logic; it defines the vocabulary
//! that all other Strand crates share.

pub mod constants;
pub mod error;
pub mod ids;

pub use error::{StrandError, StrandResult};
pub use ids::{CableId, SubscriberId, VirtualPointId};
