//! # strand-debug
//!
//! Inspection hooks and state snapshots for debugging cable behaviour.
//! Snapshots serialize committed node state to binary for replay.

pub mod hooks;
pub mod snapshot;

pub use hooks::{InspectionHook, TelemetryHook};
pub use snapshot::CableSnapshot;
