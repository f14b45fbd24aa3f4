//! # strand-telemetry
//!
//! Event bus for simulation telemetry. Emits structured events
//! (tick timing, contacts, locality releases, scheduler overruns) that can
//! be consumed by pluggable sinks (in-memory, `tracing`, custom).

pub mod bus;
pub mod events;
pub mod sinks;

pub use bus::{EventBus, EventSender};
pub use events::{EventKind, SimulationEvent};
pub use sinks::{EventSink, TracingSink, VecSink};
