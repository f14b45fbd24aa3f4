//! # strand-scheduler
//!
//! Fixed-step background scheduler. One thread measures wall-clock time,
//! splits each cycle into sub-steps and broadcasts `on_tick(dt)` to every
//! registered [`TickSubscriber`], then sleeps out the rest of the frame.
//!
//! ## Key Types
//!
//! - [`FixedStepScheduler`] — lifecycle, pause gate, single step
//! - [`SchedulerConfig`] — frequency, sub-steps, hitch clamp
//! - [`TickSubscriber`] — anything that advances on a tick

pub mod config;
pub mod scheduler;
pub mod subscriber;
pub mod timing;

pub use config::SchedulerConfig;
pub use scheduler::{FixedStepScheduler, SchedulerState};
pub use subscriber::TickSubscriber;
