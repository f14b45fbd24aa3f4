//! Scheduler configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use strand_types::constants;
use strand_types::{StrandError, StrandResult};

/// Frame intervals a single cycle may cover when no explicit limit is set.
const DEFAULT_MAX_FRAME_INTERVALS: f64 = 4.0;

/// Configuration for the fixed-step scheduler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Cycles per second.
    pub target_tick_frequency: u32,

    /// Broadcasts per cycle; each gets `frame_delta / sub_step_count`.
    pub sub_step_count: u32,

    /// Upper bound on the measured frame delta (seconds). `None` means
    /// four frame intervals.
    pub max_frame_delta: Option<f64>,

    /// Wait before the first cycle (seconds).
    pub startup_delay: f64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            target_tick_frequency: constants::DEFAULT_TICK_FREQUENCY,
            sub_step_count: constants::DEFAULT_SUB_STEPS,
            max_frame_delta: None,
            startup_delay: 0.0,
        }
    }
}

impl SchedulerConfig {
    /// Nominal cycle length, `1 / target_tick_frequency`.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.target_tick_frequency.max(1) as f64)
    }

    /// Largest frame delta a cycle will simulate.
    pub fn frame_delta_limit(&self) -> Duration {
        match self.max_frame_delta {
            Some(limit) => Duration::from_secs_f64(limit),
            None => self.frame_interval().mul_f64(DEFAULT_MAX_FRAME_INTERVALS),
        }
    }

    /// Sub-step size for the nominal frame interval.
    pub fn nominal_dt(&self) -> f32 {
        (self.frame_interval().as_secs_f64() / self.sub_step_count.max(1) as f64) as f32
    }

    pub fn startup_delay(&self) -> Duration {
        Duration::from_secs_f64(self.startup_delay)
    }

    /// Checks every field is within range.
    pub fn validate(&self) -> StrandResult<()> {
        if self.target_tick_frequency == 0 {
            return Err(StrandError::InvalidConfig(
                "target_tick_frequency must be > 0".into(),
            ));
        }
        if self.sub_step_count == 0 {
            return Err(StrandError::InvalidConfig("sub_step_count must be >= 1".into()));
        }
        if let Some(limit) = self.max_frame_delta {
            if !limit.is_finite() || limit <= 0.0 {
                return Err(StrandError::InvalidConfig(format!(
                    "max_frame_delta must be > 0 (got {limit})"
                )));
            }
        }
        if !self.startup_delay.is_finite() || self.startup_delay < 0.0 {
            return Err(StrandError::InvalidConfig(format!(
                "startup_delay must be >= 0 (got {})",
                self.startup_delay
            )));
        }
        Ok(())
    }
}
