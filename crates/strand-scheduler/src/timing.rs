//! Frame timing arithmetic, kept free of clocks so it can be tested.

use std::time::Duration;

/// Limits a measured frame delta so one hitch never becomes one huge step.
#[inline]
pub fn clamp_frame_delta(measured: Duration, limit: Duration) -> Duration {
    measured.min(limit)
}

/// Splits a frame delta into `sub_steps` equal step sizes (seconds).
#[inline]
pub fn sub_step_dt(frame_delta: Duration, sub_steps: u32) -> f32 {
    (frame_delta.as_secs_f64() / sub_steps.max(1) as f64) as f32
}

/// Time left to sleep in a frame, or `None` when the cycle overran.
#[inline]
pub fn remaining_sleep(elapsed: Duration, interval: Duration) -> Option<Duration> {
    interval.checked_sub(elapsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hitch_is_clamped() {
        let limit = Duration::from_millis(40);
        assert_eq!(clamp_frame_delta(Duration::from_millis(500), limit), limit);
        assert_eq!(
            clamp_frame_delta(Duration::from_millis(12), limit),
            Duration::from_millis(12)
        );
    }

    #[test]
    fn sub_steps_split_evenly() {
        let dt = sub_step_dt(Duration::from_millis(10), 2);
        assert!((dt - 0.005).abs() < 1e-7);
        // Zero sub-steps behaves like one.
        assert!((sub_step_dt(Duration::from_millis(10), 0) - 0.01).abs() < 1e-7);
    }

    #[test]
    fn overrun_has_no_sleep() {
        let interval = Duration::from_millis(10);
        assert_eq!(
            remaining_sleep(Duration::from_millis(4), interval),
            Some(Duration::from_millis(6))
        );
        assert_eq!(remaining_sleep(interval, interval), Some(Duration::ZERO));
        assert_eq!(remaining_sleep(Duration::from_millis(11), interval), None);
    }
}
