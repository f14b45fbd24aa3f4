//! Tick subscriber trait.

/// Something the scheduler advances.
///
/// Subscribers run on the scheduler thread, one after another, all with
/// the same `dt` in a given sub-step.
pub trait TickSubscriber: Send {
    /// Advance by `dt` seconds.
    fn on_tick(&mut self, dt: f32);

    /// Returns a human-readable name for logs.
    fn name(&self) -> &str {
        "subscriber"
    }
}

impl<F> TickSubscriber for F
where
    F: FnMut(f32) + Send,
{
    fn on_tick(&mut self, dt: f32) {
        self(dt)
    }

    fn name(&self) -> &str {
        "closure"
    }
}
