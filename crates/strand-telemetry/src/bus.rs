//! Event bus — broadcast-style event dispatch with pluggable sinks.
//!
//! The bus uses `std::sync::mpsc` for thread-safe event delivery.
//! Producers on other threads (the scheduler loop, cable drivers) hold an
//! [`EventSender`]; the owning thread calls [`EventBus::flush`] to hand
//! queued events to the sinks.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};

use crate::events::SimulationEvent;
use crate::sinks::EventSink;

/// Cloneable producer handle for a bus.
///
/// Honours the bus's enabled flag, so disabling the bus silences every
/// sender at once.
#[derive(Clone)]
pub struct EventSender {
    sender: mpsc::Sender<SimulationEvent>,
    enabled: Arc<AtomicBool>,
}

impl EventSender {
    /// Emit an event. No-op while the bus is disabled or dropped.
    pub fn emit(&self, event: SimulationEvent) {
        if !self.enabled.load(Ordering::Relaxed) {
            return;
        }
        let _ = self.sender.send(event);
    }
}

/// Broadcast event bus for simulation telemetry.
///
/// The producer side (`emit`) sends events to all registered sinks.
/// Each sink processes events independently during `flush`.
pub struct EventBus {
    /// Channel sender, cloned into every `EventSender`.
    sender: mpsc::Sender<SimulationEvent>,
    /// Channel receiver, owned by the bus for dispatching to sinks.
    receiver: mpsc::Receiver<SimulationEvent>,
    /// Registered sinks.
    sinks: Vec<Box<dyn EventSink>>,
    /// Whether the bus is active. Disabled bus is a no-op.
    enabled: Arc<AtomicBool>,
}

impl EventBus {
    /// Creates a new event bus with no sinks.
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            sender,
            receiver,
            sinks: Vec::new(),
            enabled: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Registers a sink to receive events.
    pub fn add_sink(&mut self, sink: Box<dyn EventSink>) {
        self.sinks.push(sink);
    }

    /// Returns a producer handle usable from other threads.
    pub fn sender(&self) -> EventSender {
        EventSender {
            sender: self.sender.clone(),
            enabled: Arc::clone(&self.enabled),
        }
    }

    /// Enables or disables the bus. Disabled bus drops events silently.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    /// Returns true if the bus is active.
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// Emit an event. If the bus is disabled, this is a no-op.
    pub fn emit(&self, event: SimulationEvent) {
        if !self.is_enabled() {
            return;
        }
        let _ = self.sender.send(event);
    }

    /// Flush all pending events to registered sinks.
    ///
    /// Returns the number of events dispatched.
    pub fn flush(&mut self) -> usize {
        let mut count = 0;
        while let Ok(event) = self.receiver.try_recv() {
            for sink in &mut self.sinks {
                sink.handle(&event);
            }
            count += 1;
        }
        count
    }

    /// Flushes remaining events and finalizes every sink.
    pub fn shutdown(&mut self) {
        self.flush();
        for sink in &mut self.sinks {
            sink.finalize();
        }
    }

    /// Returns the number of registered sinks.
    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
