//! Publish-on-commit handoff between the host and the simulation thread.
//!
//! The [`SharedCable`] owns its [`Cable`] and is the only writer of node
//! state. Hosts talk to it through cloneable [`CableHandle`]s sharing one
//! [`CableChannel`]:
//!
//! - `inputs` — anchors, obstacles and virtual point commands, drained
//!   once at tick start;
//! - `frame` — committed positions and bookkeeping, written once after
//!   commit.
//!
//! Those two short critical sections are the only locks; the solver
//! passes themselves run unlocked.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use strand_contact::ColliderSet;
use strand_math::Vec3;
use strand_scheduler::TickSubscriber;
use strand_telemetry::{EventKind, EventSender, SimulationEvent};
use strand_types::{CableId, StrandError, StrandResult, VirtualPointId};

use crate::cable::{Cable, TickResult};
use crate::virtual_point::{VirtualPoint, VirtualPointFeedback};

/// Queued virtual point change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VirtualPointCommand {
    Register(VirtualPoint),
    Unregister(VirtualPointId),
    SetTarget(VirtualPointId, Vec3),
}

/// Host inputs waiting for the next tick. `None` means unchanged.
#[derive(Debug, Default)]
pub struct CableInputs {
    pub anchor: Option<Vec3>,
    pub end_anchor: Option<Vec3>,
    pub end_handle_enabled: Option<bool>,
    pub colliders: Option<Arc<ColliderSet>>,
    /// Segment rest lengths to apply, in queue order.
    pub rest_distances: Vec<(usize, f32)>,
    pub commands: Vec<VirtualPointCommand>,
}

/// Committed state published after every tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CableFrame {
    /// Ticks committed so far.
    pub tick: u64,
    /// Simulated seconds so far.
    pub sim_time: f64,
    /// Committed positions in chain order.
    pub positions: Vec<Vec3>,
    /// Positions before the last commit. `positions - old_positions` is
    /// the per-tick displacement.
    pub old_positions: Vec<Vec3>,
    /// Union of the collision locality windows.
    pub neighbours: Vec<usize>,
    /// Released indices accumulated since the host last took them.
    pub released: Vec<usize>,
    /// Virtual point feedback from the last tick.
    pub feedback: Vec<VirtualPointFeedback>,
    /// Result of the last tick.
    pub result: TickResult,
}

/// The two mutex-guarded slots shared by a driver and its handles.
#[derive(Debug, Default)]
pub struct CableChannel {
    inputs: Mutex<CableInputs>,
    frame: Mutex<CableFrame>,
}

/// Simulation-side owner of a cable.
pub struct SharedCable {
    id: CableId,
    name: String,
    cable: Cable,
    channel: Arc<CableChannel>,
    events: Option<EventSender>,
    sim_time: f64,
}

impl SharedCable {
    /// Wraps a cable and publishes its initial frame.
    pub fn new(id: CableId, cable: Cable) -> Self {
        let shared = Self {
            id,
            name: format!("cable-{}", id.0),
            cable,
            channel: Arc::new(CableChannel::default()),
            events: None,
            sim_time: 0.0,
        };
        shared.publish(&TickResult::default(), &[]);
        shared
    }

    /// Emits telemetry for every tick through `sender`.
    pub fn with_events(mut self, sender: EventSender) -> Self {
        self.events = Some(sender);
        self
    }

    pub fn id(&self) -> CableId {
        self.id
    }

    /// A host-side handle. Handles are cheap to clone.
    pub fn handle(&self) -> CableHandle {
        CableHandle { id: self.id, channel: Arc::clone(&self.channel) }
    }

    pub fn cable(&self) -> &Cable {
        &self.cable
    }

    /// Drains host inputs, ticks once, and publishes the result.
    pub fn tick(&mut self, dt: f32) -> TickResult {
        self.drain_inputs();

        self.emit(EventKind::TickBegin { cable: self.id.0, dt, sim_time: self.sim_time });

        let result = self.cable.tick(dt);
        self.sim_time += dt as f64;

        let released = self.cable.last_locality_update().released.clone();
        self.publish(&result, &released);
        self.emit_tick_events(&result, released);

        result
    }

    fn drain_inputs(&mut self) {
        let inputs = std::mem::take(&mut *self.channel.inputs.lock());

        if let Some(anchor) = inputs.anchor {
            self.cable.set_anchor(anchor);
        }
        if let Some(anchor) = inputs.end_anchor {
            self.cable.set_end_anchor(anchor);
        }
        if let Some(enabled) = inputs.end_handle_enabled {
            self.cable.set_end_handle_enabled(enabled);
        }
        if let Some(colliders) = inputs.colliders {
            self.cable.set_colliders(colliders);
        }
        for (index, distance) in inputs.rest_distances {
            if let Err(e) = self.cable.set_rest_distance(index, distance) {
                tracing::warn!(cable = self.id.0, index, error = %e, "rest distance rejected");
            }
        }
        for command in inputs.commands {
            match command {
                VirtualPointCommand::Register(point) => {
                    if let Err(e) = self.cable.register_virtual_point(point) {
                        tracing::warn!(cable = self.id.0, error = %e, "virtual point rejected");
                    }
                }
                VirtualPointCommand::Unregister(id) => {
                    self.cable.unregister_virtual_point(id);
                }
                VirtualPointCommand::SetTarget(id, target) => {
                    self.cable.set_virtual_point_target(id, target);
                }
            }
        }
    }

    fn publish(&self, result: &TickResult, released: &[usize]) {
        let mut frame = self.channel.frame.lock();
        frame.tick = self.cable.tick_count();
        frame.sim_time = self.sim_time;
        frame.positions.clear();
        frame.positions.extend_from_slice(self.cable.positions());
        frame.old_positions.clear();
        frame.old_positions.extend_from_slice(&self.cable.state().old);
        frame.neighbours = self.cable.locality().neighbour_list();
        if !released.is_empty() {
            frame.released.extend_from_slice(released);
            frame.released.sort_unstable();
            frame.released.dedup();
        }
        frame.feedback.clear();
        frame.feedback.extend_from_slice(self.cable.feedback());
        frame.result = result.clone();
    }

    fn emit_tick_events(&self, result: &TickResult, released: Vec<usize>) {
        if self.events.is_none() {
            return;
        }
        if result.collided_nodes > 0 {
            self.emit(EventKind::Collision {
                cable: self.id.0,
                colliding_nodes: result.collided_nodes,
                max_correction: result.contacts.max_correction,
            });
        }
        if !released.is_empty() {
            self.emit(EventKind::LocalityReleased { cable: self.id.0, indices: released });
        }
        for fb in self.cable.feedback() {
            self.emit(EventKind::VirtualPointFeedback {
                point: fb.id.0,
                node: fb.node_index,
                position: fb.actual_position.to_array(),
                velocity: fb.velocity.to_array(),
            });
        }
        self.emit(EventKind::TickEnd { cable: self.id.0, wall_time: result.wall_time });
    }

    fn emit(&self, kind: EventKind) {
        if let Some(events) = &self.events {
            events.emit(SimulationEvent::new(self.cable.tick_count(), kind));
        }
    }
}

impl TickSubscriber for SharedCable {
    fn on_tick(&mut self, dt: f32) {
        self.tick(dt);
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Host-side handle to a [`SharedCable`].
///
/// Setters queue inputs for the next tick; getters read the last
/// published frame. Nothing here blocks on a running tick.
#[derive(Debug, Clone)]
pub struct CableHandle {
    id: CableId,
    channel: Arc<CableChannel>,
}

impl CableHandle {
    pub fn id(&self) -> CableId {
        self.id
    }

    pub fn set_anchor(&self, anchor: Vec3) {
        self.channel.inputs.lock().anchor = Some(anchor);
    }

    pub fn set_end_anchor(&self, anchor: Vec3) {
        self.channel.inputs.lock().end_anchor = Some(anchor);
    }

    pub fn set_end_handle_enabled(&self, enabled: bool) {
        self.channel.inputs.lock().end_handle_enabled = Some(enabled);
    }

    /// Swaps the obstacle set for the next tick.
    pub fn set_colliders(&self, colliders: Arc<ColliderSet>) {
        self.channel.inputs.lock().colliders = Some(colliders);
    }

    /// Queues a new rest length for segment `index`. The index is checked
    /// against the last published node count.
    pub fn set_rest_distance(&self, index: usize, distance: f32) -> StrandResult<()> {
        let count = self.channel.frame.lock().positions.len();
        if index + 1 >= count {
            return Err(StrandError::NodeOutOfRange { index, count });
        }
        if !distance.is_finite() || distance < 0.0 {
            return Err(StrandError::InvalidConfig(format!(
                "rest distance must be >= 0 (got {distance})"
            )));
        }
        self.channel.inputs.lock().rest_distances.push((index, distance));
        Ok(())
    }

    /// Queues a registration. Indices are checked against the last
    /// published node count.
    pub fn register_virtual_point(&self, point: VirtualPoint) -> StrandResult<()> {
        let count = self.channel.frame.lock().positions.len();
        if point.node_index >= count {
            return Err(StrandError::NodeOutOfRange { index: point.node_index, count });
        }
        self.queue(VirtualPointCommand::Register(point));
        Ok(())
    }

    pub fn unregister_virtual_point(&self, id: VirtualPointId) {
        self.queue(VirtualPointCommand::Unregister(id));
    }

    pub fn set_virtual_point_target(&self, id: VirtualPointId, target: Vec3) {
        self.queue(VirtualPointCommand::SetTarget(id, target));
    }

    /// Committed positions from the last tick.
    pub fn positions(&self) -> Vec<Vec3> {
        self.channel.frame.lock().positions.clone()
    }

    /// A copy of the whole last frame.
    pub fn frame(&self) -> CableFrame {
        self.channel.frame.lock().clone()
    }

    pub fn tick(&self) -> u64 {
        self.channel.frame.lock().tick
    }

    pub fn feedback(&self) -> Vec<VirtualPointFeedback> {
        self.channel.frame.lock().feedback.clone()
    }

    /// Takes the released indices accumulated since the last call.
    pub fn take_released(&self) -> Vec<usize> {
        std::mem::take(&mut self.channel.frame.lock().released)
    }

    fn queue(&self, command: VirtualPointCommand) {
        self.channel.inputs.lock().commands.push(command);
    }
}
