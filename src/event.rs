//! Event definitions for the simulator.
//!
//! An event is a scheduled future state change: a customer arriving at a
//! stage, or a stage's server finishing the customer in service. Events are
//! immutable once created; rescheduling always means pushing a new event,
//! never editing one already in the queue.

use serde::{Deserialize, Serialize};

use crate::types::{SimTime, StageId};

/// The kind of state change an event triggers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// A customer arrives at a stage.
    ///
    /// Arrivals at stage 0 come from outside the network; arrivals at later
    /// stages are customers finishing transit from the previous stage.
    Arrival,
    /// The stage's server finishes the customer currently in service.
    ServiceCompletion,
}

/// A scheduled `(time, kind, stage)` triple.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// The simulation time at which this event occurs
    pub time: SimTime,
    /// The kind of state change
    pub kind: EventKind,
    /// The stage the change applies to
    pub stage: StageId,
}

impl Event {
    /// Creates a new event.
    pub fn new(time: SimTime, kind: EventKind, stage: StageId) -> Self {
        Self { time, kind, stage }
    }

    /// Creates an arrival event at the given stage.
    pub fn arrival(time: SimTime, stage: StageId) -> Self {
        Self::new(time, EventKind::Arrival, stage)
    }

    /// Creates a service-completion event at the given stage.
    pub fn completion(time: SimTime, stage: StageId) -> Self {
        Self::new(time, EventKind::ServiceCompletion, stage)
    }
}
