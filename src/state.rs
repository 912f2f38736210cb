//! Per-stage and network-wide simulation state.
//!
//! Each stage of the tandem network is one `StageState`: a server that is
//! either idle or busy, a FIFO of the arrival timestamps of waiting
//! customers, and the accumulators for its time-weighted statistics.
//! `NetworkState` tracks the one quantity that belongs to no single stage:
//! the number of customers in transit between stages.
//!
//! # Time-weighted accumulation
//!
//! Averages like "mean queue length" are integrals of a state variable over
//! elapsed time, divided by total time. Rather than discretize, each record
//! keeps an area accumulator and a `last_update` marker; `flush(now)` adds
//! `value * (now - last_update)` to the area and moves the marker. The
//! caller must flush *before* mutating any integrated variable, so each
//! piece of area is computed with the value that actually held over the
//! interval.

use std::collections::VecDeque;

use crate::error::SimError;
use crate::types::{SimTime, StageId};

/// Whether a stage's server is serving a customer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ServerStatus {
    Idle,
    Busy,
}

/// One queue+server unit of the tandem network.
#[derive(Clone, Debug)]
pub struct StageState {
    id: StageId,
    status: ServerStatus,
    /// Arrival timestamps of waiting customers, oldest first.
    waiting: VecDeque<SimTime>,
    limit: usize,
    total_delay: f64,
    customers_served: u64,
    area_queue_length: f64,
    area_server_busy: f64,
    last_update: SimTime,
}

impl StageState {
    /// Creates a fresh stage: idle server, empty queue, zeroed accumulators.
    pub fn new(id: StageId, limit: usize) -> Self {
        Self {
            id,
            status: ServerStatus::Idle,
            waiting: VecDeque::new(),
            limit,
            total_delay: 0.0,
            customers_served: 0,
            area_queue_length: 0.0,
            area_server_busy: 0.0,
            last_update: 0.0,
        }
    }

    /// Integrates queue length and server status up to `now`.
    ///
    /// Must be called before any mutation of the queue or the server
    /// status; calling it again at the same `now` is a no-op.
    pub fn flush(&mut self, now: SimTime) {
        let elapsed = now - self.last_update;
        self.area_queue_length += self.waiting.len() as f64 * elapsed;
        if self.status == ServerStatus::Busy {
            self.area_server_busy += elapsed;
        }
        self.last_update = now;
    }

    /// Appends an arriving customer's timestamp to the waiting line.
    ///
    /// Fails with [`SimError::CapacityOverflow`] when the line is already
    /// at its configured bound; the arrival is rejected, not truncated.
    pub fn enqueue(&mut self, arrived_at: SimTime) -> Result<(), SimError> {
        if self.waiting.len() >= self.limit {
            return Err(SimError::CapacityOverflow {
                stage: self.id,
                at: arrived_at,
            });
        }
        self.waiting.push_back(arrived_at);
        Ok(())
    }

    /// Removes and returns the oldest waiting customer's arrival timestamp.
    pub fn take_next(&mut self) -> Option<SimTime> {
        self.waiting.pop_front()
    }

    /// Puts a customer into service: records their queueing delay, counts
    /// them as served, and marks the server busy.
    pub fn start_service(&mut self, delay: SimTime) {
        self.total_delay += delay;
        self.customers_served += 1;
        self.status = ServerStatus::Busy;
    }

    /// Marks the server idle.
    pub fn set_idle(&mut self) {
        self.status = ServerStatus::Idle;
    }

    /// Returns `true` while a customer is in service.
    pub fn is_busy(&self) -> bool {
        self.status == ServerStatus::Busy
    }

    /// Returns the current server status.
    pub fn status(&self) -> ServerStatus {
        self.status
    }

    /// Returns the number of customers waiting (excluding any in service).
    pub fn queue_len(&self) -> usize {
        self.waiting.len()
    }

    /// Returns the number of customers who have entered service.
    pub fn customers_served(&self) -> u64 {
        self.customers_served
    }

    /// Returns the sum of all recorded queueing delays.
    pub fn total_delay(&self) -> f64 {
        self.total_delay
    }

    /// Returns the integral of queue length over time, up to the last flush.
    pub fn area_queue_length(&self) -> f64 {
        self.area_queue_length
    }

    /// Returns the integral of the busy indicator over time, up to the last
    /// flush.
    pub fn area_server_busy(&self) -> f64 {
        self.area_server_busy
    }
}

/// Network-wide state: customers in transit between stages.
#[derive(Clone, Debug, Default)]
pub struct NetworkState {
    in_transit: u64,
    max_in_transit: u64,
    area_in_transit: f64,
    last_update: SimTime,
}

impl NetworkState {
    /// Creates a fresh network record with nothing in transit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Integrates the in-transit count up to `now`.
    ///
    /// Same contract as [`StageState::flush`]: call before mutating the
    /// count.
    pub fn flush(&mut self, now: SimTime) {
        let elapsed = now - self.last_update;
        self.area_in_transit += self.in_transit as f64 * elapsed;
        self.last_update = now;
    }

    /// Records a customer departing one stage for the next.
    pub fn enter_transit(&mut self) {
        self.in_transit += 1;
        if self.in_transit > self.max_in_transit {
            self.max_in_transit = self.in_transit;
        }
    }

    /// Records a customer arriving at the downstream stage.
    pub fn leave_transit(&mut self) {
        debug_assert!(self.in_transit > 0, "transit count underflow");
        self.in_transit -= 1;
    }

    /// Returns the number of customers currently in transit.
    pub fn in_transit(&self) -> u64 {
        self.in_transit
    }

    /// Returns the highest in-transit count seen so far.
    pub fn max_in_transit(&self) -> u64 {
        self.max_in_transit
    }

    /// Returns the integral of the in-transit count over time, up to the
    /// last flush.
    pub fn area_in_transit(&self) -> f64 {
        self.area_in_transit
    }
}
