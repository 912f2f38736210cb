//! The event-scheduling simulation engine.
//!
//! A [`Simulation`] is the context for exactly one replication: it owns the
//! future-event list, the per-stage state records, the network-wide transit
//! record, and the clock. The main loop repeatedly extracts the earliest
//! pending event, advances the clock to it, integrates the time-weighted
//! accumulators over the elapsed interval, and dispatches the matching
//! transition handler. The loop ends when the next pending event lies past
//! the horizon.
//!
//! Construct a fresh `Simulation` for every replication and consume it with
//! [`Simulation::run`] (or drive it step by step and call
//! [`Simulation::finish`]); nothing is shared between replications except
//! the caller's [`VariateStream`].

use tracing::{debug, trace};

use crate::config::{SimConfig, TransitWindow};
use crate::error::SimError;
use crate::event::{Event, EventKind};
use crate::queue::EventQueue;
use crate::state::{NetworkState, StageState};
use crate::stats::{ratio, ReplicationResult, StageReport};
use crate::types::{SimTime, StageId};
use crate::variate::VariateStream;

/// Operational counters for one replication.
#[derive(Clone, Copy, Debug, Default)]
pub struct EngineCounters {
    /// Events popped and dispatched
    pub events_processed: u64,
    /// Events pushed onto the future-event list
    pub events_scheduled: u64,
    /// Largest number of simultaneously pending events
    pub peak_pending: usize,
}

/// One replication of the tandem network, from time zero to the horizon.
pub struct Simulation {
    clock: SimTime,
    horizon: SimTime,
    mean_interarrival: f64,
    mean_service: Vec<f64>,
    transit: TransitWindow,
    stages: Vec<StageState>,
    network: NetworkState,
    events: EventQueue,
    counters: EngineCounters,
}

impl Simulation {
    /// Creates a fresh replication context: all stages idle, queues empty,
    /// clock at zero, and the bootstrap stage-0 arrival already scheduled
    /// from `stream`.
    pub fn new(config: &SimConfig, stream: &mut VariateStream) -> Self {
        let stages = (0..config.stage_count())
            .map(|stage| StageState::new(stage, config.queue_limit))
            .collect();

        let mut sim = Self {
            clock: 0.0,
            horizon: config.horizon,
            mean_interarrival: config.mean_interarrival,
            mean_service: config.mean_service.clone(),
            transit: config.transit,
            stages,
            network: NetworkState::new(),
            events: EventQueue::with_capacity(config.queue_limit),
            counters: EngineCounters::default(),
        };

        let first = stream.exponential(sim.mean_interarrival);
        sim.schedule(Event::arrival(first, 0));
        sim
    }

    /// Processes the next pending event.
    ///
    /// Returns `Ok(Some(time))` after dispatching the event at `time`,
    /// `Ok(None)` when the earliest pending event lies past the horizon
    /// (the replication is over; the event stays queued and the clock stays
    /// at the last processed event), or an error for a fatal condition.
    pub fn step(&mut self, stream: &mut VariateStream) -> Result<Option<SimTime>, SimError> {
        let next_time = match self.events.peek() {
            Some(event) => event.time,
            None => return Err(SimError::ScheduleExhausted { at: self.clock }),
        };
        if next_time > self.horizon {
            return Ok(None);
        }

        let event = self
            .events
            .pop()
            .ok_or(SimError::ScheduleExhausted { at: self.clock })?;
        self.advance_clock(event.time);
        trace!(time = event.time, kind = ?event.kind, stage = event.stage, "dispatching event");

        match event.kind {
            EventKind::Arrival => self.on_arrival(event.stage, stream)?,
            EventKind::ServiceCompletion => self.on_completion(event.stage, stream),
        }

        self.counters.events_processed += 1;
        Ok(Some(event.time))
    }

    /// Runs the replication to the horizon and extracts its statistics.
    pub fn run(mut self, stream: &mut VariateStream) -> Result<ReplicationResult, SimError> {
        while self.step(stream)?.is_some() {}
        debug!(
            end_time = self.clock,
            events = self.counters.events_processed,
            peak_pending = self.counters.peak_pending,
            "replication finished"
        );
        Ok(self.finish())
    }

    /// Consumes the replication and derives its [`ReplicationResult`].
    ///
    /// All accumulators are flushed at the final clock first, so every area
    /// is the exact integral over `[0, end_time]`. Ratios with a zero
    /// denominator (no customers served, or a zero-length run) come out as
    /// `NaN`.
    pub fn finish(mut self) -> ReplicationResult {
        let end_time = self.clock;
        self.advance_clock(end_time);

        let stages = self
            .stages
            .iter()
            .map(|stage| StageReport {
                average_delay: ratio(stage.total_delay(), stage.customers_served() as f64),
                average_queue_length: ratio(stage.area_queue_length(), end_time),
                utilization: ratio(stage.area_server_busy(), end_time),
                customers_served: stage.customers_served(),
            })
            .collect();

        ReplicationResult {
            stages,
            average_in_transit: ratio(self.network.area_in_transit(), end_time),
            max_in_transit: self.network.max_in_transit(),
            end_time,
        }
    }

    /// Advances the clock, integrating every accumulator over the elapsed
    /// interval before any handler mutates state.
    fn advance_clock(&mut self, to: SimTime) {
        for stage in &mut self.stages {
            stage.flush(to);
        }
        self.network.flush(to);
        self.clock = to;
    }

    fn schedule(&mut self, event: Event) {
        self.events.push(event);
        self.counters.events_scheduled += 1;
        if self.events.len() > self.counters.peak_pending {
            self.counters.peak_pending = self.events.len();
        }
    }

    /// A customer arrives at `stage`.
    fn on_arrival(&mut self, stage: StageId, stream: &mut VariateStream) -> Result<(), SimError> {
        if stage == 0 {
            // Keep the external arrival process alive.
            let next = self.clock + stream.exponential(self.mean_interarrival);
            self.schedule(Event::arrival(next, 0));
        } else {
            self.network.leave_transit();
        }

        if self.stages[stage].is_busy() {
            self.stages[stage].enqueue(self.clock)?;
        } else {
            self.stages[stage].start_service(0.0);
            let done = self.clock + stream.exponential(self.mean_service[stage]);
            self.schedule(Event::completion(done, stage));
        }
        Ok(())
    }

    /// The server at `stage` finishes its customer.
    fn on_completion(&mut self, stage: StageId, stream: &mut VariateStream) {
        if let Some(arrived_at) = self.stages[stage].take_next() {
            let delay = self.clock - arrived_at;
            self.stages[stage].start_service(delay);
            let done = self.clock + stream.exponential(self.mean_service[stage]);
            self.schedule(Event::completion(done, stage));
        } else {
            self.stages[stage].set_idle();
        }

        if stage + 1 < self.stages.len() {
            self.network.enter_transit();
            let arrival = self.clock + stream.uniform_range(self.transit.min, self.transit.max);
            self.schedule(Event::arrival(arrival, stage + 1));
        }
    }

    /// Returns the current clock value.
    pub fn clock(&self) -> SimTime {
        self.clock
    }

    /// Returns the configured horizon.
    pub fn horizon(&self) -> SimTime {
        self.horizon
    }

    /// Returns the per-stage state records, in flow order.
    pub fn stages(&self) -> &[StageState] {
        &self.stages
    }

    /// Returns the network-wide transit record.
    pub fn network(&self) -> &NetworkState {
        &self.network
    }

    /// Returns the operational counters.
    pub fn counters(&self) -> &EngineCounters {
        &self.counters
    }

    /// Returns the number of pending events.
    pub fn pending_events(&self) -> usize {
        self.events.len()
    }
}
