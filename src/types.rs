//! Core type definitions for the simulator.
//!
//! This module defines the fundamental types used throughout the engine.

/// Simulation time, in model time units (e.g. minutes).
///
/// The clock, every event timestamp, and every time-weighted accumulator
/// share this representation, so a single timeline covers the whole network.
pub type SimTime = f64;

/// Index of a stage in the tandem network.
///
/// Stages are numbered from 0 in flow order: customers enter at stage 0 and
/// leave after the last stage. `StageId` indexes directly into the engine's
/// stage sequence.
pub type StageId = usize;
