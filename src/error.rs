//! Fatal simulation errors.
//!
//! The engine never calls `exit()`; a replication that hits one of these
//! conditions returns the error up to the replication driver, which aborts
//! the run. Each condition maps to its own process exit code at the binary
//! level.

use thiserror::Error;

use crate::types::{SimTime, StageId};

/// A condition that ends a replication without a result.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum SimError {
    /// A stage's waiting line would exceed its configured bound.
    #[error("queue overflow at stage {stage} at time {at:.3}")]
    CapacityOverflow {
        /// The stage whose queue overflowed
        stage: StageId,
        /// The clock value when the overflowing arrival occurred
        at: SimTime,
    },

    /// The event list emptied before the clock reached the horizon.
    ///
    /// A live network always has a pending arrival or completion scheduled
    /// somewhere; hitting this means a transition handler failed to
    /// reschedule.
    #[error("event schedule exhausted at time {at:.3} before the horizon")]
    ScheduleExhausted {
        /// The clock value when the event list came up empty
        at: SimTime,
    },
}

impl SimError {
    /// The process exit code reported for this condition.
    pub fn exit_code(&self) -> i32 {
        match self {
            SimError::CapacityOverflow { .. } => 2,
            SimError::ScheduleExhausted { .. } => 3,
        }
    }
}
