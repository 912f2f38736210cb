//! # Tandemsim
//!
//! A discrete-event simulator for tandem (multi-stage) queueing networks:
//! customers arrive at stage 1, wait for and receive service, transit to
//! stage 2 (optionally with a random transit delay), wait and get served
//! again, then leave. The engine advances its clock strictly by jumping to
//! the next scheduled event and accumulates exact time-weighted statistics
//! (mean queue length, server utilization, mean delay) over a configurable
//! number of independent replications.
//!
//! ## Design Principles
//!
//! - **Event-Scheduling Core**: a time-ordered future-event list drives the
//!   clock; every state change happens inside a per-event-kind transition
//!   handler.
//! - **Exact Time Averages**: state variables are integrated with the
//!   area-under-curve technique; accumulators are flushed before every
//!   mutation, never sampled on a grid.
//! - **Deterministic Replay**: all randomness comes from one seeded variate
//!   stream; the same seed and parameters reproduce a run bit for bit.
//! - **One Context per Replication**: a [`Simulation`] owns all mutable
//!   state for exactly one replication; only the variate stream carries
//!   over between replications.
//!
//! ## Quick Start
//!
//! ```rust
//! use tandemsim::{ReplicationDriver, SimConfig};
//!
//! let config = SimConfig::builder()
//!     .mean_interarrival(1.0)
//!     .mean_service(vec![0.5, 0.5])
//!     .horizon(200.0)
//!     .replications(3)
//!     .seed(7)
//!     .build()
//!     .unwrap();
//!
//! let mut driver = ReplicationDriver::new(config);
//! let results = driver.run_all().unwrap();
//!
//! assert_eq!(results.len(), 3);
//! for result in &results {
//!     assert!(result.stages[0].utilization <= 1.0);
//! }
//! ```
//!
//! ## Configuration Files
//!
//! ```rust,ignore
//! use tandemsim::SimConfig;
//!
//! let config = SimConfig::from_file("tandem.yaml")?;
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod queue;
pub mod runner;
pub mod state;
pub mod stats;
pub mod types;
pub mod variate;

// Re-export commonly used types
pub use config::{ConfigError, SimConfig, SimConfigBuilder, TransitWindow};
pub use engine::{EngineCounters, Simulation};
pub use error::SimError;
pub use event::{Event, EventKind};
pub use queue::EventQueue;
pub use runner::{ReplicationDriver, RunError};
pub use state::{NetworkState, ServerStatus, StageState};
pub use stats::{results_to_csv, results_to_json, ReplicationResult, ReportWriter, StageReport};
pub use types::{SimTime, StageId};
pub use variate::VariateStream;

/// Initialize the tracing subscriber for logging.
///
/// Call this at the start of your program to enable logging.
///
/// # Example
///
/// ```rust,ignore
/// tandemsim::init_logging("info");
/// ```
pub fn init_logging(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}
