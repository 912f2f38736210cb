//! The replication driver.
//!
//! [`ReplicationDriver`] runs a configured number of independent
//! replications: each gets a fresh [`Simulation`] (state fully reset), while
//! the single [`VariateStream`] continues across all of them, matching one
//! uninterrupted random-number stream for the whole run. The first failed
//! replication aborts the run; there is no partial recovery.

use std::io::Write;

use thiserror::Error;
use tracing::info;

use crate::config::{ConfigError, SimConfig};
use crate::engine::Simulation;
use crate::error::SimError;
use crate::stats::{ReplicationResult, ReportWriter};
use crate::variate::VariateStream;

/// Any failure a whole run can end with.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Sim(#[from] SimError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RunError {
    /// The process exit code reported for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            RunError::Sim(err) => err.exit_code(),
            RunError::Config(_) => 1,
            RunError::Io(_) => 4,
        }
    }
}

/// Runs replications and collects their results.
pub struct ReplicationDriver {
    config: SimConfig,
    stream: VariateStream,
}

impl ReplicationDriver {
    /// Creates a driver for `config`, seeding the variate stream from it.
    pub fn new(config: SimConfig) -> Self {
        let stream = VariateStream::new(config.seed);
        Self { config, stream }
    }

    /// Returns the run configuration.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Runs every replication and returns the collected results.
    pub fn run_all(&mut self) -> Result<Vec<ReplicationResult>, SimError> {
        let mut results = Vec::with_capacity(self.config.replications as usize);
        for replication in 1..=self.config.replications {
            let sim = Simulation::new(&self.config, &mut self.stream);
            let result = sim.run(&mut self.stream)?;
            info!(
                replication,
                end_time = result.end_time,
                "replication complete"
            );
            results.push(result);
        }
        Ok(results)
    }

    /// Runs every replication, streaming the plain-text report to `out` as
    /// each one completes, and returns the collected results.
    pub fn run_with_report<W: Write>(&mut self, out: W) -> Result<Vec<ReplicationResult>, RunError> {
        let mut writer = ReportWriter::new(out);
        writer.write_header(&self.config)?;

        let mut results = Vec::with_capacity(self.config.replications as usize);
        for replication in 1..=self.config.replications {
            let sim = Simulation::new(&self.config, &mut self.stream);
            let result = sim.run(&mut self.stream)?;
            writer.write_replication(&result)?;
            info!(
                replication,
                end_time = result.end_time,
                "replication complete"
            );
            results.push(result);
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(replications: u32) -> SimConfig {
        SimConfig::builder()
            .mean_interarrival(1.0)
            .mean_service(vec![0.5, 0.5])
            .horizon(100.0)
            .replications(replications)
            .seed(99)
            .build()
            .unwrap()
    }

    #[test]
    fn test_run_all_produces_one_result_per_replication() {
        let mut driver = ReplicationDriver::new(config(3));
        let results = driver.run_all().unwrap();
        assert_eq!(results.len(), 3);
    }

    #[test]
    fn test_replications_are_independent_but_stream_continues() {
        let mut driver = ReplicationDriver::new(config(2));
        let results = driver.run_all().unwrap();
        // The stream moved on, so the second replication cannot replay the
        // first one.
        assert_ne!(results[0], results[1]);
    }

    #[test]
    fn test_run_with_report_streams_every_block() {
        let mut driver = ReplicationDriver::new(config(2));
        let mut buf = Vec::new();
        let results = driver.run_with_report(&mut buf).unwrap();
        assert_eq!(results.len(), 2);

        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("Tandem queueing network simulation"));
        assert!(text.contains("--- Replication 1 ---"));
        assert!(text.contains("--- Replication 2 ---"));
    }
}
