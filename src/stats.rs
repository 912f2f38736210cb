//! Replication statistics and report output.
//!
//! A [`ReplicationResult`] is the immutable record one replication leaves
//! behind: per-stage point estimates plus the network-wide transit figures.
//! [`ReportWriter`] renders the classic plain-text report: a heading that
//! echoes the input parameters, then one block per replication, all in a
//! single output stream. JSON and CSV exports cover the collected results
//! of a whole run.

use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::config::SimConfig;
use crate::types::SimTime;

/// Point estimates for one stage over one replication.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StageReport {
    /// Mean time customers spent waiting in this stage's queue
    pub average_delay: f64,
    /// Time-weighted mean number of waiting customers
    pub average_queue_length: f64,
    /// Fraction of elapsed time the server was busy
    pub utilization: f64,
    /// Number of customers who entered service
    pub customers_served: u64,
}

/// The statistics record one replication produces.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReplicationResult {
    /// Per-stage estimates, in flow order
    pub stages: Vec<StageReport>,
    /// Time-weighted mean number of customers in transit between stages
    pub average_in_transit: f64,
    /// Highest in-transit count observed
    pub max_in_transit: u64,
    /// Clock value of the last processed event
    pub end_time: SimTime,
}

/// `num / den`, with a zero denominator reported as `NaN` rather than a
/// panic or an infinity.
pub(crate) fn ratio(num: f64, den: f64) -> f64 {
    if den == 0.0 {
        f64::NAN
    } else {
        num / den
    }
}

/// Streams the plain-text report: header once, then a block per
/// replication as each one completes.
pub struct ReportWriter<W: Write> {
    out: W,
    replication: u32,
}

impl<W: Write> ReportWriter<W> {
    /// Wraps an output sink.
    pub fn new(out: W) -> Self {
        Self { out, replication: 0 }
    }

    /// Writes the report heading, echoing the run parameters.
    pub fn write_header(&mut self, config: &SimConfig) -> std::io::Result<()> {
        writeln!(self.out, "Tandem queueing network simulation")?;
        writeln!(self.out)?;
        writeln!(
            self.out,
            "{:<34}{:>12.3}",
            "Mean interarrival time", config.mean_interarrival
        )?;
        for (stage, mean) in config.mean_service.iter().enumerate() {
            writeln!(
                self.out,
                "{:<34}{:>12.3}",
                format!("Mean service time (stage {})", stage + 1),
                mean
            )?;
        }
        writeln!(
            self.out,
            "{:<34}{:>12.3}",
            "Minimum transit time", config.transit.min
        )?;
        writeln!(
            self.out,
            "{:<34}{:>12.3}",
            "Maximum transit time", config.transit.max
        )?;
        writeln!(self.out, "{:<34}{:>12.3}", "Time horizon", config.horizon)?;
        writeln!(
            self.out,
            "{:<34}{:>12}",
            "Replications", config.replications
        )?;
        writeln!(self.out, "{:<34}{:>12}", "Queue limit", config.queue_limit)?;
        writeln!(self.out, "{:<34}{:>12}", "Seed", config.seed)?;
        Ok(())
    }

    /// Writes one replication's block.
    pub fn write_replication(&mut self, result: &ReplicationResult) -> std::io::Result<()> {
        self.replication += 1;
        writeln!(self.out)?;
        writeln!(self.out, "--- Replication {} ---", self.replication)?;
        for (index, stage) in result.stages.iter().enumerate() {
            let n = index + 1;
            writeln!(
                self.out,
                "{:<34}{:>12.3}",
                format!("Average delay in queue ({n})"),
                stage.average_delay
            )?;
            writeln!(
                self.out,
                "{:<34}{:>12.3}",
                format!("Average number in queue ({n})"),
                stage.average_queue_length
            )?;
            writeln!(
                self.out,
                "{:<34}{:>12.3}",
                format!("Server utilization ({n})"),
                stage.utilization
            )?;
        }
        writeln!(
            self.out,
            "{:<34}{:>12.3}",
            "Average number in transit", result.average_in_transit
        )?;
        writeln!(
            self.out,
            "{:<34}{:>12}",
            "Most in transit", result.max_in_transit
        )?;
        writeln!(
            self.out,
            "{:<34}{:>12.3}",
            "Time simulation ended", result.end_time
        )?;
        Ok(())
    }

    /// Unwraps the underlying sink.
    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Serializes the collected results as pretty-printed JSON.
pub fn results_to_json(results: &[ReplicationResult]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(results)
}

/// Renders the collected results as CSV, one row per stage per replication.
pub fn results_to_csv(results: &[ReplicationResult]) -> String {
    let mut csv = String::new();
    csv.push_str(
        "replication,stage,average_delay,average_queue_length,utilization,\
         customers_served,average_in_transit,max_in_transit,end_time\n",
    );

    for (rep, result) in results.iter().enumerate() {
        for (stage, report) in result.stages.iter().enumerate() {
            csv.push_str(&format!(
                "{},{},{:.6},{:.6},{:.6},{},{:.6},{},{:.6}\n",
                rep + 1,
                stage + 1,
                report.average_delay,
                report.average_queue_length,
                report.utilization,
                report.customers_served,
                result.average_in_transit,
                result.max_in_transit,
                result.end_time,
            ));
        }
    }

    csv
}
