//! End-to-end tests for the simulation engine and replication driver.
//!
//! These exercise whole replications: the sanity scenario with known
//! traffic intensity, flow conservation through the tandem line, the
//! capacity-overflow condition, and the streamed report.

use tandemsim::{ReplicationDriver, SimConfig, SimError, Simulation, VariateStream};

fn balanced_two_stage(seed: u64) -> SimConfig {
    SimConfig::builder()
        .mean_interarrival(1.0)
        .mean_service(vec![0.5, 0.5])
        .horizon(1000.0)
        .replications(1)
        .seed(seed)
        .build()
        .unwrap()
}

/// With mean interarrival 1.0 and mean service 0.5 at both stages, each
/// server should be busy about half the time. This is a regression check
/// against simulation noise, not an exact-value assertion.
#[test]
fn balanced_scenario_utilization_near_half() {
    let mut driver = ReplicationDriver::new(balanced_two_stage(42));
    let results = driver.run_all().unwrap();
    let result = &results[0];

    assert_eq!(result.stages.len(), 2);
    assert!(result.end_time > 900.0);
    assert!(result.end_time <= 1000.0);

    for stage in &result.stages {
        assert!(
            (0.35..=0.65).contains(&stage.utilization),
            "utilization {} outside the plausible band",
            stage.utilization
        );
        assert!(stage.average_delay >= 0.0);
        assert!(stage.average_delay < 5.0);
        assert!(stage.average_queue_length >= 0.0);
        assert!(stage.customers_served > 800);
    }
}

/// Completions at stage 1 are the only source of arrivals at stage 2, so
/// with immediate transfer the served counts can never cross at any point
/// during the run.
#[test]
fn served_counts_conserved_through_the_line() {
    let config = balanced_two_stage(17);
    let mut stream = VariateStream::new(config.seed);
    let mut sim = Simulation::new(&config, &mut stream);

    while sim.step(&mut stream).unwrap().is_some() {
        let served: Vec<u64> = sim.stages().iter().map(|s| s.customers_served()).collect();
        assert!(
            served[0] >= served[1],
            "stage 2 served {} customers but stage 1 only {}",
            served[1],
            served[0]
        );
    }
}

/// Delays are clock-minus-earlier-arrival with events processed in
/// nondecreasing time order, so the per-stage totals can never go negative.
#[test]
fn delays_are_nonnegative_throughout() {
    let config = SimConfig::builder()
        .mean_interarrival(1.0)
        .mean_service(vec![0.8, 0.8])
        .transit(0.5, 2.0)
        .horizon(500.0)
        .seed(23)
        .build()
        .unwrap();

    let mut stream = VariateStream::new(config.seed);
    let mut sim = Simulation::new(&config, &mut stream);
    while sim.step(&mut stream).unwrap().is_some() {
        for stage in sim.stages() {
            assert!(stage.total_delay() >= 0.0);
        }
    }
}

/// A queue bound of 1 with service times vastly longer than interarrival
/// times must trip the capacity-overflow condition instead of silently
/// truncating the waiting line.
#[test]
fn saturated_stage_overflows_its_bound() {
    let config = SimConfig::builder()
        .mean_interarrival(1.0)
        .mean_service(vec![1.0e6, 1.0])
        .horizon(1000.0)
        .queue_limit(1)
        .seed(5)
        .build()
        .unwrap();

    let mut driver = ReplicationDriver::new(config);
    let err = driver.run_all().unwrap_err();
    match err {
        SimError::CapacityOverflow { stage, at } => {
            assert_eq!(stage, 0);
            assert!(at > 0.0);
        }
        other => panic!("expected a capacity overflow, got {other:?}"),
    }
}

/// The transit window keeps customers between the stages for a while, so
/// the in-transit statistics must come out nonzero.
#[test]
fn transit_window_populates_transit_statistics() {
    let config = SimConfig::builder()
        .mean_interarrival(1.0)
        .mean_service(vec![0.5, 0.5])
        .transit(2.0, 4.0)
        .horizon(1000.0)
        .seed(3)
        .build()
        .unwrap();

    let mut driver = ReplicationDriver::new(config);
    let results = driver.run_all().unwrap();
    let result = &results[0];

    assert!(result.max_in_transit >= 1);
    assert!(result.average_in_transit > 0.0);
    // Roughly one departure per time unit held for ~3 units of transit.
    assert!(result.average_in_transit < 10.0);
    assert!(result.stages[1].customers_served > 0);
}

#[test]
fn report_stream_concatenates_replication_blocks() {
    let config = SimConfig::builder()
        .mean_interarrival(1.0)
        .mean_service(vec![0.5, 0.5])
        .horizon(100.0)
        .replications(3)
        .seed(1)
        .build()
        .unwrap();

    let mut driver = ReplicationDriver::new(config);
    assert_eq!(driver.config().replications, 3);

    let mut buf = Vec::new();
    driver.run_with_report(&mut buf).unwrap();
    let text = String::from_utf8(buf).unwrap();

    assert!(text.contains("Tandem queueing network simulation"));
    for n in 1..=3 {
        assert!(text.contains(&format!("--- Replication {n} ---")));
    }
    assert_eq!(text.matches("Time simulation ended").count(), 3);
}

#[test]
fn json_and_csv_exports_cover_every_replication() {
    let config = SimConfig::builder()
        .mean_interarrival(1.0)
        .mean_service(vec![0.5, 0.5])
        .horizon(100.0)
        .replications(2)
        .seed(1)
        .build()
        .unwrap();

    let mut driver = ReplicationDriver::new(config);
    let results = driver.run_all().unwrap();

    let json = tandemsim::results_to_json(&results).unwrap();
    let restored: Vec<tandemsim::ReplicationResult> = serde_json::from_str(&json).unwrap();
    assert_eq!(results, restored);

    let csv = tandemsim::results_to_csv(&results);
    // Header plus 2 replications * 2 stages.
    assert_eq!(csv.lines().count(), 5);
}
