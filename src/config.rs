//! Simulation configuration.
//!
//! A run is described by a [`SimConfig`]: the stochastic parameters of the
//! network (interarrival and service means, transit window), the time
//! horizon, and run-level settings (replication count, queue bound, seed).
//! Configurations come from three places:
//!
//! - the classic whitespace-separated numeric record (two-stage form),
//! - YAML or JSON files (general N-stage form),
//! - the [`SimConfigBuilder`] for programmatic setup.
//!
//! # Record format
//!
//! Six fields: mean interarrival time, mean service time at stage 1, mean
//! service time at stage 2, minimum transit time, maximum transit time,
//! time horizon. The four-field form drops the transit pair, meaning
//! customers transfer between stages immediately.
//!
//! # Configuration file structure
//!
//! ```yaml
//! mean_interarrival: 1.0
//! mean_service: [0.5, 0.5]
//! transit:
//!   min: 1.0
//!   max: 3.0
//! horizon: 1000.0
//! replications: 10
//! queue_limit: 1000
//! seed: 1
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::types::SimTime;

/// Errors that can occur while loading or validating a configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed parameter record: {0}")]
    Record(String),

    #[error("validation error: {0}")]
    Validation(String),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// The transit-delay window between consecutive stages.
///
/// Transit delays are drawn uniformly from `[min, max)`. A `[0, 0]` window
/// is the immediate-transfer case: the downstream arrival is scheduled at
/// the departure instant with zero extra delay. There is no separate code
/// path for it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TransitWindow {
    /// Minimum transit time
    #[serde(default)]
    pub min: SimTime,
    /// Maximum transit time
    #[serde(default)]
    pub max: SimTime,
}

impl TransitWindow {
    /// Creates a window spanning `[min, max)`.
    pub fn new(min: SimTime, max: SimTime) -> Self {
        Self { min, max }
    }

    /// Returns `true` when the window is `[0, 0]` (immediate transfer).
    pub fn is_immediate(&self) -> bool {
        self.min == 0.0 && self.max == 0.0
    }
}

/// Complete description of one simulation run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Mean time between external arrivals at stage 0
    pub mean_interarrival: f64,

    /// Mean service time per stage, in flow order; the length fixes the
    /// number of stages
    pub mean_service: Vec<f64>,

    /// Transit-delay window between consecutive stages
    #[serde(default)]
    pub transit: TransitWindow,

    /// Simulation time horizon; the clock never passes it
    pub horizon: SimTime,

    /// Number of independent replications per run
    #[serde(default = "default_replications")]
    pub replications: u32,

    /// Bound on each stage's waiting line; exceeding it is fatal
    #[serde(default = "default_queue_limit")]
    pub queue_limit: usize,

    /// Seed for the variate stream
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Logging level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_replications() -> u32 {
    10
}

fn default_queue_limit() -> usize {
    1000
}

fn default_seed() -> u64 {
    1
}

fn default_log_level() -> String {
    "info".to_string()
}

impl SimConfig {
    /// Returns a builder for programmatic configuration.
    pub fn builder() -> SimConfigBuilder {
        SimConfigBuilder::new()
    }

    /// Returns the number of stages in the network.
    pub fn stage_count(&self) -> usize {
        self.mean_service.len()
    }

    /// Parses the classic whitespace-separated numeric record.
    ///
    /// Accepts the six-field form (with transit window) or the four-field
    /// form (immediate transfer). Both describe a two-stage network.
    pub fn from_record(record: &str) -> ConfigResult<Self> {
        let fields: Vec<f64> = record
            .split_whitespace()
            .map(|field| {
                field
                    .parse::<f64>()
                    .map_err(|_| ConfigError::Record(format!("invalid numeric field `{field}`")))
            })
            .collect::<ConfigResult<_>>()?;

        let config = match fields[..] {
            [interarrival, service_1, service_2, min, max, horizon] => Self {
                mean_interarrival: interarrival,
                mean_service: vec![service_1, service_2],
                transit: TransitWindow::new(min, max),
                horizon,
                replications: default_replications(),
                queue_limit: default_queue_limit(),
                seed: default_seed(),
                log_level: default_log_level(),
            },
            [interarrival, service_1, service_2, horizon] => Self {
                mean_interarrival: interarrival,
                mean_service: vec![service_1, service_2],
                transit: TransitWindow::default(),
                horizon,
                replications: default_replications(),
                queue_limit: default_queue_limit(),
                seed: default_seed(),
                log_level: default_log_level(),
            },
            _ => {
                return Err(ConfigError::Record(format!(
                    "expected 4 or 6 fields, got {}",
                    fields.len()
                )))
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Loads the classic record from a file.
    pub fn from_record_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_record(&content)
    }

    /// Loads configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> ConfigResult<Self> {
        let config: SimConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Loads configuration from a JSON string.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Loads configuration from a file, choosing the parser by extension:
    /// `.yaml`/`.yml`, `.json`, or anything else as the classic record.
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        match ext.to_lowercase().as_str() {
            "yaml" | "yml" => Self::from_yaml_file(path),
            "json" => Self::from_json_file(path),
            _ => Self::from_record_file(path),
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if !(self.mean_interarrival > 0.0 && self.mean_interarrival.is_finite()) {
            return Err(ConfigError::Validation(format!(
                "mean_interarrival must be positive and finite, got {}",
                self.mean_interarrival
            )));
        }
        if self.mean_service.is_empty() {
            return Err(ConfigError::Validation(
                "mean_service must list at least one stage".to_string(),
            ));
        }
        for (stage, &mean) in self.mean_service.iter().enumerate() {
            if !(mean > 0.0 && mean.is_finite()) {
                return Err(ConfigError::Validation(format!(
                    "mean_service for stage {stage} must be positive and finite, got {mean}"
                )));
            }
        }
        if !(self.transit.min >= 0.0 && self.transit.min.is_finite()) {
            return Err(ConfigError::Validation(format!(
                "transit min must be non-negative and finite, got {}",
                self.transit.min
            )));
        }
        if !(self.transit.max >= self.transit.min && self.transit.max.is_finite()) {
            return Err(ConfigError::Validation(format!(
                "transit max must be at least transit min, got [{}, {}]",
                self.transit.min, self.transit.max
            )));
        }
        if !(self.horizon > 0.0 && self.horizon.is_finite()) {
            return Err(ConfigError::Validation(format!(
                "horizon must be positive and finite, got {}",
                self.horizon
            )));
        }
        if self.replications == 0 {
            return Err(ConfigError::Validation(
                "replications must be at least 1".to_string(),
            ));
        }
        if self.queue_limit == 0 {
            return Err(ConfigError::Validation(
                "queue_limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Converts to YAML string.
    pub fn to_yaml(&self) -> ConfigResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Converts to JSON string.
    pub fn to_json(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Builder for creating a [`SimConfig`] programmatically.
#[derive(Debug)]
pub struct SimConfigBuilder {
    config: SimConfig,
}

impl SimConfigBuilder {
    /// Creates a builder preloaded with the defaults.
    pub fn new() -> Self {
        Self {
            config: SimConfig {
                mean_interarrival: 1.0,
                mean_service: Vec::new(),
                transit: TransitWindow::default(),
                horizon: 0.0,
                replications: default_replications(),
                queue_limit: default_queue_limit(),
                seed: default_seed(),
                log_level: default_log_level(),
            },
        }
    }

    /// Sets the mean interarrival time.
    pub fn mean_interarrival(mut self, mean: f64) -> Self {
        self.config.mean_interarrival = mean;
        self
    }

    /// Sets the per-stage mean service times.
    pub fn mean_service(mut self, means: Vec<f64>) -> Self {
        self.config.mean_service = means;
        self
    }

    /// Sets the transit-delay window.
    pub fn transit(mut self, min: SimTime, max: SimTime) -> Self {
        self.config.transit = TransitWindow::new(min, max);
        self
    }

    /// Sets the time horizon.
    pub fn horizon(mut self, horizon: SimTime) -> Self {
        self.config.horizon = horizon;
        self
    }

    /// Sets the replication count.
    pub fn replications(mut self, replications: u32) -> Self {
        self.config.replications = replications;
        self
    }

    /// Sets the waiting-line bound.
    pub fn queue_limit(mut self, limit: usize) -> Self {
        self.config.queue_limit = limit;
        self
    }

    /// Sets the variate-stream seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    /// Sets the logging level.
    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.config.log_level = level.into();
        self
    }

    /// Builds and validates the configuration.
    pub fn build(self) -> ConfigResult<SimConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for SimConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
