//! Engine configuration
//!
//! # Configuration sources (later ones win)
//!
//! 1. [`EngineConfig::default`]
//! 2. A TOML file, see [`EngineConfig::load_from_file`]
//! 3. Environment variables, see [`EngineConfig::with_env_overrides`]
//!
//! # Example config file
//!
//! ```toml
//! isolate_panics = true
//! enforce_poll_interval = false
//! fault_channel_capacity = 256
//! worker_threads = 4
//! log_transitions = true
//! ```

use crate::error::{PositionEventsError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable overriding [`EngineConfig::isolate_panics`]
pub const ENV_ISOLATE_PANICS: &str = "POSITION_EVENTS_ISOLATE_PANICS";
/// Environment variable overriding [`EngineConfig::enforce_poll_interval`]
pub const ENV_ENFORCE_POLL_INTERVAL: &str = "POSITION_EVENTS_ENFORCE_POLL_INTERVAL";
/// Environment variable overriding [`EngineConfig::worker_threads`]
pub const ENV_WORKERS: &str = "POSITION_EVENTS_WORKERS";

/// Default bound on queued faults
pub const DEFAULT_FAULT_CAPACITY: usize = 256;

/// Position events engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Catch panics raised by transition callbacks and report them as faults
    pub isolate_panics: bool,

    /// Skip regions whose poll interval has not elapsed since their last pass
    pub enforce_poll_interval: bool,

    /// Bound on queued faults (None = unbounded). When full the oldest fault
    /// is evicted; every fault is still logged and returned in the pass report.
    pub fault_channel_capacity: Option<usize>,

    /// Default worker count for parallel passes
    pub worker_threads: usize,

    /// Log every transition at debug level
    pub log_transitions: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            isolate_panics: true,
            enforce_poll_interval: false,
            fault_channel_capacity: Some(DEFAULT_FAULT_CAPACITY),
            worker_threads: 4,
            log_transitions: true,
        }
    }
}

impl EngineConfig {
    /// Parse a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| PositionEventsError::Config(e.to_string()))?;
        config.validate()
    }

    /// Load configuration from a TOML file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| PositionEventsError::Config(format!("{}: {}", path.display(), e)))?;
        let config = Self::from_toml_str(&content)?;
        log::info!("Loaded position events config from {}", path.display());
        Ok(config)
    }

    /// Apply overrides from the process environment
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup (the environment in production)
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(value) = lookup(ENV_ISOLATE_PANICS) {
            self.isolate_panics = parse_flag(ENV_ISOLATE_PANICS, &value)?;
        }
        if let Some(value) = lookup(ENV_ENFORCE_POLL_INTERVAL) {
            self.enforce_poll_interval = parse_flag(ENV_ENFORCE_POLL_INTERVAL, &value)?;
        }
        if let Some(value) = lookup(ENV_WORKERS) {
            self.worker_threads = value.trim().parse().map_err(|_| {
                PositionEventsError::Config(format!("{}: not a number: {}", ENV_WORKERS, value))
            })?;
        }
        self.validate()
    }

    /// Catch callback panics (or let them unwind into the caller)
    pub fn with_panic_isolation(mut self, isolate: bool) -> Self {
        self.isolate_panics = isolate;
        self
    }

    /// Honor region poll intervals
    pub fn with_poll_interval_enforcement(mut self, enforce: bool) -> Self {
        self.enforce_poll_interval = enforce;
        self
    }

    /// Bound the fault channel
    pub fn with_fault_capacity(mut self, capacity: usize) -> Self {
        self.fault_channel_capacity = Some(capacity);
        self
    }

    /// Never bound the fault channel. Queued faults must then be drained.
    pub fn with_unbounded_faults(mut self) -> Self {
        self.fault_channel_capacity = None;
        self
    }

    /// Set the default parallel worker count
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.worker_threads = workers;
        self
    }

    fn validate(self) -> Result<Self> {
        if self.worker_threads == 0 {
            return Err(PositionEventsError::Config(
                "worker_threads must be at least 1".to_string(),
            ));
        }
        if self.fault_channel_capacity == Some(0) {
            return Err(PositionEventsError::Config(
                "fault_channel_capacity must be at least 1".to_string(),
            ));
        }
        Ok(self)
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(PositionEventsError::Config(format!("{}: not a flag: {}", key, value))),
    }
}
