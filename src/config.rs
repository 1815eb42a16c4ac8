//! Solver configuration.

use serde::{Deserialize, Serialize};

use crate::models::Time;

/// Tunables for a solve run.
///
/// # Example
/// ```
/// use window_sched::SolverConfig;
///
/// let config = SolverConfig::from_json(r#"{ "start_time": 8 }"#).unwrap();
/// assert_eq!(config.start_time, 8);
/// assert_eq!(config.max_combinations, SolverConfig::default().max_combinations);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Global floor: no task starts before this time.
    pub start_time: Time,
    /// Cap on resource combinations evaluated per multi-resource task.
    pub max_combinations: usize,
}

impl SolverConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the global start time.
    pub fn with_start_time(mut self, start_time: Time) -> Self {
        self.start_time = start_time;
        self
    }

    /// Sets the combination cap (at least 1).
    pub fn with_max_combinations(mut self, max_combinations: usize) -> Self {
        self.max_combinations = max_combinations.max(1);
        self
    }

    /// Parses a JSON configuration document. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            start_time: 0,
            max_combinations: 1024,
        }
    }
}
