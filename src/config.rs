use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// What a moving average divides by when history is shorter than the window.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum AveragePolicy {
    /// Always the configured number of days, so short histories are diluted.
    #[default]
    ConfiguredWindow,
    /// Only the days actually available.
    AvailableDays,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub moving_average_days: usize,
    pub gap_up_delta: f64,
    pub average_policy: AveragePolicy,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            moving_average_days: 10,
            gap_up_delta: 0.011,
            average_policy: AveragePolicy::default(),
        }
    }
}

impl AnalysisConfig {
    pub fn with_moving_average_days(mut self, value: usize) -> Self {
        self.moving_average_days = value;
        self
    }

    pub fn with_gap_up_delta(mut self, value: f64) -> Self {
        self.gap_up_delta = value;
        self
    }

    pub fn with_average_policy(mut self, value: AveragePolicy) -> Self {
        self.average_policy = value;
        self
    }
}
