use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::EvalError;

pub const DEFAULT_SECURITY_THRESHOLD: f64 = 80.0;
pub const DEFAULT_PERFORMANCE_THRESHOLD: f64 = 70.0;
pub const DEFAULT_AVAILABILITY_THRESHOLD: f64 = 99.0;
pub const DEFAULT_VULNERABILITY_THRESHOLD: f64 = 5.0;
pub const DEFAULT_TOP_N_EXPENSIVE: usize = 5;
pub const DEFAULT_PENALTY_WEIGHT: f64 = 10.0;
pub const DEFAULT_UNPARSABLE_DATE_PENALTY: f64 = 5.0;
pub const DEFAULT_COST_HISTOGRAM_BINS: usize = 8;
pub const DEFAULT_SCORE_HISTOGRAM_BINS: usize = 12;

/// Thresholds and weights used by the metrics engine.
///
/// Every field has a default, so a partial TOML document is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Security scores strictly below this value are flagged.
    pub security_threshold: f64,
    /// Performance scores strictly below this value are flagged.
    pub performance_threshold: f64,
    /// Availability strictly below this percentage is flagged.
    pub availability_threshold: f64,
    /// Vulnerability counts strictly above this value are flagged.
    pub vulnerability_threshold: f64,
    /// Length of the most-expensive ranking.
    pub top_n_expensive: usize,
    /// Score points removed per unit of violating-row ratio.
    pub penalty_weight: f64,
    /// Flat consistency penalty when the last-updated column cannot be read as dates.
    pub unparsable_date_penalty: f64,
    pub cost_histogram_bins: usize,
    pub score_histogram_bins: usize,
    /// Reference date for future-dated detection.
    pub as_of: NaiveDate,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            security_threshold: DEFAULT_SECURITY_THRESHOLD,
            performance_threshold: DEFAULT_PERFORMANCE_THRESHOLD,
            availability_threshold: DEFAULT_AVAILABILITY_THRESHOLD,
            vulnerability_threshold: DEFAULT_VULNERABILITY_THRESHOLD,
            top_n_expensive: DEFAULT_TOP_N_EXPENSIVE,
            penalty_weight: DEFAULT_PENALTY_WEIGHT,
            unparsable_date_penalty: DEFAULT_UNPARSABLE_DATE_PENALTY,
            cost_histogram_bins: DEFAULT_COST_HISTOGRAM_BINS,
            score_histogram_bins: DEFAULT_SCORE_HISTOGRAM_BINS,
            as_of: Local::now().date_naive(),
        }
    }
}

impl EngineConfig {
    /// Default configuration pinned to a reference date.
    pub fn for_date(date: NaiveDate) -> Self {
        Self {
            as_of: date,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), EvalError> {
        let thresholds = [
            ("security_threshold", self.security_threshold),
            ("performance_threshold", self.performance_threshold),
            ("availability_threshold", self.availability_threshold),
            ("vulnerability_threshold", self.vulnerability_threshold),
        ];
        for (name, value) in thresholds {
            if !value.is_finite() {
                return Err(EvalError::InvalidConfig(format!(
                    "{name} must be a finite number"
                )));
            }
        }

        let penalties = [
            ("penalty_weight", self.penalty_weight),
            ("unparsable_date_penalty", self.unparsable_date_penalty),
        ];
        for (name, value) in penalties {
            if !value.is_finite() || value < 0.0 {
                return Err(EvalError::InvalidConfig(format!(
                    "{name} must be a non-negative number"
                )));
            }
        }

        if self.cost_histogram_bins == 0 || self.score_histogram_bins == 0 {
            return Err(EvalError::InvalidConfig(
                "histogram bin counts must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}
