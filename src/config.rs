//! Configuration for an overhead measurement session.

use serde::{Deserialize, Serialize};

use crate::types::ClockVariant;

/// Configuration options for `OverheadCalibrator`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Valid samples to collect (default: 1,000).
    pub samples: usize,

    /// Samples taken and discarded before collection (default: 100).
    pub warmup: usize,

    /// Reader for the first timestamp of each sample.
    pub start_variant: ClockVariant,

    /// Reader for the second timestamp of each sample.
    pub end_variant: ClockVariant,

    /// Invalid samples tolerated before the session fails (default: 16).
    pub max_retries: usize,

    /// Percentile above which samples are trimmed (default: 1.0).
    /// Values >= 1.0 disable trimming.
    pub outlier_percentile: f64,

    /// Run the Linux governor/turbo/SMT/load checks (default: true).
    pub system_checks: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            samples: 1_000,
            warmup: 100,
            start_variant: ClockVariant::SerializingBeforeAfter,
            end_variant: ClockVariant::SerializingBeforeAfter,
            max_retries: 16,
            outlier_percentile: 1.0,
            system_checks: true,
        }
    }
}

impl Config {
    /// Whether outlier trimming is enabled.
    ///
    /// Only a percentile strictly inside (0, 1) trims.
    pub fn trims_outliers(&self) -> bool {
        self.outlier_percentile > 0.0 && self.outlier_percentile < 1.0
    }
}
