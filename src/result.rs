//! Result types for overhead measurement.

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::measurement::OutlierStats;
use crate::preflight::HardwareInfo;
use crate::statistics::{Statistics, Summary};
use crate::types::OverheadSample;

/// Outcome of a calibration session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverheadReport {
    /// Mean and population variance of the retained samples.
    pub statistics: Statistics,

    /// Order statistics of the retained samples.
    pub summary: Summary,

    /// Noise classification derived from `statistics`.
    pub quality: MeasurementQuality,

    /// What outlier trimming removed, if enabled.
    pub outliers: OutlierStats,

    /// Lag-1 autocorrelation of the retained samples in collection order.
    pub lag1_autocorrelation: f64,

    /// Human-readable warnings (empty if all checks pass).
    pub warnings: Vec<String>,

    /// Session configuration and environment.
    pub metadata: Metadata,

    /// Retained samples in collection order.
    #[serde(skip)]
    pub samples: Vec<OverheadSample>,
}

impl OverheadReport {
    /// Mean overhead, in cycles.
    pub fn mean_cycles(&self) -> f64 {
        self.statistics.mean
    }

    /// Whether the measurement is usable for correcting other timings.
    pub fn is_reliable(&self) -> bool {
        !matches!(self.quality, MeasurementQuality::TooNoisy)
    }
}

/// Measurement noise relative to the mean overhead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MeasurementQuality {
    /// Standard deviation below 10% of the mean.
    Excellent,
    /// Standard deviation below ~32% of the mean.
    Good,
    /// Standard deviation below the mean.
    Poor,
    /// Standard deviation at or above the mean, or undefined.
    TooNoisy,
}

impl MeasurementQuality {
    /// Classify from `variance / mean²`.
    ///
    /// Non-finite or negative values indicate a broken measurement and are
    /// classified as `TooNoisy`.
    pub fn from_relative_noise(relative_noise: f64) -> Self {
        if !relative_noise.is_finite() || relative_noise < 0.0 {
            return MeasurementQuality::TooNoisy;
        }

        if relative_noise < 0.01 {
            MeasurementQuality::Excellent
        } else if relative_noise < 0.1 {
            MeasurementQuality::Good
        } else if relative_noise < 1.0 {
            MeasurementQuality::Poor
        } else {
            MeasurementQuality::TooNoisy
        }
    }
}

impl std::fmt::Display for MeasurementQuality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MeasurementQuality::Excellent => write!(f, "Excellent"),
            MeasurementQuality::Good => write!(f, "Good"),
            MeasurementQuality::Poor => write!(f, "Poor"),
            MeasurementQuality::TooNoisy => write!(f, "Too Noisy"),
        }
    }
}

/// Session configuration and environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    /// Configuration the session ran with.
    pub config: Config,
    /// Samples retained after trimming.
    pub retained_samples: usize,
    /// Invalid samples discarded and retaken during collection.
    pub discarded_samples: usize,
    /// Processor facts from the preflight probe.
    pub hardware: HardwareInfo,
    /// Total runtime in seconds.
    pub runtime_secs: f64,
}
