//! Percentile trimming of overhead samples.
//!
//! Interrupts and SMIs occasionally land between the two readings and
//! produce samples orders of magnitude above the rest. Trimming drops every
//! sample above a chosen percentile of the set. It is off by default so the
//! reported statistics describe the full sample set.

use serde::{Deserialize, Serialize};

use crate::types::OverheadSample;

/// Statistics about outlier trimming.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutlierStats {
    /// Samples before trimming.
    pub total_samples: usize,
    /// Samples remaining after trimming.
    pub retained_samples: usize,
    /// Samples removed.
    pub outliers_removed: usize,
    /// Fraction of samples removed (0.0 to 1.0).
    pub outlier_fraction: f64,
    /// Largest retained value, in cycles.
    pub threshold: u64,
}

impl OutlierStats {
    /// Stats for when no trimming was applied.
    pub fn no_filtering(total_samples: usize) -> Self {
        Self {
            total_samples,
            retained_samples: total_samples,
            outliers_removed: 0,
            outlier_fraction: 0.0,
            threshold: u64::MAX,
        }
    }
}

/// Drop samples above the given percentile, preserving collection order.
///
/// If `percentile` is not strictly inside (0, 1), including NaN, or
/// `samples` is empty, nothing is removed.
pub fn trim_outliers(
    samples: &[OverheadSample],
    percentile: f64,
) -> (Vec<OverheadSample>, OutlierStats) {
    let total_samples = samples.len();

    let in_range = percentile > 0.0 && percentile < 1.0;
    if !in_range || samples.is_empty() {
        return (samples.to_vec(), OutlierStats::no_filtering(total_samples));
    }

    let mut sorted: Vec<u64> = samples.iter().map(|s| s.cycles()).collect();
    let threshold = compute_percentile(&mut sorted, percentile);

    let retained: Vec<OverheadSample> = samples
        .iter()
        .copied()
        .filter(|s| s.cycles() <= threshold)
        .collect();

    let removed = total_samples - retained.len();
    let stats = OutlierStats {
        total_samples,
        retained_samples: retained.len(),
        outliers_removed: removed,
        outlier_fraction: removed as f64 / total_samples as f64,
        threshold,
    };

    (retained, stats)
}

/// Value at a percentile, linearly interpolated and rounded.
///
/// Sorts `data` in place.
fn compute_percentile(data: &mut [u64], percentile: f64) -> u64 {
    if data.is_empty() {
        return 0;
    }

    if data.len() == 1 {
        return data[0];
    }

    data.sort_unstable();

    let p = percentile.clamp(0.0, 1.0);
    let idx = p * (data.len() - 1) as f64;
    let lower = idx.floor() as usize;
    let upper = idx.ceil() as usize;

    if lower == upper {
        data[lower]
    } else {
        let frac = idx - lower as f64;
        let lower_val = data[lower] as f64;
        let upper_val = data[upper] as f64;
        (lower_val + frac * (upper_val - lower_val)).round() as u64
    }
}
