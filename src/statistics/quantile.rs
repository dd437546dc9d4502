//! Quantiles and order statistics of overhead samples.
//!
//! Uses the R-7 definition (linear interpolation between order statistics),
//! computed with `select_nth_unstable_by` for O(n) expected time.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::OverheadSample;

/// Compute a single quantile from a mutable slice.
///
/// The slice is partially reordered as a side effect.
///
/// # Panics
///
/// Panics if `data` is empty or if `p` is outside [0, 1].
pub fn compute_quantile(data: &mut [f64], p: f64) -> f64 {
    assert!(!data.is_empty(), "Cannot compute quantile of empty slice");
    assert!(
        (0.0..=1.0).contains(&p),
        "Quantile probability must be in [0, 1]"
    );

    let n = data.len();

    if n == 1 {
        return data[0];
    }

    let h = (n - 1) as f64 * p;
    let h_floor = h.floor() as usize;
    let h_frac = h - h.floor();

    if h_floor >= n - 1 {
        let (_, &mut max, _) = data.select_nth_unstable_by(n - 1, |a, b| a.total_cmp(b));
        return max;
    }

    let (_, &mut lower, upper) = data.select_nth_unstable_by(h_floor, |a, b| a.total_cmp(b));

    if h_frac == 0.0 {
        return lower;
    }

    // Smallest element of the upper partition is the next order statistic.
    let upper_min = upper
        .iter()
        .copied()
        .min_by(|a, b| a.total_cmp(b))
        .unwrap_or(lower);

    lower + h_frac * (upper_min - lower)
}

/// Order statistics of a sample set, in cycles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Smallest sample; the best-case overhead.
    pub min: u64,
    /// Largest sample.
    pub max: u64,
    /// 50th percentile.
    pub median: f64,
    /// 90th percentile.
    pub p90: f64,
    /// 99th percentile.
    pub p99: f64,
}

impl Summary {
    /// Summarize a sample set.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyInput`] if `samples` is empty.
    pub fn from_samples(samples: &[OverheadSample]) -> Result<Self> {
        let min = samples.iter().map(|s| s.cycles()).min().ok_or(Error::EmptyInput)?;
        let max = samples.iter().map(|s| s.cycles()).max().ok_or(Error::EmptyInput)?;

        let mut working: Vec<f64> = samples.iter().map(|s| s.cycles() as f64).collect();

        Ok(Self {
            min,
            max,
            median: compute_quantile(&mut working, 0.5),
            p90: compute_quantile(&mut working, 0.9),
            p99: compute_quantile(&mut working, 0.99),
        })
    }

    /// Spread between the 99th percentile and the minimum.
    pub fn tail_spread(&self) -> f64 {
        self.p99 - self.min as f64
    }
}
