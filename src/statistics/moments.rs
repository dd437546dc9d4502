//! Mean and population variance of overhead samples.
//!
//! Sums are accumulated exactly in `u128` and the variance is evaluated as
//!
//! ```text
//! variance = Σx²/n − mean² = (n·Σx² − (Σx)²) / n²
//! ```
//!
//! so the numerator is an exact, non-negative integer. Cycle counts of
//! 10⁴–10⁶ over tens of thousands of samples stay far below the `u128`
//! range. Only pathological inputs (squares of values near `u64::MAX`)
//! overflow, in which case accumulation falls back to `f64`.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::OverheadSample;

/// Mean and population variance of a sample set, in cycles and cycles².
///
/// Recomputed on demand; nothing caches it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    /// Arithmetic mean.
    pub mean: f64,
    /// Population variance (divides by n, not n − 1).
    pub variance: f64,
}

impl Statistics {
    /// Compute statistics over raw cycle counts.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyInput`] if `values` is empty.
    pub fn from_cycles(values: &[u64]) -> Result<Self> {
        moments(values.iter().copied(), values.len())
    }

    /// Population standard deviation.
    pub fn std_dev(&self) -> f64 {
        self.variance.sqrt()
    }

    /// Variance relative to the squared mean.
    ///
    /// Small values mean the measurement is quiet relative to its own
    /// magnitude. Infinite when the mean is zero but the variance is not.
    pub fn relative_noise(&self) -> f64 {
        let mean_sq = self.mean * self.mean;
        if mean_sq == 0.0 {
            if self.variance == 0.0 {
                0.0
            } else {
                f64::INFINITY
            }
        } else {
            self.variance / mean_sq
        }
    }

    /// Standard deviation over mean.
    pub fn coefficient_of_variation(&self) -> f64 {
        self.relative_noise().sqrt()
    }
}

/// Compute mean and population variance of a sample set.
///
/// # Errors
///
/// [`Error::EmptyInput`] if `samples` is empty.
pub fn compute_statistics(samples: &[OverheadSample]) -> Result<Statistics> {
    moments(samples.iter().map(|s| s.cycles()), samples.len())
}

fn moments<I>(values: I, n: usize) -> Result<Statistics>
where
    I: Iterator<Item = u64> + Clone,
{
    if n == 0 {
        return Err(Error::EmptyInput);
    }

    Ok(exact_moments(values.clone(), n).unwrap_or_else(|| float_moments(values, n)))
}

/// Integer accumulation; `None` on `u128` overflow.
fn exact_moments<I>(values: I, n: usize) -> Option<Statistics>
where
    I: Iterator<Item = u64>,
{
    let mut sum: u128 = 0;
    let mut sum_sq: u128 = 0;

    for v in values {
        let v = v as u128;
        sum = sum.checked_add(v)?;
        sum_sq = sum_sq.checked_add(v * v)?;
    }

    let count = n as u128;
    let numerator = count.checked_mul(sum_sq)?.checked_sub(sum.checked_mul(sum)?)?;

    let n = n as f64;
    Some(Statistics {
        mean: sum as f64 / n,
        variance: numerator as f64 / (n * n),
    })
}

/// Two-pass floating-point accumulation for inputs too large for `u128`.
fn float_moments<I>(values: I, n: usize) -> Statistics
where
    I: Iterator<Item = u64> + Clone,
{
    let n = n as f64;
    let mean = values.clone().map(|v| v as f64).sum::<f64>() / n;
    let variance = values
        .map(|v| {
            let d = v as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / n;

    Statistics {
        mean,
        variance: variance.max(0.0),
    }
}
