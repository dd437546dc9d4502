//! Autocorrelation of the sample sequence.
//!
//! Overhead samples should be independent draws. Strong lag-1 correlation
//! points at periodic interference (timer interrupts, frequency transitions)
//! that the sampling loop is aliasing with.

/// Lag-1 autocorrelation above which the sequence is reported as correlated.
pub const CORRELATION_WARNING_THRESHOLD: f64 = 0.3;

/// Compute lag-1 autocorrelation of a series in collection order.
///
/// Returns a coefficient in [-1, 1], or 0.0 if the data has fewer than
/// 2 elements or zero variance.
///
/// ```text
/// r_1 = sum((x_t - mean) * (x_{t+1} - mean)) / sum((x_t - mean)^2)
/// ```
pub fn lag1_autocorrelation(data: &[f64]) -> f64 {
    compute_lag_autocorrelation(data, 1)
}

fn compute_lag_autocorrelation(data: &[f64], lag: usize) -> f64 {
    let n = data.len();

    if n <= lag {
        return 0.0;
    }

    let mean: f64 = data.iter().sum::<f64>() / n as f64;
    let variance: f64 = data.iter().map(|&x| (x - mean).powi(2)).sum();

    if variance == 0.0 {
        return 0.0;
    }

    let lagged_cov: f64 = data
        .windows(lag + 1)
        .map(|w| (w[0] - mean) * (w[lag] - mean))
        .sum();

    lagged_cov / variance
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_series() {
        assert_eq!(lag1_autocorrelation(&[40.0; 64]), 0.0);
    }

    #[test]
    fn test_short_series() {
        assert_eq!(lag1_autocorrelation(&[]), 0.0);
        assert_eq!(lag1_autocorrelation(&[1.0]), 0.0);
    }

    #[test]
    fn test_alternating_series_is_negative() {
        let data: Vec<f64> = (0..100).map(|i| if i % 2 == 0 { 38.0 } else { 42.0 }).collect();
        let r = lag1_autocorrelation(&data);
        assert!(r < -0.9, "r = {}", r);
    }

    #[test]
    fn test_trending_series_is_positive() {
        let data: Vec<f64> = (0..100).map(|i| i as f64).collect();
        let r = lag1_autocorrelation(&data);
        assert!(r > CORRELATION_WARNING_THRESHOLD, "r = {}", r);
    }
}
