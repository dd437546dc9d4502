//! Randomized checks of the combiner and the statistics aggregator.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tsc_overhead::statistics::Summary;
use tsc_overhead::{combine, compute_statistics, Error, OverheadSample, RawTimestamp, Statistics};

const TRIALS: usize = 500;

fn samples(values: &[u64]) -> Vec<OverheadSample> {
    values.iter().copied().map(OverheadSample::from_cycles).collect()
}

/// `combine(high, low) == (high << 32) | low` for arbitrary halves.
#[test]
fn combine_is_exact_shift_or() {
    let mut rng = StdRng::seed_from_u64(0x75C0);

    for _ in 0..TRIALS {
        let high: u32 = rng.random();
        let low: u32 = rng.random();
        let expected = ((high as u64) << 32) | low as u64;

        assert_eq!(combine(high, low).cycles(), expected);
        assert_eq!(RawTimestamp::new(high, low).combine().cycles(), expected);
        assert_eq!((expected >> 32) as u32, high);
        assert_eq!(expected as u32, low);
    }
}

/// Every element equal to `c` gives mean `c` and variance 0.
#[test]
fn constant_sets_have_zero_variance() {
    let mut rng = StdRng::seed_from_u64(0xC0FFEE);

    for _ in 0..TRIALS {
        let c: u64 = rng.random_range(0..1_000_000);
        let n: usize = rng.random_range(1..2_000);
        let stats = compute_statistics(&samples(&vec![c; n])).unwrap();

        assert_eq!(stats.mean, c as f64, "c = {}, n = {}", c, n);
        assert_eq!(stats.variance, 0.0, "c = {}, n = {}", c, n);
    }
}

/// Two elements `{a, b}` give variance `((a - b) / 2)^2`.
#[test]
fn two_element_variance() {
    let mut rng = StdRng::seed_from_u64(0xBEEF);

    for _ in 0..TRIALS {
        let a: u64 = rng.random_range(0..1_000_000);
        let b: u64 = rng.random_range(0..1_000_000);
        let stats = compute_statistics(&samples(&[a, b])).unwrap();

        let half_diff = (a as f64 - b as f64) / 2.0;
        assert_eq!(stats.variance, half_diff * half_diff, "a = {}, b = {}", a, b);
        assert_eq!(stats.mean, (a as f64 + b as f64) / 2.0);
    }
}

/// Variance matches the two-pass definition on realistic cycle counts.
#[test]
fn matches_two_pass_population_variance() {
    let mut rng = StdRng::seed_from_u64(42);

    for _ in 0..50 {
        let n: usize = rng.random_range(1..20_000);
        let values: Vec<u64> = (0..n).map(|_| rng.random_range(20..1_000_000)).collect();
        let stats = Statistics::from_cycles(&values).unwrap();

        let mean = values.iter().map(|&v| v as f64).sum::<f64>() / n as f64;
        let variance = values
            .iter()
            .map(|&v| (v as f64 - mean).powi(2))
            .sum::<f64>()
            / n as f64;

        assert!((stats.mean - mean).abs() <= 1e-9 * mean.max(1.0));
        assert!(
            (stats.variance - variance).abs() <= 1e-9 * variance.max(1.0),
            "exact {} vs two-pass {}",
            stats.variance,
            variance
        );
        assert!(stats.variance >= 0.0);
    }
}

#[test]
fn scenario_four_tens() {
    let stats = compute_statistics(&samples(&[10, 10, 10, 10])).unwrap();
    assert_eq!(stats.mean, 10.0);
    assert_eq!(stats.variance, 0.0);
}

#[test]
fn scenario_eight_twelve() {
    let stats = compute_statistics(&samples(&[8, 12])).unwrap();
    assert_eq!(stats.mean, 10.0);
    assert_eq!(stats.variance, 4.0);
}

#[test]
fn empty_set_is_empty_input() {
    assert_eq!(compute_statistics(&[]).unwrap_err(), Error::EmptyInput);
    assert_eq!(Summary::from_samples(&[]).unwrap_err(), Error::EmptyInput);
}

#[test]
fn summary_bounds_contain_mean() {
    let mut rng = StdRng::seed_from_u64(7);
    let values: Vec<u64> = (0..1_000).map(|_| rng.random_range(30..60)).collect();
    let set = samples(&values);

    let stats = compute_statistics(&set).unwrap();
    let summary = Summary::from_samples(&set).unwrap();

    assert!(summary.min as f64 <= stats.mean && stats.mean <= summary.max as f64);
    assert!(summary.min as f64 <= summary.median && summary.median <= summary.p90);
    assert!(summary.p90 <= summary.p99 && summary.p99 <= summary.max as f64);
}
