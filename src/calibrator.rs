//! `OverheadCalibrator` entry point and builder.

use std::time::Instant;

use tracing::{debug, info};

use crate::config::Config;
use crate::error::Result;
use crate::measurement::{trim_outliers, OverheadSampler, SampleCollection};
use crate::preflight::{run_all_checks, HardwareInfo};
use crate::result::{MeasurementQuality, Metadata, OverheadReport};
use crate::statistics::{
    compute_statistics, lag1_autocorrelation, Summary, CORRELATION_WARNING_THRESHOLD,
};
use crate::types::ClockVariant;

/// Measures the overhead of the timestamp counter readers.
///
/// Use the builder pattern to configure a session, then call [`run`](Self::run).
///
/// # Example
///
/// ```no_run
/// use tsc_overhead::{ClockVariant, OverheadCalibrator};
///
/// let report = OverheadCalibrator::new()
///     .samples(16_384)
///     .end_variant(ClockVariant::SerializingAfter)
///     .run()?;
///
/// println!("{:.1} cycles ± {:.1}", report.statistics.mean, report.statistics.std_dev());
/// # Ok::<(), tsc_overhead::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct OverheadCalibrator {
    config: Config,
}

impl OverheadCalibrator {
    /// Create with default configuration.
    ///
    /// 1,000 samples, 100 warmup, `SerializingBeforeAfter` at both call sites.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Create with a reduced configuration for tests and smoke runs.
    ///
    /// Settings:
    /// - 200 samples (vs 1,000 default)
    /// - 10 warmup iterations (vs 100 default)
    /// - system checks skipped
    pub fn quick() -> Self {
        Self {
            config: Config {
                samples: 200,
                warmup: 10,
                system_checks: false,
                ..Config::default()
            },
        }
    }

    /// Create configured for interval bracketing.
    ///
    /// Start with `SerializingBeforeAfter`, end with `SerializingAfter`: the
    /// overhead to subtract when the pair times arbitrary code.
    pub fn interval() -> Self {
        Self::new()
            .start_variant(ClockVariant::SerializingBeforeAfter)
            .end_variant(ClockVariant::SerializingAfter)
    }

    /// Create from an explicit configuration.
    pub fn with_config(config: Config) -> Self {
        Self { config }
    }

    /// Set the number of valid samples to collect.
    pub fn samples(mut self, n: usize) -> Self {
        self.config.samples = n;
        self
    }

    /// Set the number of warmup samples.
    pub fn warmup(mut self, n: usize) -> Self {
        self.config.warmup = n;
        self
    }

    /// Set the reader for the first timestamp of each sample.
    pub fn start_variant(mut self, variant: ClockVariant) -> Self {
        self.config.start_variant = variant;
        self
    }

    /// Set the reader for the second timestamp of each sample.
    pub fn end_variant(mut self, variant: ClockVariant) -> Self {
        self.config.end_variant = variant;
        self
    }

    /// Set how many invalid samples may be retaken before failing.
    pub fn max_retries(mut self, n: usize) -> Self {
        self.config.max_retries = n;
        self
    }

    /// Set the outlier trimming percentile.
    ///
    /// Values outside (0, 1), including NaN, disable trimming.
    pub fn outlier_percentile(mut self, p: f64) -> Self {
        self.config.outlier_percentile = p;
        self
    }

    /// Skip the Linux governor/turbo/SMT/load checks.
    pub fn skip_system_checks(mut self) -> Self {
        self.config.system_checks = false;
        self
    }

    /// Get the current configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Build the sampler this session collects with.
    pub fn sampler(&self) -> OverheadSampler {
        OverheadSampler::new(self.config.start_variant, self.config.end_variant)
            .with_warmup(self.config.warmup)
            .with_max_retries(self.config.max_retries)
    }

    /// Run the full session: preflight, collect, trim, summarize.
    ///
    /// # Errors
    ///
    /// - [`Error::UnsupportedHardware`](crate::Error::UnsupportedHardware)
    ///   from the preflight probe; nothing is sampled.
    /// - [`Error::EmptyInput`](crate::Error::EmptyInput) if zero samples
    ///   were requested.
    /// - [`Error::InvalidSample`](crate::Error::InvalidSample) if the retry
    ///   budget ran out.
    pub fn run(&self) -> Result<OverheadReport> {
        let start_time = Instant::now();

        debug!(config = ?self.config, "starting overhead calibration");
        let preflight = run_all_checks(self.config.system_checks)?;

        let collection = self.sampler().collect(self.config.samples)?;

        let mut warnings = preflight.descriptions();
        let mut report = self.analyze(collection, preflight.hardware)?;
        warnings.append(&mut report.warnings);
        report.warnings = warnings;
        report.metadata.runtime_secs = start_time.elapsed().as_secs_f64();

        info!(
            mean = report.statistics.mean,
            variance = report.statistics.variance,
            min = report.summary.min,
            quality = %report.quality,
            "overhead calibration complete"
        );

        Ok(report)
    }

    /// Summarize an already-collected sample set.
    ///
    /// Applies this calibrator's trimming and builds the report without
    /// touching the counter.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyInput`](crate::Error::EmptyInput) if no samples remain.
    pub fn analyze(
        &self,
        collection: SampleCollection,
        hardware: HardwareInfo,
    ) -> Result<OverheadReport> {
        let (samples, outliers) =
            trim_outliers(&collection.samples, self.config.outlier_percentile);

        let statistics = compute_statistics(&samples)?;
        let summary = Summary::from_samples(&samples)?;
        let quality = MeasurementQuality::from_relative_noise(statistics.relative_noise());

        let series: Vec<f64> = samples.iter().map(|s| s.cycles() as f64).collect();
        let lag1 = lag1_autocorrelation(&series);

        let mut warnings = Vec::new();
        if lag1.abs() > CORRELATION_WARNING_THRESHOLD {
            warnings.push(format!(
                "Consecutive samples are correlated (lag-1 r = {:.2}). Periodic \
                 interference is aliasing with the sampling loop.",
                lag1
            ));
        }
        if collection.discarded > 0 {
            warnings.push(format!(
                "{} sample(s) had a backward counter and were retaken. The thread \
                 may be migrating between cores with unsynchronized counters.",
                collection.discarded
            ));
        }

        Ok(OverheadReport {
            statistics,
            summary,
            quality,
            outliers,
            lag1_autocorrelation: lag1,
            warnings,
            metadata: Metadata {
                config: self.config.clone(),
                retained_samples: samples.len(),
                discarded_samples: collection.discarded,
                hardware,
                runtime_secs: 0.0,
            },
            samples,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::types::OverheadSample;

    fn collection(values: &[u64], discarded: usize) -> SampleCollection {
        SampleCollection {
            samples: values.iter().copied().map(OverheadSample::from_cycles).collect(),
            discarded,
        }
    }

    #[test]
    fn test_builder() {
        let calibrator = OverheadCalibrator::new()
            .samples(16_384)
            .warmup(0)
            .max_retries(3)
            .outlier_percentile(0.99)
            .skip_system_checks();

        let config = calibrator.config();
        assert_eq!(config.samples, 16_384);
        assert_eq!(config.warmup, 0);
        assert_eq!(config.max_retries, 3);
        assert!(config.trims_outliers());
        assert!(!config.system_checks);
    }

    #[test]
    fn test_interval_variants() {
        let config = OverheadCalibrator::interval().config().clone();
        assert_eq!(config.start_variant, ClockVariant::SerializingBeforeAfter);
        assert_eq!(config.end_variant, ClockVariant::SerializingAfter);
    }

    #[test]
    fn test_analyze_out_of_range_percentile_keeps_all() {
        for p in [0.0, -1.0, f64::NAN, 1.5] {
            let config = Config {
                outlier_percentile: p,
                ..Config::default()
            };
            let report = OverheadCalibrator::with_config(config)
                .analyze(collection(&[8, 12, 40, 41], 0), HardwareInfo::default())
                .unwrap();

            assert_eq!(report.metadata.retained_samples, 4, "p = {}", p);
            assert_eq!(report.outliers.outliers_removed, 0, "p = {}", p);
            assert_eq!(report.statistics.mean, 25.25, "p = {}", p);
        }
    }

    #[test]
    fn test_analyze_known_samples() {
        let report = OverheadCalibrator::new()
            .analyze(collection(&[8, 12], 0), HardwareInfo::default())
            .unwrap();

        assert_eq!(report.statistics.mean, 10.0);
        assert_eq!(report.statistics.variance, 4.0);
        assert_eq!(report.summary.min, 8);
        assert_eq!(report.summary.max, 12);
        assert_eq!(report.metadata.retained_samples, 2);
        assert_eq!(report.samples.len(), 2);
    }

    #[test]
    fn test_analyze_reports_discards() {
        let report = OverheadCalibrator::new()
            .analyze(collection(&[40; 64], 2), HardwareInfo::default())
            .unwrap();

        assert_eq!(report.metadata.discarded_samples, 2);
        assert_eq!(report.quality, MeasurementQuality::Excellent);
        assert!(report.warnings.iter().any(|w| w.contains("retaken")));
    }

    #[test]
    fn test_analyze_trims_when_configured() {
        let mut values = vec![40u64; 99];
        values.push(1_000_000);

        let untrimmed = OverheadCalibrator::new()
            .analyze(collection(&values, 0), HardwareInfo::default())
            .unwrap();
        let trimmed = OverheadCalibrator::new()
            .outlier_percentile(0.95)
            .analyze(collection(&values, 0), HardwareInfo::default())
            .unwrap();

        assert!(untrimmed.statistics.mean > 1_000.0);
        assert_eq!(trimmed.statistics.mean, 40.0);
        assert_eq!(trimmed.outliers.outliers_removed, 1);
    }

    #[test]
    fn test_analyze_empty() {
        let err = OverheadCalibrator::new()
            .analyze(SampleCollection::default(), HardwareInfo::default())
            .unwrap_err();
        assert_eq!(err, Error::EmptyInput);
    }

    #[test]
    fn test_run_zero_samples() {
        match OverheadCalibrator::quick().samples(0).run() {
            Err(Error::EmptyInput) | Err(Error::UnsupportedHardware(_)) => {}
            other => panic!("expected EmptyInput, got {:?}", other),
        }
    }

    #[test]
    fn test_quick_run() {
        let report = match OverheadCalibrator::quick().run() {
            Ok(report) => report,
            Err(Error::UnsupportedHardware(_)) => return,
            Err(err) => panic!("calibration failed: {}", err),
        };

        assert_eq!(report.metadata.retained_samples, 200);
        assert!(report.statistics.mean > 0.0);
        assert!(report.statistics.variance >= 0.0);
        assert!(report.summary.min as f64 <= report.statistics.mean);
    }
}
