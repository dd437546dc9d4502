//! Report rendering: JSON and colored terminal text.

mod json;
mod terminal;

pub use json::{to_json, to_json_pretty};
pub use terminal::format_report;

#[cfg(test)]
pub(crate) mod tests {
    use crate::config::Config;
    use crate::measurement::OutlierStats;
    use crate::preflight::HardwareInfo;
    use crate::result::{MeasurementQuality, Metadata, OverheadReport};
    use crate::statistics::{Statistics, Summary};
    use crate::types::OverheadSample;

    pub(crate) fn make_report() -> OverheadReport {
        OverheadReport {
            statistics: Statistics {
                mean: 42.5,
                variance: 12.25,
            },
            summary: Summary {
                min: 38,
                max: 120,
                median: 42.0,
                p90: 46.0,
                p99: 60.0,
            },
            quality: MeasurementQuality::Good,
            outliers: OutlierStats::no_filtering(1000),
            lag1_autocorrelation: 0.01,
            warnings: Vec::new(),
            metadata: Metadata {
                config: Config::default(),
                retained_samples: 1000,
                discarded_samples: 0,
                hardware: HardwareInfo {
                    vendor: Some("GenuineIntel".to_string()),
                    brand: Some("Test CPU @ 3.00GHz".to_string()),
                    invariant_tsc: true,
                    hypervisor: None,
                },
                runtime_secs: 0.01,
            },
            samples: vec![OverheadSample::from_cycles(42); 4],
        }
    }
}
