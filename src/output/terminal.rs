//! Terminal output formatting with colors.

use colored::Colorize;

use crate::result::{MeasurementQuality, OverheadReport};

/// Format a report for human-readable terminal output.
pub fn format_report(report: &OverheadReport) -> String {
    let mut output = String::new();
    let sep = "\u{2500}".repeat(62);
    let config = &report.metadata.config;

    output.push_str("tsc-overhead\n");
    output.push_str(&sep);
    output.push_str("\n\n");

    if let Some(brand) = &report.metadata.hardware.brand {
        output.push_str(&format!("  CPU:      {}\n", brand));
    }
    output.push_str(&format!(
        "  Readers:  {} \u{2192} {}\n",
        config.start_variant, config.end_variant
    ));
    output.push_str(&format!(
        "  Samples:  {} retained, {} discarded",
        report.metadata.retained_samples, report.metadata.discarded_samples
    ));
    if report.outliers.outliers_removed > 0 {
        output.push_str(&format!(
            ", {} trimmed ({:.2}%)",
            report.outliers.outliers_removed,
            report.outliers.outlier_fraction * 100.0
        ));
    }
    output.push('\n');
    output.push_str(&format!("  Quality:  {}\n\n", format_quality(report.quality)));

    let stats = &report.statistics;
    output.push_str(&format!(
        "    Mean:      {} cycles\n",
        format!("{:.2}", stats.mean).as_str().bold()
    ));
    output.push_str(&format!("    Variance:  {:.2} cycles\u{00B2}\n", stats.variance));
    output.push_str(&format!("    Std dev:   {:.2} cycles\n", stats.std_dev()));
    output.push('\n');

    let summary = &report.summary;
    output.push_str(&format!(
        "    Min / median / max:  {} / {:.1} / {}\n",
        summary.min, summary.median, summary.max
    ));
    output.push_str(&format!(
        "    p90 / p99:           {:.1} / {:.1}\n",
        summary.p90, summary.p99
    ));
    output.push_str(&format!(
        "    Lag-1 correlation:   {:.3}\n",
        report.lag1_autocorrelation
    ));
    output.push('\n');

    if !report.warnings.is_empty() {
        for warning in &report.warnings {
            output.push_str(&format!("  {} {}\n", "\u{26A0}".yellow().bold(), warning));
        }
        output.push('\n');
    }

    output.push_str(&sep);
    output.push('\n');
    output.push_str(&format!(
        "Completed in {:.3}s. Variance is population variance over all retained samples.\n",
        report.metadata.runtime_secs
    ));

    output
}

/// Format MeasurementQuality for display.
fn format_quality(quality: MeasurementQuality) -> String {
    let label = quality.to_string();
    match quality {
        MeasurementQuality::Excellent | MeasurementQuality::Good => {
            label.as_str().green().to_string()
        }
        MeasurementQuality::Poor => label.as_str().yellow().to_string(),
        MeasurementQuality::TooNoisy => label.as_str().red().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::tests::make_report;

    #[test]
    fn test_format_report() {
        colored::control::set_override(false);
        let output = format_report(&make_report());
        assert!(output.contains("tsc-overhead"));
        assert!(output.contains("Mean:      42.50 cycles"));
        assert!(output.contains("serializing-before-after \u{2192} serializing-before-after"));
        assert!(output.contains("Quality:  Good"));
    }

    #[test]
    fn test_format_warnings() {
        colored::control::set_override(false);
        let mut report = make_report();
        report.warnings.push("Turbo boost is enabled.".to_string());
        let output = format_report(&report);
        assert!(output.contains("Turbo boost is enabled."));
    }
}
