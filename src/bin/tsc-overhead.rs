//! Command-line front end: measure counter overhead and print a report.

use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use tsc_overhead::output::{format_report, to_json_pretty};
use tsc_overhead::{ClockVariant, Error, OverheadCalibrator};

/// Failures that end the process with a nonzero status.
#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Measurement(#[from] Error),
    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(
    name = "tsc-overhead",
    version,
    about = "Measure the cycle cost of reading the timestamp counter"
)]
struct Args {
    /// Valid samples to collect.
    #[arg(short = 'n', long, default_value_t = 1000, env = "TSC_OVERHEAD_SAMPLES")]
    samples: usize,

    /// Warmup samples discarded before collection.
    #[arg(long, default_value_t = 100, env = "TSC_OVERHEAD_WARMUP")]
    warmup: usize,

    /// Reader for the first timestamp (serializing-after | serializing-before-after).
    #[arg(long, default_value = "serializing-before-after", env = "TSC_OVERHEAD_START")]
    start: ClockVariant,

    /// Reader for the second timestamp (serializing-after | serializing-before-after).
    #[arg(long, default_value = "serializing-before-after", env = "TSC_OVERHEAD_END")]
    end: ClockVariant,

    /// Invalid samples tolerated before giving up.
    #[arg(long, default_value_t = 16, env = "TSC_OVERHEAD_MAX_RETRIES")]
    max_retries: usize,

    /// Trim samples above this percentile; 1.0 keeps everything.
    #[arg(long, default_value_t = 1.0, env = "TSC_OVERHEAD_OUTLIER_PERCENTILE")]
    outlier_percentile: f64,

    /// Skip the governor/turbo/SMT/load checks.
    #[arg(long)]
    no_system_checks: bool,

    /// Print the report as JSON.
    #[arg(long)]
    json: bool,

    /// Print every retained sample on one line.
    #[arg(long)]
    raw: bool,

    /// Record back-to-back timestamps and count those divisible by N.
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    modulus: Option<u64>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if !(args.outlier_percentile > 0.0 && args.outlier_percentile <= 1.0) {
        error!(
            outlier_percentile = args.outlier_percentile,
            "outlier percentile must be in (0, 1]"
        );
        return ExitCode::from(1);
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(CliError::Measurement(err @ Error::UnsupportedHardware(_))) => {
            error!(error = %err, "measurement session aborted");
            ExitCode::from(2)
        }
        Err(err) => {
            error!(error = %err, "measurement failed");
            ExitCode::from(1)
        }
    }
}

fn run(args: &Args) -> Result<(), CliError> {
    let mut calibrator = OverheadCalibrator::new()
        .samples(args.samples)
        .warmup(args.warmup)
        .start_variant(args.start)
        .end_variant(args.end)
        .max_retries(args.max_retries)
        .outlier_percentile(args.outlier_percentile);
    if args.no_system_checks {
        calibrator = calibrator.skip_system_checks();
    }

    let report = calibrator.run()?;

    if args.json {
        println!("{}", to_json_pretty(&report)?);
    } else {
        print!("{}", format_report(&report));
    }

    if args.raw {
        let line: Vec<String> = report.samples.iter().map(|s| s.to_string()).collect();
        println!("{}", line.join(" "));
    }

    if let Some(modulus) = args.modulus {
        let trace = calibrator.sampler().collect_timestamps(args.samples);
        let count = trace.iter().filter(|t| t.cycles() % modulus == 0).count();
        println!(
            "Out of {} timestamps {} were multiples of {}",
            trace.len(),
            count,
            modulus
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modulus_zero_is_rejected() {
        let err = Args::try_parse_from(["tsc-overhead", "--modulus", "0"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn modulus_accepts_positive() {
        let args = Args::try_parse_from(["tsc-overhead", "--modulus", "38"]).unwrap();
        assert_eq!(args.modulus, Some(38));
    }

    #[test]
    fn serialize_failure_is_an_error() {
        let json_err = serde_json::from_str::<u64>("not json").unwrap_err();
        let err = CliError::from(json_err);
        assert!(matches!(err, CliError::Serialize(_)));
        assert!(err.to_string().starts_with("failed to serialize report"));
    }
}
