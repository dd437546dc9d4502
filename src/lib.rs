//! # tsc-overhead
//!
//! Measure what it costs to read the x86 timestamp counter, and how noisy
//! that cost is, before using the counter to time anything else.
//!
//! The crate provides:
//! - Two clock readers with explicit fence placement
//!   (`rdtscp; lfence` and `lfence; rdtsc; lfence`)
//! - An overhead sampler that reads twice and subtracts, rejecting
//!   backward counters instead of wrapping them
//! - Mean and population variance over the collected samples
//!
//! ## Quick Start
//!
//! ```no_run
//! use tsc_overhead::{compute_statistics, sample_overhead, ClockVariant};
//!
//! let mut samples = Vec::with_capacity(1000);
//! while samples.len() < 1000 {
//!     match sample_overhead(
//!         ClockVariant::SerializingBeforeAfter,
//!         ClockVariant::SerializingBeforeAfter,
//!     ) {
//!         Ok(sample) => samples.push(sample),
//!         Err(err) if err.is_recoverable() => continue,
//!         Err(err) => return Err(err),
//!     }
//! }
//!
//! let stats = compute_statistics(&samples)?;
//! println!("overhead: {:.1} cycles (variance {:.1})", stats.mean, stats.variance);
//! # Ok::<(), tsc_overhead::Error>(())
//! ```
//!
//! For a full session with preflight checks and a report, use
//! [`OverheadCalibrator`].

#![warn(missing_docs)]
#![warn(clippy::all)]

#[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
compile_error!("tsc-overhead reads the x86 timestamp counter and only builds for x86/x86_64");

// Core modules
mod calibrator;
mod config;
mod error;
mod result;
mod types;

// Functional modules
pub mod measurement;
pub mod output;
pub mod preflight;
pub mod statistics;

// Re-exports for public API
pub use calibrator::OverheadCalibrator;
pub use config::Config;
pub use error::{Error, MissingFeature, Result};
pub use measurement::{combine, read_timestamp, sample_overhead};
pub use result::{MeasurementQuality, Metadata, OverheadReport};
pub use statistics::{compute_statistics, Statistics};
pub use types::{ClockVariant, OverheadSample, RawTimestamp, Timestamp};

/// Run a calibration session with the default configuration.
///
/// 1,000 samples with `SerializingBeforeAfter` at both call sites.
///
/// # Errors
///
/// See [`OverheadCalibrator::run`].
pub fn measure() -> Result<OverheadReport> {
    OverheadCalibrator::new().run()
}
