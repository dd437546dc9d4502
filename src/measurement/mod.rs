//! Counter reading and overhead sampling.
//!
//! This module provides:
//! - Clock readers with explicit fence placement (`rdtscp; lfence` and
//!   `lfence; rdtsc; lfence`)
//! - Overhead sampling from two back-to-back readings
//! - Collection of fixed-size sample sets with invalid-sample retry
//! - Optional percentile trimming of collected samples

mod clock;
mod outlier;
mod sampler;

pub use clock::{
    combine, read_raw, read_serializing_after, read_serializing_before_after, read_timestamp,
};
pub use outlier::{trim_outliers, OutlierStats};
pub use sampler::{sample_overhead, OverheadSampler, SampleCollection};
