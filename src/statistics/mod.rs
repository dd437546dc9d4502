//! Statistical summaries of overhead samples.
//!
//! This module provides:
//! - Mean and population variance with overflow-safe accumulation
//! - Order statistics (min, max, median, tail percentiles)
//! - Lag-1 autocorrelation of the sample sequence

mod autocorrelation;
mod moments;
mod quantile;

pub use autocorrelation::{lag1_autocorrelation, CORRELATION_WARNING_THRESHOLD};
pub use moments::{compute_statistics, Statistics};
pub use quantile::{compute_quantile, Summary};
