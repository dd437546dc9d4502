//! Error taxonomy for overhead measurement.

use serde::{Deserialize, Serialize};

use crate::types::Timestamp;

/// Convenience alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors produced while reading the counter or summarizing samples.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The counter went backward between two readings.
    ///
    /// Caused by a counter reset, migration to a core with a desynchronized
    /// counter, or missing serialization. The sample must be discarded; it
    /// can be retaken.
    #[error("counter went backward: start {start}, end {end}")]
    InvalidSample {
        /// First reading of the pair.
        start: Timestamp,
        /// Second reading of the pair.
        end: Timestamp,
    },

    /// Statistics were requested on zero samples.
    #[error("statistics are undefined for an empty sample set")]
    EmptyInput,

    /// The processor lacks an instruction the clock readers depend on.
    #[error("unsupported hardware: {0}")]
    UnsupportedHardware(MissingFeature),
}

impl Error {
    /// Whether the caller may discard the offending sample and try again.
    ///
    /// Only `InvalidSample` is recoverable. `EmptyInput` is a caller bug and
    /// `UnsupportedHardware` ends the measurement session.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::InvalidSample { .. })
    }
}

/// Processor capability missing for the clock readers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissingFeature {
    /// CPUID leaf 1 does not report a timestamp counter (`rdtsc`).
    Tsc,
    /// CPUID leaf 0x8000_0001 does not report `rdtscp`.
    Rdtscp,
    /// SSE2 is required for `lfence`.
    Sse2,
}

impl std::fmt::Display for MissingFeature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MissingFeature::Tsc => write!(f, "rdtsc is not available"),
            MissingFeature::Rdtscp => write!(f, "rdtscp is not available"),
            MissingFeature::Sse2 => write!(f, "lfence (SSE2) is not available"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_invalid_sample_is_recoverable() {
        let invalid = Error::InvalidSample {
            start: Timestamp::new(10),
            end: Timestamp::new(5),
        };
        assert!(invalid.is_recoverable());
        assert!(!Error::EmptyInput.is_recoverable());
        assert!(!Error::UnsupportedHardware(MissingFeature::Rdtscp).is_recoverable());
    }

    #[test]
    fn test_error_messages() {
        let invalid = Error::InvalidSample {
            start: Timestamp::new(10),
            end: Timestamp::new(5),
        };
        assert_eq!(invalid.to_string(), "counter went backward: start 10, end 5");

        let hw = Error::UnsupportedHardware(MissingFeature::Tsc);
        assert!(hw.to_string().contains("rdtsc"));
    }
}
