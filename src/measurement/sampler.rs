//! Overhead sampling: two back-to-back counter reads and their difference.
//!
//! The clock variant at each of the two call sites decides what is measured:
//! - start and end both `SerializingBeforeAfter`: reader-to-reader cost with
//!   full serialization on each side.
//! - start `SerializingBeforeAfter`, end `SerializingAfter`: the minimal
//!   interval overhead seen when the pair brackets arbitrary code.
//!
//! A reading pair whose counter went backward is never turned into a
//! wrapped unsigned value; it surfaces as [`Error::InvalidSample`].

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::types::{ClockVariant, OverheadSample, RawTimestamp, Timestamp};

use super::clock::{read_serializing_after, read_serializing_before_after, read_timestamp};

/// Readings per iteration in [`OverheadSampler::collect_timestamps`].
const UNROLL: usize = 8;

/// Take two readings in immediate succession and return their difference.
///
/// Both variants are explicit: `start` is used for the first reading and
/// `end` for the second.
///
/// # Errors
///
/// [`Error::InvalidSample`] if the second reading is smaller than the first.
#[inline(always)]
pub fn sample_overhead(start: ClockVariant, end: ClockVariant) -> Result<OverheadSample> {
    let (first, second) = read_pair(start, end);
    OverheadSample::between(first.combine(), second.combine())
}

/// Resolve both variants before the first read so nothing but the two
/// readers runs between them.
#[inline(always)]
fn read_pair(start: ClockVariant, end: ClockVariant) -> (RawTimestamp, RawTimestamp) {
    use ClockVariant::{SerializingAfter, SerializingBeforeAfter};

    match (start, end) {
        (SerializingAfter, SerializingAfter) => {
            (read_serializing_after(), read_serializing_after())
        }
        (SerializingAfter, SerializingBeforeAfter) => {
            (read_serializing_after(), read_serializing_before_after())
        }
        (SerializingBeforeAfter, SerializingAfter) => {
            (read_serializing_before_after(), read_serializing_after())
        }
        (SerializingBeforeAfter, SerializingBeforeAfter) => {
            (read_serializing_before_after(), read_serializing_before_after())
        }
    }
}

/// Valid samples gathered by [`OverheadSampler::collect`].
#[derive(Debug, Clone, Default)]
pub struct SampleCollection {
    /// Valid samples in collection order.
    pub samples: Vec<OverheadSample>,
    /// Number of invalid samples that were discarded and retaken.
    pub discarded: usize,
}

impl SampleCollection {
    /// Sample values as plain cycle counts.
    pub fn cycles(&self) -> Vec<u64> {
        self.samples.iter().map(|s| s.cycles()).collect()
    }
}

/// Collects a fixed number of overhead samples with a chosen pair of readers.
#[derive(Debug, Clone)]
pub struct OverheadSampler {
    start_variant: ClockVariant,
    end_variant: ClockVariant,
    /// Samples taken and thrown away before collection.
    warmup_iterations: usize,
    /// Total invalid samples tolerated per `collect` call.
    max_retries: usize,
}

impl OverheadSampler {
    /// Create a sampler that reads with `start_variant` then `end_variant`.
    ///
    /// No warmup; up to 16 invalid samples are retaken per collection.
    pub fn new(start_variant: ClockVariant, end_variant: ClockVariant) -> Self {
        Self {
            start_variant,
            end_variant,
            warmup_iterations: 0,
            max_retries: 16,
        }
    }

    /// Set the number of warmup samples discarded before collection.
    pub fn with_warmup(mut self, warmup_iterations: usize) -> Self {
        self.warmup_iterations = warmup_iterations;
        self
    }

    /// Set how many invalid samples may be retaken before giving up.
    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Variant used for the first reading.
    pub fn start_variant(&self) -> ClockVariant {
        self.start_variant
    }

    /// Variant used for the second reading.
    pub fn end_variant(&self) -> ClockVariant {
        self.end_variant
    }

    /// Take one sample with this sampler's variants.
    #[inline]
    pub fn sample(&self) -> Result<OverheadSample> {
        sample_overhead(self.start_variant, self.end_variant)
    }

    /// Run warmup samples, ignoring their values and validity.
    ///
    /// Settles the instruction cache, branch predictors, and frequency
    /// before the measured samples.
    pub fn warmup(&self) {
        for _ in 0..self.warmup_iterations {
            let _ = std::hint::black_box(self.sample());
        }
    }

    /// Warm up, then collect exactly `count` valid samples.
    ///
    /// Invalid samples are discarded and retaken.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyInput`] if `count` is zero.
    /// - [`Error::InvalidSample`] (the last one seen) once more than
    ///   `max_retries` samples have been discarded.
    pub fn collect(&self, count: usize) -> Result<SampleCollection> {
        if count == 0 {
            return Err(Error::EmptyInput);
        }

        debug!(
            start = %self.start_variant,
            end = %self.end_variant,
            count,
            warmup = self.warmup_iterations,
            "collecting overhead samples"
        );

        self.warmup();
        self.collect_from(count, || self.sample())
    }

    /// Pull samples from `next` until `count` are valid, retaking invalid ones.
    fn collect_from<F>(&self, count: usize, mut next: F) -> Result<SampleCollection>
    where
        F: FnMut() -> Result<OverheadSample>,
    {
        let mut samples = Vec::with_capacity(count);
        let mut discarded = 0usize;

        while samples.len() < count {
            match next() {
                Ok(sample) => samples.push(sample),
                Err(err @ Error::InvalidSample { .. }) => {
                    discarded += 1;
                    warn!(
                        index = samples.len(),
                        discarded,
                        error = %err,
                        "discarding invalid overhead sample"
                    );
                    if discarded > self.max_retries {
                        return Err(err);
                    }
                }
                Err(err) => return Err(err),
            }
        }

        Ok(SampleCollection { samples, discarded })
    }

    /// Record `count` back-to-back timestamps with the start variant.
    ///
    /// The loop is unrolled so loop control adds as little as possible
    /// between consecutive readings.
    pub fn collect_timestamps(&self, count: usize) -> Vec<Timestamp> {
        let variant = self.start_variant;
        let mut trace = vec![Timestamp::default(); count];

        let mut chunks = trace.chunks_exact_mut(UNROLL);
        for chunk in &mut chunks {
            chunk[0] = read_timestamp(variant);
            chunk[1] = read_timestamp(variant);
            chunk[2] = read_timestamp(variant);
            chunk[3] = read_timestamp(variant);
            chunk[4] = read_timestamp(variant);
            chunk[5] = read_timestamp(variant);
            chunk[6] = read_timestamp(variant);
            chunk[7] = read_timestamp(variant);
        }
        for slot in chunks.into_remainder() {
            *slot = read_timestamp(variant);
        }

        trace
    }
}

impl Default for OverheadSampler {
    fn default() -> Self {
        Self::new(
            ClockVariant::SerializingBeforeAfter,
            ClockVariant::SerializingBeforeAfter,
        )
    }
}
