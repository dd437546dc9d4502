//! Counter values and the samples derived from them.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// The two 32-bit halves written by `rdtsc`/`rdtscp` (EDX:EAX).
///
/// Meaningless on their own; always [`combine`](RawTimestamp::combine) before use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RawTimestamp {
    /// Upper 32 bits (EDX).
    pub high: u32,
    /// Lower 32 bits (EAX).
    pub low: u32,
}

impl RawTimestamp {
    /// Create a raw reading from its two halves.
    #[inline]
    pub const fn new(high: u32, low: u32) -> Self {
        Self { high, low }
    }

    /// Fold the halves into one 64-bit counter value.
    #[inline]
    pub const fn combine(self) -> Timestamp {
        Timestamp(((self.high as u64) << 32) | self.low as u64)
    }
}

/// A 64-bit timestamp counter value.
///
/// Readings taken in program order on the same core never decrease.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Wrap a raw counter value.
    #[inline]
    pub const fn new(cycles: u64) -> Self {
        Self(cycles)
    }

    /// The counter value in cycles.
    #[inline]
    pub const fn cycles(self) -> u64 {
        self.0
    }
}

impl From<RawTimestamp> for Timestamp {
    #[inline]
    fn from(raw: RawTimestamp) -> Self {
        raw.combine()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Elapsed cycles between two adjacent timestamps.
///
/// Only constructible from an ordered pair, so a value of this type is never
/// the wrapped result of a backward counter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct OverheadSample(u64);

impl OverheadSample {
    /// Compute `end - start`, rejecting a counter that went backward.
    #[inline]
    pub fn between(start: Timestamp, end: Timestamp) -> Result<Self> {
        end.0
            .checked_sub(start.0)
            .map(Self)
            .ok_or(Error::InvalidSample { start, end })
    }

    /// Build a sample from an already-validated cycle count.
    #[inline]
    pub const fn from_cycles(cycles: u64) -> Self {
        Self(cycles)
    }

    /// Elapsed cycles.
    #[inline]
    pub const fn cycles(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for OverheadSample {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which clock reader to invoke at a call site.
///
/// The fence placement is the whole difference between the two, so callers
/// always name the variant explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClockVariant {
    /// `rdtscp; lfence`.
    ///
    /// `rdtscp` waits for earlier instructions to retire; the trailing
    /// `lfence` keeps later instructions from starting before the read.
    /// Marks the end of a measured interval.
    SerializingAfter,

    /// `lfence; rdtsc; lfence`.
    ///
    /// Neither earlier nor later instructions cross the read. Marks the start
    /// of a measured interval, after setup work has fully retired.
    SerializingBeforeAfter,
}

impl ClockVariant {
    /// Both variants, in declaration order.
    pub const ALL: [ClockVariant; 2] = [
        ClockVariant::SerializingAfter,
        ClockVariant::SerializingBeforeAfter,
    ];

    /// The instruction sequence this variant emits.
    pub fn instructions(self) -> &'static str {
        match self {
            ClockVariant::SerializingAfter => "rdtscp; lfence",
            ClockVariant::SerializingBeforeAfter => "lfence; rdtsc; lfence",
        }
    }
}

impl std::fmt::Display for ClockVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClockVariant::SerializingAfter => write!(f, "serializing-after"),
            ClockVariant::SerializingBeforeAfter => write!(f, "serializing-before-after"),
        }
    }
}

impl std::str::FromStr for ClockVariant {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "serializing-after" | "after" | "rdtscp" => Ok(ClockVariant::SerializingAfter),
            "serializing-before-after" | "before-after" | "fenced" | "rdtsc" => {
                Ok(ClockVariant::SerializingBeforeAfter)
            }
            other => Err(format!(
                "unknown clock variant '{}', expected 'serializing-after' or \
                 'serializing-before-after'",
                other
            )),
        }
    }
}
