//! Timestamp counter readers with explicit fence placement.
//!
//! Two readers are provided, selected by [`ClockVariant`]:
//! - `SerializingAfter`: `rdtscp; lfence`
//! - `SerializingBeforeAfter`: `lfence; rdtsc; lfence`
//!
//! Both are emitted as a single `asm!` block so the instruction order is
//! exactly what is written here. A compiler fence on either side keeps the
//! compiler from moving surrounding memory operations across the read.
//!
//! No CPU feature probing happens per call. Run
//! [`hardware_check`](crate::preflight::hardware_check) once before sampling.

use std::sync::atomic::{compiler_fence, Ordering};

use crate::types::{ClockVariant, RawTimestamp, Timestamp};

/// Read the counter with the given variant, returning the raw EDX:EAX pair.
#[inline(always)]
pub fn read_raw(variant: ClockVariant) -> RawTimestamp {
    match variant {
        ClockVariant::SerializingAfter => read_serializing_after(),
        ClockVariant::SerializingBeforeAfter => read_serializing_before_after(),
    }
}

/// Read the counter with the given variant and combine it into a [`Timestamp`].
#[inline(always)]
pub fn read_timestamp(variant: ClockVariant) -> Timestamp {
    read_raw(variant).combine()
}

/// Combine the two halves of a counter reading.
///
/// Always recomputed from the inputs; `(high << 32) | low`.
#[inline(always)]
pub const fn combine(high: u32, low: u32) -> Timestamp {
    RawTimestamp::new(high, low).combine()
}

/// `rdtscp; lfence`.
#[inline(always)]
pub fn read_serializing_after() -> RawTimestamp {
    compiler_fence(Ordering::SeqCst);

    let high: u32;
    let low: u32;
    // SAFETY: rdtscp and lfence only write EDX:EAX and ECX (TSC_AUX), all
    // declared as outputs. Availability is checked once by preflight.
    unsafe {
        std::arch::asm!(
            "rdtscp",
            "lfence",
            out("edx") high,
            out("eax") low,
            out("ecx") _,
            options(nostack, preserves_flags),
        );
    }

    compiler_fence(Ordering::SeqCst);
    RawTimestamp::new(high, low)
}

/// `lfence; rdtsc; lfence`.
#[inline(always)]
pub fn read_serializing_before_after() -> RawTimestamp {
    compiler_fence(Ordering::SeqCst);

    let high: u32;
    let low: u32;
    // SAFETY: lfence has no register effects; rdtsc writes EDX:EAX only.
    unsafe {
        std::arch::asm!(
            "lfence",
            "rdtsc",
            "lfence",
            out("edx") high,
            out("eax") low,
            options(nostack, preserves_flags),
        );
    }

    compiler_fence(Ordering::SeqCst);
    RawTimestamp::new(high, low)
}
