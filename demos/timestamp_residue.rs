//! Record back-to-back fenced timestamps and bucket them by a modulus.
//!
//! If consecutive readings were always a fixed number of cycles apart, the
//! residues would cluster instead of spreading evenly.

use tsc_overhead::measurement::OverheadSampler;
use tsc_overhead::preflight::hardware_check;
use tsc_overhead::ClockVariant;

const TIMESTAMPS: usize = 16_384;
const MODULUS: u64 = 38;

fn main() -> Result<(), tsc_overhead::Error> {
    hardware_check()?;

    let sampler = OverheadSampler::new(
        ClockVariant::SerializingBeforeAfter,
        ClockVariant::SerializingBeforeAfter,
    );
    let trace = sampler.collect_timestamps(TIMESTAMPS);

    let count = trace.iter().filter(|t| t.cycles() % MODULUS == 0).count();
    println!(
        "Out of {} samples {} were multiples of {} (uniform expectation: {})",
        TIMESTAMPS,
        count,
        MODULUS,
        TIMESTAMPS as u64 / MODULUS
    );

    Ok(())
}
