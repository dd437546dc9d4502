//! Print raw reader-to-reader overhead samples.
//!
//! Both call sites use `rdtscp; lfence`. Invalid samples are retaken, so the
//! printed array only ever contains valid deltas.

use tsc_overhead::measurement::OverheadSampler;
use tsc_overhead::preflight::hardware_check;
use tsc_overhead::{compute_statistics, ClockVariant};

const SAMPLES: usize = 1000;

fn main() -> Result<(), tsc_overhead::Error> {
    hardware_check()?;

    let sampler =
        OverheadSampler::new(ClockVariant::SerializingAfter, ClockVariant::SerializingAfter)
            .with_warmup(100);
    let collection = sampler.collect(SAMPLES)?;

    let line: Vec<String> = collection.samples.iter().map(|s| s.to_string()).collect();
    println!("{}", line.join(" "));

    let stats = compute_statistics(&collection.samples)?;
    println!(
        "\nmean {:.2} cycles, variance {:.2}, {} discarded",
        stats.mean, stats.variance, collection.discarded
    );

    Ok(())
}
