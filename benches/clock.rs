use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use tsc_overhead::{read_timestamp, sample_overhead, ClockVariant};

fn bench_readers(c: &mut Criterion) {
    let mut group = c.benchmark_group("clock_reader");
    for variant in ClockVariant::ALL {
        group.bench_function(variant.to_string(), |b| {
            b.iter(|| black_box(read_timestamp(black_box(variant))));
        });
    }
    group.finish();
}

fn bench_sampler(c: &mut Criterion) {
    let mut group = c.benchmark_group("sample_overhead");
    group.bench_function("before_after_to_before_after", |b| {
        b.iter(|| {
            black_box(sample_overhead(
                ClockVariant::SerializingBeforeAfter,
                ClockVariant::SerializingBeforeAfter,
            ))
        });
    });
    group.bench_function("before_after_to_after", |b| {
        b.iter(|| {
            black_box(sample_overhead(
                ClockVariant::SerializingBeforeAfter,
                ClockVariant::SerializingAfter,
            ))
        });
    });
    group.finish();
}

criterion_group!(benches, bench_readers, bench_sampler);
criterion_main!(benches);
