//! Benchmarks for state-variable filter.

use std::hint::black_box;

use blockdub::dsp::filter::SVFilter;
use criterion::{BenchmarkId, Criterion};

use crate::BLOCK_SIZES;

const SAMPLE_RATE: f32 = 48_000.0;

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size)
            .map(|i| (i as f32 / size as f32) * 2.0 - 1.0)
            .collect();

        for (name, mut filter) in [
            ("lowpass", SVFilter::lowpass(1_800.0)),
            ("highpass", SVFilter::highpass(6_000.0)),
            ("bandpass", SVFilter::bandpass(900.0)),
        ] {
            filter.set_resonance(0.4);
            let mut buffer = input.clone();
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    buffer.copy_from_slice(&input);
                    filter.render(black_box(&mut buffer), black_box(SAMPLE_RATE));
                })
            });
        }
    }

    group.finish();
}
