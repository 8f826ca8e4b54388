//! Benchmarks for the diffuse reverb, the most expensive shared effect.

use std::hint::black_box;

use blockdub::dsp::reverb::DiffuseReverb;
use criterion::{BenchmarkId, Criterion};

use crate::BLOCK_SIZES;

pub fn bench_reverb(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/reverb");

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size).map(|i| if i == 0 { 1.0 } else { 0.0 }).collect();
        let mut buffer = vec![0.0f32; size];
        let mut reverb = DiffuseReverb::new(48_000.0, 4.0, 0.35);

        group.bench_with_input(BenchmarkId::new("process", size), &size, |b, _| {
            b.iter(|| {
                for (out, &x) in buffer.iter_mut().zip(input.iter()) {
                    *out = reverb.process(black_box(x));
                }
            })
        });
    }

    group.finish();
}
