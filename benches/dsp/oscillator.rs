//! Benchmarks for oscillator waveforms.

use std::hint::black_box;

use blockdub::dsp::oscillator::{OscillatorBlock, OscillatorWaveform};
use criterion::{BenchmarkId, Criterion};

use crate::BLOCK_SIZES;

const SAMPLE_RATE: f32 = 48_000.0;

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];
        for (name, waveform) in [
            ("sine", OscillatorWaveform::Sine),
            ("triangle", OscillatorWaveform::Triangle),
            ("square", OscillatorWaveform::Square),
            ("saw", OscillatorWaveform::Saw),
            ("noise", OscillatorWaveform::Noise),
        ] {
            let mut osc = OscillatorBlock::new(waveform, 1);
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| osc.render(black_box(&mut buffer), black_box(440.0), SAMPLE_RATE))
            });
        }
    }

    group.finish();
}
