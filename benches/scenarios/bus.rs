//! Synth bus with many overlapping voices, the worst case a burst produces.

use std::{collections::VecDeque, hint::black_box};

use blockdub::{
    audio::instruments,
    synth::{BusMessage, SynthBus},
};
use criterion::{BenchmarkId, Criterion};

use crate::BLOCK_SIZES;

const SAMPLE_RATE: f32 = 48_000.0;

fn loaded_bus(voices: usize) -> SynthBus<VecDeque<BusMessage>> {
    let mut queue = VecDeque::new();
    queue.push_back(BusMessage::SetVolume(0.8));
    for i in 0..voices {
        // mix of tiers, a few whales
        let sats = [40_000u64, 3_000_000, 30_000_000, 200_000_000][i % 4];
        if let Some(spec) = instruments::for_transaction(sats + i as u64) {
            queue.push_back(BusMessage::Play(spec));
        }
    }
    SynthBus::new(SAMPLE_RATE, queue)
}

pub fn bench_bus(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/bus");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        for voices in [8usize, 32, 64] {
            let mut bus = loaded_bus(voices);
            bus.render_block(&mut buffer);
            let id = BenchmarkId::new(format!("{voices}_voices"), size);
            group.bench_with_input(id, &size, |b, _| {
                b.iter(|| bus.render_block(black_box(&mut buffer)))
            });
        }
    }

    group.finish();
}
