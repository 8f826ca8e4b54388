//! Particle step and draw with a crowded field.

use std::hint::black_box;

use blockdub::{
    particles::{DisplayList, ParticleEngine},
    tx::Transaction,
};
use criterion::{BenchmarkId, Criterion};
use rand::{rngs::SmallRng, SeedableRng};

pub fn bench_particles(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/particles");

    for count in [100usize, 1_000, 3_000] {
        let mut particles = ParticleEngine::new(SmallRng::seed_from_u64(2));
        for n in 0..count {
            particles.add_transaction(Transaction::new(n.to_string(), 10_000 * n as u64, 5.0));
        }
        let mut display = DisplayList::new();

        group.bench_with_input(BenchmarkId::new("draw", count), &count, |b, _| {
            b.iter(|| {
                display.clear();
                particles.draw(black_box(&mut display));
                black_box(display.len())
            })
        });
    }

    group.finish();
}
