//! Dispatcher ticks and queue pushes under a full backlog.

use std::hint::black_box;

use blockdub::{
    dispatch::{BeatDispatcher, QUEUE_CAP},
    tx::Transaction,
};
use criterion::Criterion;
use rand::{rngs::SmallRng, SeedableRng};

pub fn bench_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/dispatch");

    let mut dispatcher = BeatDispatcher::new(SmallRng::seed_from_u64(1));
    for n in 0..QUEUE_CAP {
        dispatcher.push(Transaction::new(format!("{n:016x}"), 50_000, 3.0));
    }

    group.bench_function("push_at_cap", |b| {
        let mut n = 0u64;
        b.iter(|| {
            n += 1;
            dispatcher.push(black_box(Transaction::new("bench", n, 3.0)));
        })
    });

    group.bench_function("tick_backlogged", |b| {
        b.iter(|| {
            let outcome = dispatcher.tick();
            if outcome.dispatched().is_some() {
                dispatcher.push(Transaction::new("refill", 50_000, 3.0));
            }
            black_box(outcome)
        })
    });

    group.finish();
}
