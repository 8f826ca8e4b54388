//! The render path must not allocate. A counting allocator tracks heap calls
//! made by the current thread while the bus renders.

use std::{
    alloc::{GlobalAlloc, Layout, System},
    cell::Cell,
};

use blockdub::{
    audio::instruments,
    synth::{bus::MAX_VOICES, BusMessage, SynthBus},
};

struct CountingAlloc;

thread_local! {
    static HEAP_CALLS: Cell<usize> = const { Cell::new(0) };
}

fn bump() {
    let _ = HEAP_CALLS.try_with(|calls| calls.set(calls.get() + 1));
}

unsafe impl GlobalAlloc for CountingAlloc {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        bump();
        System.alloc(layout)
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        bump();
        System.dealloc(ptr, layout)
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        bump();
        System.realloc(ptr, layout, new_size)
    }
}

#[global_allocator]
static GLOBAL: CountingAlloc = CountingAlloc;

fn heap_calls_during(f: impl FnOnce()) -> usize {
    let before = HEAP_CALLS.with(Cell::get);
    f();
    HEAP_CALLS.with(Cell::get) - before
}

const SAMPLE_RATE: f32 = 48_000.0;

#[test]
fn rendering_a_burst_does_not_touch_the_heap() {
    let (mut tx, rx) = rtrb::RingBuffer::<BusMessage>::new(256);
    let mut bus = SynthBus::new(SAMPLE_RATE, rx);
    let mut out = vec![0.0f32; 512];

    // Enough voices to fill the pool and force stealing, covering every recipe.
    let mut burst = vec![BusMessage::SetVolume(0.8)];
    burst.extend(instruments::chime().into_iter().map(BusMessage::Play));
    for i in 0..MAX_VOICES as u64 {
        let sats = [1_000, 2_000_000, 40_000_000, 300_000_000][i as usize % 4];
        if let Some(spec) = instruments::for_transaction(sats) {
            burst.push(BusMessage::Play(spec));
        }
        burst.push(BusMessage::Play(instruments::shaker(i)));
    }
    burst.push(BusMessage::Play(instruments::organ_skank()));
    burst.push(BusMessage::Play(instruments::ghost(9)));

    for msg in burst {
        assert!(tx.push(msg).is_ok());
    }

    let calls = heap_calls_during(|| bus.render_block(&mut out));
    assert_eq!(calls, 0, "first block made {calls} heap calls");
    assert_eq!(bus.active_voices(), MAX_VOICES);

    // Voices finishing and freeing their slots.
    let calls = heap_calls_during(|| {
        for _ in 0..40 {
            bus.render_block(&mut out);
        }
    });
    assert_eq!(calls, 0, "render path made {calls} heap calls");
    assert!(bus.active_voices() < MAX_VOICES);

    assert!(tx.push(BusMessage::Silence).is_ok());
    let calls = heap_calls_during(|| bus.render_block(&mut out));
    assert_eq!(calls, 0);
    assert_eq!(bus.active_voices(), 0);
}

#[test]
fn oversized_host_blocks_are_chunked_without_allocating() {
    let (mut tx, rx) = rtrb::RingBuffer::<BusMessage>::new(8);
    let mut bus = SynthBus::new(SAMPLE_RATE, rx);
    let mut out = vec![0.0f32; blockdub::MAX_BLOCK_SIZE * 3 + 17];

    assert!(tx.push(BusMessage::SetVolume(1.0)).is_ok());
    assert!(tx.push(BusMessage::Play(instruments::whale_drone())).is_ok());

    let calls = heap_calls_during(|| bus.render_block(&mut out));
    assert_eq!(calls, 0);
    assert!(out.iter().any(|s| s.abs() > 0.0));
}
