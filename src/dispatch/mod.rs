//! Beat-quantized dispatch of pending transactions.
//!
//! The dispatcher never sleeps. The host asks it for one [`TickOutcome`] at a
//! time, acts on the outcome, and waits `outcome.delay` before ticking again
//! (see [`RepeatingTimer`]).

pub mod clock;
pub mod queue;
pub mod timer;

use std::time::Duration;

use rand::Rng;

pub use clock::{step_duration, BeatClock, BEATS_PER_BAR};
pub use queue::{PendingQueue, QUEUE_CAP, QUEUE_TRIM};
pub use timer::RepeatingTimer;

use crate::tx::Transaction;

pub const STRONG_BEAT_PROBABILITY: f64 = 0.95;
pub const WEAK_BEAT_PROBABILITY: f64 = 0.6;
/// Chance of an unpitched ghost cue on an even beat that did not fire.
pub const GHOST_PROBABILITY: f64 = 0.2;
/// Chance of the skank accent when nothing was dispatched on a skank beat.
pub const ACCENT_PROBABILITY: f64 = 0.3;

/// The grid position a tick happened on, and whether it carries the skank
/// accent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Beat {
    pub index: u8,
    pub accent: bool,
}

impl Beat {
    pub fn plain(index: u8) -> Self {
        Self {
            index,
            accent: false,
        }
    }

    pub fn is_skank(&self) -> bool {
        clock::is_skank(self.index)
    }

    pub fn is_strong(&self) -> bool {
        clock::is_strong(self.index)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TickEvent {
    /// The oldest pending transaction was popped.
    Dispatched(Transaction),
    /// Nothing popped; play the zero-value ghost texture.
    Ghost,
    Rest,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TickOutcome {
    pub beat: Beat,
    pub event: TickEvent,
    /// Wait this long before the next tick.
    pub delay: Duration,
}

impl TickOutcome {
    pub fn dispatched(&self) -> Option<&Transaction> {
        match &self.event {
            TickEvent::Dispatched(tx) => Some(tx),
            _ => None,
        }
    }
}

/// Owns the pending queue and the beat clock.
///
/// Randomness comes from the injected `R`, so a seeded generator (or a
/// constant stub) makes every decision reproducible.
#[derive(Debug)]
pub struct BeatDispatcher<R> {
    queue: PendingQueue,
    clock: BeatClock,
    rng: R,
    ticks: u64,
}

impl<R: Rng> BeatDispatcher<R> {
    pub fn new(rng: R) -> Self {
        Self {
            queue: PendingQueue::new(),
            clock: BeatClock::new(),
            rng,
            ticks: 0,
        }
    }

    /// Enqueue an ingested transaction. Never blocks.
    pub fn push(&mut self, tx: Transaction) {
        self.queue.push(tx);
    }

    pub fn queue(&self) -> &PendingQueue {
        &self.queue
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Index of the beat the next tick will play.
    pub fn beat_index(&self) -> u8 {
        self.clock.index()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Run one step of the grid.
    pub fn tick(&mut self) -> TickOutcome {
        let queue_len = self.queue.len();
        let index = self.clock.index();
        let delay = step_duration(index, queue_len);

        let probability = if self.clock.is_strong() {
            STRONG_BEAT_PROBABILITY
        } else {
            WEAK_BEAT_PROBABILITY
        };
        let popped = if queue_len > 0 && self.rng.gen_bool(probability) {
            self.queue.pop()
        } else {
            None
        };

        let event = match popped {
            Some(tx) => TickEvent::Dispatched(tx),
            None if self.clock.is_even() && self.rng.gen_bool(GHOST_PROBABILITY) => TickEvent::Ghost,
            None => TickEvent::Rest,
        };

        let accent = self.clock.is_skank()
            && (matches!(event, TickEvent::Dispatched(_)) || self.rng.gen_bool(ACCENT_PROBABILITY));

        tracing::trace!(
            beat = index,
            queue_len,
            delay_ms = delay.as_millis() as u64,
            dispatched = matches!(event, TickEvent::Dispatched(_)),
            accent,
            "tick"
        );

        self.clock.advance();
        self.ticks += 1;

        TickOutcome {
            beat: Beat { index, accent },
            event,
            delay,
        }
    }
}
