use std::time::Duration;

/*
Beat Grid and Swing
===================

The dispatcher runs on a 16-step grid (one bar of sixteenths). Each step has
a rhythmic role:

  index    0  1  2  3  4  5  6  7  8  9 10 11 12 13 14 15
  strong   X           X           X           X            index % 4 == 0
  skank                X                       X            index ∈ {4, 12}
  parity   e  o  e  o  e  o  e  o  e  o  e  o  e  o  e  o

Swing
-----
Steps come in long/short pairs. With a swing factor s the even step lasts
base·s and the odd step base·(2 - s), so a pair always takes 2·base:

  s = 1.4   ████████████▌  █████                 (lazy shuffle)
  s = 1.8   ████████████████  ██                 (hard shuffle, busy mempool)

Congestion
----------
A long queue speeds the grid up, dividing each step by min(2.5, 1 + len/150),
and a floor of MIN_STEP_MS keeps a huge backlog from turning the beat into a
buzz.
*/

/// Steps per bar.
pub const BEATS_PER_BAR: u8 = 16;
/// Nominal step length before swing and congestion.
pub const BASE_STEP_MS: f64 = 150.0;
/// No step is ever shorter than this.
pub const MIN_STEP_MS: f64 = 40.0;

pub const SWING_CALM: f64 = 1.4;
pub const SWING_BUSY: f64 = 1.8;
/// Queue length above which the busy swing applies.
pub const BUSY_QUEUE_LEN: usize = 100;

pub const MAX_SPEEDUP: f64 = 2.5;
pub const SPEEDUP_QUEUE_SCALE: f64 = 150.0;

/// Position on the 16-step grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BeatClock {
    index: u8,
}

impl BeatClock {
    pub fn new() -> Self {
        Self { index: 0 }
    }

    pub fn index(&self) -> u8 {
        self.index
    }

    pub fn advance(&mut self) {
        self.index = (self.index + 1) % BEATS_PER_BAR;
    }

    pub fn is_strong(&self) -> bool {
        is_strong(self.index)
    }

    pub fn is_skank(&self) -> bool {
        is_skank(self.index)
    }

    pub fn is_even(&self) -> bool {
        self.index % 2 == 0
    }
}

pub fn is_strong(index: u8) -> bool {
    index % 4 == 0
}

pub fn is_skank(index: u8) -> bool {
    matches!(index % BEATS_PER_BAR, 4 | 12)
}

pub fn swing_factor(queue_len: usize) -> f64 {
    if queue_len > BUSY_QUEUE_LEN {
        SWING_BUSY
    } else {
        SWING_CALM
    }
}

/// Length of the step starting at `beat` with `queue_len` transactions
/// pending. This is the whole timing policy; the host only has to wait this
/// long before the next tick.
pub fn step_duration(beat: u8, queue_len: usize) -> Duration {
    let swing = swing_factor(queue_len);
    let raw = if beat % 2 == 0 {
        BASE_STEP_MS * swing
    } else {
        BASE_STEP_MS * (2.0 - swing)
    };
    let speedup = (1.0 + queue_len as f64 / SPEEDUP_QUEUE_SCALE).min(MAX_SPEEDUP);
    Duration::from_secs_f64((raw / speedup).max(MIN_STEP_MS) / 1000.0)
}
