//! Synthetic mempool traffic so the binary runs without a network feed.

use std::time::Duration;

use rand::Rng;

use super::{random_id, FeedEvent};
use crate::tx::{Block, MempoolStats, Transaction};

const BLOCK_INTERVAL: Duration = Duration::from_secs(40);
const STATS_INTERVAL: Duration = Duration::from_secs(5);
/// Probability per generated transaction that a burst starts.
const BURST_CHANCE: f64 = 0.01;
const BURST_LENGTH: Duration = Duration::from_secs(3);
const BURST_MULTIPLIER: f64 = 8.0;
/// A host that stalls longer than this skips ahead instead of replaying.
const MAX_CATCH_UP: Duration = Duration::from_secs(2);

/// log10 range of generated values in sats: 1,000 sats to ~5 BTC.
const VALUE_LOG10: (f64, f64) = (3.0, 8.7);
const MAX_FEE_RATE: f64 = 400.0;
const START_HEIGHT: u64 = 870_000;

/// Bursty generator. Interarrival times are exponential; values are
/// log-uniform; fee rates are skewed low with a long tail.
#[derive(Debug)]
pub struct DemoFeed<R> {
    rng: R,
    rate: f64,
    next_tx: Duration,
    next_block: Duration,
    next_stats: Duration,
    burst_until: Duration,
    height: u64,
    emitted: u64,
    announced: bool,
}

impl<R: Rng> DemoFeed<R> {
    /// `rate` is the calm average in transactions per second.
    pub fn new(rng: R, rate: f64) -> Self {
        Self {
            rng,
            rate: rate.max(f64::EPSILON),
            next_tx: Duration::ZERO,
            next_block: BLOCK_INTERVAL,
            next_stats: Duration::ZERO,
            burst_until: Duration::ZERO,
            height: START_HEIGHT,
            emitted: 0,
            announced: false,
        }
    }

    /// Append every event due at `now` (time since the feed started).
    pub fn poll(&mut self, now: Duration, out: &mut Vec<FeedEvent>) {
        if !self.announced {
            self.announced = true;
            out.push(FeedEvent::Status { connected: true });
        }

        if now.saturating_sub(self.next_tx) > MAX_CATCH_UP {
            tracing::debug!(behind_ms = (now - self.next_tx).as_millis() as u64, "demo feed skipping ahead");
            self.next_tx = now;
        }
        while self.next_tx <= now {
            let at = self.next_tx;
            out.push(FeedEvent::Transaction(self.transaction(at)));
            self.next_tx = at + self.interarrival(at);
        }

        if now >= self.next_block {
            self.height += 1;
            out.push(FeedEvent::Block(Block {
                height: self.height,
                timestamp: now.as_secs(),
            }));
            self.next_block = now + BLOCK_INTERVAL;
        }

        if now >= self.next_stats {
            out.push(FeedEvent::Stats(MempoolStats {
                count: Some(self.emitted),
                vsize: Some(self.emitted * 180),
                total_fee: None,
            }));
            self.next_stats = now + STATS_INTERVAL;
        }
    }

    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    fn transaction(&mut self, at: Duration) -> Transaction {
        if at >= self.burst_until && self.rng.gen_bool(BURST_CHANCE) {
            self.burst_until = at + BURST_LENGTH;
            tracing::debug!("demo burst");
        }
        let exponent = self.rng.gen_range(VALUE_LOG10.0..VALUE_LOG10.1);
        let skew: f64 = self.rng.gen();
        self.emitted += 1;
        Transaction {
            id: random_id(&mut self.rng),
            value: 10f64.powf(exponent).round() as u64,
            fee_rate: 1.0 + (MAX_FEE_RATE - 1.0) * skew.powi(4),
            timestamp: None,
        }
    }

    fn interarrival(&mut self, at: Duration) -> Duration {
        let rate = if at < self.burst_until {
            self.rate * BURST_MULTIPLIER
        } else {
            self.rate
        };
        let u: f64 = self.rng.gen();
        // strictly positive so the loop always progresses
        Duration::from_secs_f64((-(1.0 - u).ln() / rate).max(1e-4))
    }
}
