//! Normalizing the ingestion feed.
//!
//! The wire format is one JSON object per line, tagged by `type`:
//!
//! ```text
//! {"type":"transaction","id":"ab12..","value":150000,"feeRate":12.5}
//! {"type":"block","height":871234,"timestamp":1718000000}
//! {"type":"stats","count":41233,"vsize":18000000,"totalFee":3100000}
//! {"type":"status","connected":false}
//! ```
//!
//! Partial transactions are defaulted rather than rejected.

pub mod demo;

use rand::Rng;
use serde::Deserialize;

pub use demo::DemoFeed;

use crate::{
    error::Result,
    tx::{Block, MempoolStats, Transaction},
};

/// Sats per vbyte used to estimate a missing value from the size.
pub const SATS_PER_VBYTE_ESTIMATE: u64 = 250;
/// Value assumed when neither value nor size is known.
pub const FALLBACK_VALUE_SATS: u64 = 50_000;
pub const FALLBACK_FEE_RATE: f64 = 1.0;

/// A normalized event, ready for the session callbacks.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    Transaction(Transaction),
    Block(Block),
    Stats(MempoolStats),
    /// Upstream connection state, for display only.
    Status { connected: bool },
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum WireEvent {
    Transaction(WireTransaction),
    Block(Block),
    Stats(MempoolStats),
    Status { connected: bool },
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireTransaction {
    id: Option<String>,
    value: Option<f64>,
    fee_rate: Option<f64>,
    vsize: Option<f64>,
    timestamp: Option<u64>,
}

impl WireTransaction {
    fn normalize<R: Rng>(self, rng: &mut R) -> Transaction {
        let id = match self.id {
            Some(id) if !id.is_empty() => id,
            _ => random_id(rng),
        };
        let value = match (self.value, self.vsize) {
            (Some(v), _) if v.is_finite() && v >= 0.0 => v.round() as u64,
            (_, Some(vsize)) if vsize.is_finite() && vsize > 0.0 => {
                (vsize.round() as u64).saturating_mul(SATS_PER_VBYTE_ESTIMATE)
            }
            _ => FALLBACK_VALUE_SATS,
        };
        let fee_rate = self
            .fee_rate
            .filter(|f| f.is_finite() && *f > 0.0)
            .unwrap_or(FALLBACK_FEE_RATE);
        Transaction {
            id,
            value,
            fee_rate,
            timestamp: self.timestamp,
        }
    }
}

/// 16 lowercase hex digits.
pub fn random_id<R: Rng>(rng: &mut R) -> String {
    format!("{:016x}", rng.gen::<u64>())
}

/// Decode one line. Blank lines yield `Ok(None)`.
pub fn parse_line<R: Rng>(line: &str, rng: &mut R) -> Result<Option<FeedEvent>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let event = match serde_json::from_str::<WireEvent>(line)? {
        WireEvent::Transaction(wire) => FeedEvent::Transaction(wire.normalize(rng)),
        WireEvent::Block(block) => FeedEvent::Block(block),
        WireEvent::Stats(stats) => FeedEvent::Stats(stats),
        WireEvent::Status { connected } => FeedEvent::Status { connected },
    };
    Ok(Some(event))
}

/// Like [`parse_line`], but a bad line is logged and skipped.
pub fn decode_line<R: Rng>(line: &str, rng: &mut R) -> Option<FeedEvent> {
    match parse_line(line, rng) {
        Ok(event) => event,
        Err(err) => {
            tracing::warn!(%err, line = %truncate(line, 120), "skipping malformed feed line");
            None
        }
    }
}

fn truncate(line: &str, max: usize) -> &str {
    match line.char_indices().nth(max) {
        Some((i, _)) => &line[..i],
        None => line,
    }
}
