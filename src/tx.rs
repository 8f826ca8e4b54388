//! Normalized events delivered by the ingestion layer.

use serde::{Deserialize, Serialize};

use crate::mapping::{hue_for_fee_rate, is_whale, sats_to_btc};

/// A mempool transaction. Immutable once queued.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    /// Satoshis moved.
    pub value: u64,
    /// sat/vB.
    pub fee_rate: f64,
    pub timestamp: Option<u64>,
}

impl Transaction {
    pub fn new(id: impl Into<String>, value: u64, fee_rate: f64) -> Self {
        Self {
            id: id.into(),
            value,
            fee_rate,
            timestamp: None,
        }
    }

    pub fn btc(&self) -> f64 {
        sats_to_btc(self.value)
    }

    pub fn is_whale(&self) -> bool {
        is_whale(self.value)
    }

    pub fn hue(&self) -> f32 {
        hue_for_fee_rate(self.fee_rate)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub height: u64,
    pub timestamp: u64,
}

/// Mempool snapshot; shown by the shell, not used by the core.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MempoolStats {
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub vsize: Option<u64>,
    #[serde(default)]
    pub total_fee: Option<u64>,
}
