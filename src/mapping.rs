//! Pure mappings from a transaction's economic signals to presentation
//! parameters: hue, bubble radius, whale status, instrument tier and pitch.

pub const SATS_PER_BTC: f64 = 100_000_000.0;

/// Value at which a transaction becomes a whale.
pub const WHALE_BTC: f64 = 1.0;
/// Display hue used for whales regardless of fee rate.
pub const WHALE_HUE: f32 = 45.0;

pub const MIN_RADIUS: f32 = 20.0;
pub const MAX_RADIUS: f32 = 180.0;

/// G mixolydian, G3 to A5: a major scale with a flatted seventh.
pub const SCALE: [f32; 16] = [
    196.00, // G3
    220.00, // A3
    246.94, // B3
    261.63, // C4
    293.66, // D4
    329.63, // E4
    349.23, // F4
    392.00, // G4
    440.00, // A4
    493.88, // B4
    523.25, // C5
    587.33, // D5
    659.25, // E5
    698.46, // F5
    783.99, // G5
    880.00, // A5
];

/// Fixed pitch of the whale drone (G1).
pub const WHALE_DRONE_HZ: f32 = 49.0;

#[inline]
pub fn sats_to_btc(sats: u64) -> f64 {
    sats as f64 / SATS_PER_BTC
}

/// Piecewise-linear fee-rate → hue (degrees).
///
/// | fee rate (sat/vB) | hue        |
/// | ----------------- | ---------- |
/// | ≤ 1               | 210        |
/// | (1, 50]           | 210 → 140  |
/// | (50, 150]         | 140 → 45   |
/// | (150, 400]        | 45 → 0     |
/// | > 400             | 0          |
pub fn hue_for_fee_rate(fee_rate: f64) -> f32 {
    let hue = if fee_rate.is_nan() || fee_rate <= 1.0 {
        210.0
    } else if fee_rate <= 50.0 {
        210.0 - (fee_rate - 1.0) / 49.0 * 70.0
    } else if fee_rate <= 150.0 {
        140.0 - (fee_rate - 50.0) / 100.0 * 95.0
    } else {
        45.0 - (fee_rate - 150.0) / 250.0 * 45.0
    };
    hue.max(0.0) as f32
}

/// `clamp(sqrt(btc · 30000) + 30, 20, 180)`
pub fn radius_for_value(sats: u64) -> f32 {
    let btc = sats_to_btc(sats);
    ((btc * 30_000.0).sqrt() + 30.0).clamp(MIN_RADIUS as f64, MAX_RADIUS as f64) as f32
}

pub fn is_whale(sats: u64) -> bool {
    sats_to_btc(sats) >= WHALE_BTC
}

/// Scale index for `value` within a tier's `(low, high)` bounds (same unit).
///
/// Log-scale position `ratio` in [0, 1], then
/// `index = floor((1 - ratio) · (len - 1))`: the low bound lands on the top
/// index, the high bound on index 0.
pub fn pitch_index(value: f64, low: f64, high: f64) -> usize {
    let clamped = value.clamp(low, high);
    let span = high.log10() - low.log10();
    let ratio = if span > 0.0 {
        (clamped.log10() - low.log10()) / span
    } else {
        0.0
    };
    let last = (SCALE.len() - 1) as f64;
    ((1.0 - ratio) * last).floor().clamp(0.0, last) as usize
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstrumentTier {
    /// Zero value: no pitched voice, texture only.
    Ghost,
    Pluck,
    Marimba,
    SteelDrum,
    Whale,
}

impl InstrumentTier {
    pub fn for_value(sats: u64) -> Self {
        let btc = sats_to_btc(sats);
        if btc >= WHALE_BTC {
            Self::Whale
        } else if btc >= 0.1 {
            Self::SteelDrum
        } else if btc >= 0.01 {
            Self::Marimba
        } else if sats > 0 {
            Self::Pluck
        } else {
            Self::Ghost
        }
    }

    /// BTC bounds the tier maps onto the scale. Whale and ghost are unpitched
    /// by the scale.
    pub fn range(self) -> Option<(f64, f64)> {
        match self {
            Self::Pluck => Some((0.000_01, 0.01)),
            Self::Marimba => Some((0.01, 0.1)),
            Self::SteelDrum => Some((0.1, 1.0)),
            Self::Whale | Self::Ghost => None,
        }
    }

    /// Pitch in Hz for a value in this tier.
    pub fn frequency(self, sats: u64) -> Option<f32> {
        match self {
            Self::Whale => Some(WHALE_DRONE_HZ),
            Self::Ghost => None,
            _ => {
                let (low, high) = self.range()?;
                let index = pitch_index(sats_to_btc(sats), low, high);
                Some(SCALE[index])
            }
        }
    }

    /// Position of the value within the tier's range, 0.0 at the low bound.
    pub fn position(self, sats: u64) -> f32 {
        match self.range() {
            Some((low, high)) => {
                let btc = sats_to_btc(sats).clamp(low, high);
                ((btc.log10() - low.log10()) / (high.log10() - low.log10())) as f32
            }
            None => 1.0,
        }
    }
}
