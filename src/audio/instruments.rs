//! Voice recipes. Each function returns a descriptor; nothing here touches
//! an audio device.

use crate::{
    audio::voice::{EnvelopeSpec, Partial, Route, VoiceKind, VoiceSpec},
    dsp::{filter::FilterType, oscillator::OscillatorWaveform},
    mapping::{InstrumentTier, WHALE_DRONE_HZ},
};

use OscillatorWaveform::{Noise, Saw, Sine, Square, Triangle};

/// Organ skank root (D4).
pub const SKANK_ROOT_HZ: f32 = 293.66;
/// Detune of the outer organ partials, in cents.
pub const SKANK_DETUNE_CENTS: f32 = 7.0;

/// Startup/block chime: G4 B4 D5 G5.
pub const CHIME_NOTES: [f32; 4] = [392.00, 493.88, 587.33, 783.99];
/// Gap between chime notes, seconds.
pub const CHIME_SPACING: f32 = 0.12;

/// Whale drone length, seconds.
pub const WHALE_DURATION: f32 = 5.0;

/// Sub-linear loudness: quiet at the bottom of a tier, `peak` at the top.
fn loudness(peak: f32, position: f32) -> f32 {
    peak * (0.35 + 0.65 * position.clamp(0.0, 1.0).sqrt())
}

fn env(attack: f32, decay: f32, peak: f32) -> EnvelopeSpec {
    EnvelopeSpec { attack, decay, peak }
}

/// Pitched voice for a transaction of `sats`, or None for the ghost tier.
pub fn for_transaction(sats: u64) -> Option<VoiceSpec> {
    let tier = InstrumentTier::for_value(sats);
    let position = tier.position(sats);
    match tier {
        InstrumentTier::Ghost => None,
        InstrumentTier::Whale => Some(whale_drone()),
        _ => {
            let frequency = tier.frequency(sats)?;
            Some(match tier {
                InstrumentTier::Pluck => pluck(frequency, position),
                InstrumentTier::Marimba => marimba(frequency, position),
                _ => steel_drum(frequency, position),
            })
        }
    }
}

/// Short bright triangle pluck, ~0.4 s.
pub fn pluck(frequency: f32, position: f32) -> VoiceSpec {
    VoiceSpec::new(
        VoiceKind::Pluck,
        vec![Partial::new(Triangle, frequency, 1.0)],
        env(0.004, 0.4, loudness(0.18, position)),
    )
    .with_filter(FilterType::LowPass, 3_200.0, 0.1)
}

/// Sine with the fourth-harmonic bar overtone.
pub fn marimba(frequency: f32, position: f32) -> VoiceSpec {
    VoiceSpec::new(
        VoiceKind::Marimba,
        vec![
            Partial::new(Sine, frequency, 1.0),
            Partial::new(Sine, frequency * 4.0, 0.25),
        ],
        env(0.003, 0.8, loudness(0.25, position)),
    )
}

/// Bell-like partials, sent to the shared reverb.
pub fn steel_drum(frequency: f32, position: f32) -> VoiceSpec {
    VoiceSpec::new(
        VoiceKind::SteelDrum,
        vec![
            Partial::new(Sine, frequency, 1.0),
            Partial::new(Sine, frequency * 2.0, 0.5),
            Partial::new(Triangle, frequency * 3.0, 0.2),
        ],
        env(0.005, 1.5, loudness(0.3, position)),
    )
    .with_route(Route::Reverb)
}

/// Low-passed saw plus sub sine at the fixed drone pitch.
pub fn whale_drone() -> VoiceSpec {
    let attack = 0.25;
    VoiceSpec::new(
        VoiceKind::WhaleDrone,
        vec![
            Partial::new(Saw, WHALE_DRONE_HZ, 0.6),
            Partial::new(Sine, WHALE_DRONE_HZ, 1.0),
        ],
        env(attack, WHALE_DURATION - attack, 0.45),
    )
    .with_filter(FilterType::LowPass, 320.0, 0.3)
    .with_route(Route::Reverb)
}

/// Three detuned squares around D4, very short.
pub fn organ_skank() -> VoiceSpec {
    VoiceSpec::new(
        VoiceKind::OrganSkank,
        vec![
            Partial::new(Square, SKANK_ROOT_HZ, 0.33).detuned(-SKANK_DETUNE_CENTS),
            Partial::new(Square, SKANK_ROOT_HZ, 0.34),
            Partial::new(Square, SKANK_ROOT_HZ, 0.33).detuned(SKANK_DETUNE_CENTS),
        ],
        env(0.004, 0.12, 0.09),
    )
    .with_filter(FilterType::LowPass, 1_400.0, 0.2)
}

/// The ascending four-note chime, one descriptor per note.
pub fn chime() -> Vec<VoiceSpec> {
    CHIME_NOTES
        .iter()
        .enumerate()
        .map(|(i, &frequency)| {
            VoiceSpec::new(
                VoiceKind::Chime,
                vec![
                    Partial::new(Sine, frequency, 1.0),
                    Partial::new(Triangle, frequency * 2.0, 0.15),
                ],
                env(0.005, 1.2, 0.2),
            )
            .with_route(Route::Reverb)
            .starting_after(i as f32 * CHIME_SPACING)
        })
        .collect()
}

/// High-passed noise tick.
pub fn shaker(seed: u64) -> VoiceSpec {
    VoiceSpec::new(VoiceKind::Shaker, vec![Partial::new(Noise, 0.0, 1.0)], env(0.002, 0.06, 0.04))
        .with_filter(FilterType::HighPass, 6_000.0, 0.0)
        .with_seed(seed)
}

/// Band-passed noise puff for zero-value beats.
pub fn ghost(seed: u64) -> VoiceSpec {
    VoiceSpec::new(VoiceKind::Ghost, vec![Partial::new(Noise, 0.0, 1.0)], env(0.01, 0.25, 0.05))
        .with_filter(FilterType::BandPass, 900.0, 0.4)
        .with_seed(seed)
}
