//! Voice descriptors.
//!
//! A voice is described as a plain value (partials, envelope, optional tone
//! filter, routing, start offset) and handed to whatever backend renders
//! audio. Choosing *which* voice to play is pure and testable; turning the
//! description into samples is the backend's job (`synth::SynthBus`).
//!
//! Descriptors are `Copy`: they cross to the render thread by value and never
//! own heap memory the audio callback would have to free.

use std::{fmt, ops::Deref};

use serde::{Deserialize, Serialize};

use crate::{
    dsp::{filter::FilterType, oscillator::OscillatorWaveform},
    MAX_PARTIALS,
};

/// What the voice represents; used for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoiceKind {
    Pluck,
    Marimba,
    SteelDrum,
    WhaleDrone,
    OrganSkank,
    Chime,
    Shaker,
    Ghost,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Partial {
    pub waveform: OscillatorWaveform,
    pub frequency: f32,
    pub detune_cents: f32,
    pub weight: f32,
}

impl Partial {
    const SILENT: Self = Self {
        waveform: OscillatorWaveform::Sine,
        frequency: 0.0,
        detune_cents: 0.0,
        weight: 0.0,
    };

    pub fn new(waveform: OscillatorWaveform, frequency: f32, weight: f32) -> Self {
        Self {
            waveform,
            frequency,
            detune_cents: 0.0,
            weight,
        }
    }

    pub fn detuned(mut self, cents: f32) -> Self {
        self.detune_cents = cents;
        self
    }
}

/// Inline list of at most `MAX_PARTIALS` partials; extras are ignored.
#[derive(Clone, Copy, Serialize, Deserialize)]
#[serde(from = "Vec<Partial>", into = "Vec<Partial>")]
pub struct Partials {
    slots: [Partial; MAX_PARTIALS],
    len: usize,
}

impl Partials {
    pub const fn empty() -> Self {
        Self {
            slots: [Partial::SILENT; MAX_PARTIALS],
            len: 0,
        }
    }
}

impl Deref for Partials {
    type Target = [Partial];

    fn deref(&self) -> &[Partial] {
        &self.slots[..self.len]
    }
}

impl FromIterator<Partial> for Partials {
    fn from_iter<I: IntoIterator<Item = Partial>>(iter: I) -> Self {
        let mut partials = Self::empty();
        for partial in iter.into_iter().take(MAX_PARTIALS) {
            partials.slots[partials.len] = partial;
            partials.len += 1;
        }
        partials
    }
}

impl From<Vec<Partial>> for Partials {
    fn from(partials: Vec<Partial>) -> Self {
        partials.into_iter().collect()
    }
}

impl From<Partials> for Vec<Partial> {
    fn from(partials: Partials) -> Self {
        partials.to_vec()
    }
}

impl PartialEq for Partials {
    fn eq(&self, other: &Self) -> bool {
        **self == **other
    }
}

impl fmt::Debug for Partials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Fast linear attack, exponential decay, peak gain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnvelopeSpec {
    pub attack: f32,
    pub decay: f32,
    pub peak: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub filter_type: FilterType,
    pub cutoff_hz: f32,
    pub resonance: f32,
}

/// Which shared effects a voice feeds besides the dry bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Route {
    Dry,
    /// Dry plus a send into the shared reverb.
    Reverb,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VoiceSpec {
    pub kind: VoiceKind,
    pub partials: Partials,
    pub envelope: EnvelopeSpec,
    pub filter: Option<FilterSpec>,
    pub route: Route,
    /// Seconds after submission before the voice sounds.
    pub start_offset: f32,
    /// Seed for noise partials.
    pub seed: u64,
}

impl VoiceSpec {
    pub fn new(
        kind: VoiceKind,
        partials: impl IntoIterator<Item = Partial>,
        envelope: EnvelopeSpec,
    ) -> Self {
        Self {
            kind,
            partials: partials.into_iter().collect(),
            envelope,
            filter: None,
            route: Route::Dry,
            start_offset: 0.0,
            seed: 0,
        }
    }

    pub fn with_filter(mut self, filter_type: FilterType, cutoff_hz: f32, resonance: f32) -> Self {
        self.filter = Some(FilterSpec {
            filter_type,
            cutoff_hz,
            resonance,
        });
        self
    }

    pub fn with_route(mut self, route: Route) -> Self {
        self.route = route;
        self
    }

    pub fn starting_after(mut self, seconds: f32) -> Self {
        self.start_offset = seconds.max(0.0);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sounding length in seconds, start offset excluded.
    pub fn duration(&self) -> f32 {
        self.envelope.attack + self.envelope.decay
    }

    /// Frequency of the first partial.
    pub fn fundamental(&self) -> Option<f32> {
        self.partials.first().map(|p| p.frequency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(frequency: f32) -> Partial {
        Partial::new(OscillatorWaveform::Sine, frequency, 1.0)
    }

    #[test]
    fn partials_keep_order_and_cap() {
        let partials: Partials = (1..=6).map(|i| sine(i as f32 * 100.0)).collect();
        assert_eq!(partials.len(), MAX_PARTIALS);
        assert_eq!(partials[0].frequency, 100.0);
        assert_eq!(partials[MAX_PARTIALS - 1].frequency, MAX_PARTIALS as f32 * 100.0);
    }

    #[test]
    fn equality_ignores_unused_slots() {
        let a: Partials = vec![sine(220.0)].into();
        let b: Partials = [sine(220.0)].into_iter().collect();
        assert_eq!(a, b);
        assert_ne!(a, Partials::empty());
    }

    #[test]
    fn descriptor_serializes_partials_as_a_list() {
        let spec = VoiceSpec::new(
            VoiceKind::Marimba,
            [sine(440.0), sine(1760.0)],
            EnvelopeSpec {
                attack: 0.002,
                decay: 0.6,
                peak: 0.4,
            },
        );
        let json = serde_json::to_value(spec).unwrap();
        assert_eq!(json["partials"].as_array().map(Vec::len), Some(2));

        let back: VoiceSpec = serde_json::from_value(json).unwrap();
        assert_eq!(back, spec);
    }
}
