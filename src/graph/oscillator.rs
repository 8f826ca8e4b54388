use crate::dsp::oscillator::{OscillatorBlock, OscillatorWaveform};
use crate::graph::node::{GraphNode, RenderCtx};

/*
Voice Oscillator
================

Every partial of a voice is an oscillator at a fixed frequency. Nothing here
tracks a keyboard: the pitch was already chosen by the value→pitch mapping
before the voice descriptor was built, so the node just stores it.

Detune
------
Detune is expressed in cents (100 cents = 1 semitone) and applied as

    f = base · 2^(cents / 1200)

The organ stab on the skank beat uses three partials at -7, 0 and +7 cents;
the slight beating between them is what makes it sound like a Hammond
rather than a test tone.

Example usage:
  let body = OscNode::new(OscillatorWaveform::Triangle, 392.0, 0);
  let stab = OscNode::new(OscillatorWaveform::Square, 293.66, 0).with_detune(7.0);
  let hiss = OscNode::new(OscillatorWaveform::Noise, 0.0, seed);
*/

pub struct OscNode {
    osc: OscillatorBlock,
    frequency: f32,
    detune_cents: f32,
}

impl OscNode {
    /// `seed` only matters for noise.
    pub fn new(waveform: OscillatorWaveform, frequency: f32, seed: u64) -> Self {
        Self {
            osc: OscillatorBlock::new(waveform, seed),
            frequency,
            detune_cents: 0.0,
        }
    }

    pub fn sine(frequency: f32) -> Self {
        Self::new(OscillatorWaveform::Sine, frequency, 0)
    }

    pub fn noise(seed: u64) -> Self {
        Self::new(OscillatorWaveform::Noise, 0.0, seed)
    }

    pub fn with_detune(mut self, cents: f32) -> Self {
        self.detune_cents = cents;
        self
    }

    /// Frequency actually rendered, detune included.
    pub fn effective_frequency(&self) -> f32 {
        if self.detune_cents != 0.0 {
            self.frequency * 2.0_f32.powf(self.detune_cents / 1200.0)
        } else {
            self.frequency
        }
    }
}

impl GraphNode for OscNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        let frequency = self.effective_frequency();
        self.osc.render(out, frequency, ctx.sample_rate);
    }

    fn strike(&mut self, _ctx: &RenderCtx) {
        self.osc.reset();
    }
}
