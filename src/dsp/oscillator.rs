use std::f32::consts::TAU;

use rand::{rngs::SmallRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/*
Oscillator Block
================

Phase-accumulator oscillator shared by every voice. The phase runs in
[0, 1) and advances by `frequency / sample_rate` per sample; each waveform is
a pure function of that phase, so a voice can be rendered in any block size
and produce the same samples.

  Sine      sin(2π·phase)                 pure, used for drones and chimes
  Triangle  1 - 4·|phase - 0.5|           soft, mallet-like
  Square    ±1 on either half of the cycle hollow, organ partials
  Saw       2·phase - 1                    bright, filtered for the whale drone
  Noise     uniform white noise            shaker and ghost textures

Noise draws from a seeded SmallRng so a voice descriptor renders to the same
buffer every time it is played.
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OscillatorWaveform {
    Sine,
    Triangle,
    Square,
    Saw,
    Noise,
}

pub struct OscillatorBlock {
    waveform: OscillatorWaveform,
    phase: f32,
    rng: SmallRng,
}

impl OscillatorBlock {
    pub fn new(waveform: OscillatorWaveform, seed: u64) -> Self {
        Self {
            waveform,
            phase: 0.0,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn sine() -> Self {
        Self::new(OscillatorWaveform::Sine, 0)
    }

    pub fn noise(seed: u64) -> Self {
        Self::new(OscillatorWaveform::Noise, seed)
    }

    pub fn waveform(&self) -> OscillatorWaveform {
        self.waveform
    }

    #[inline]
    pub fn next_sample(&mut self, frequency: f32, sample_rate: f32) -> f32 {
        let value = match self.waveform {
            OscillatorWaveform::Sine => (TAU * self.phase).sin(),
            OscillatorWaveform::Triangle => 1.0 - 4.0 * (self.phase - 0.5).abs(),
            OscillatorWaveform::Square => {
                if self.phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            OscillatorWaveform::Saw => 2.0 * self.phase - 1.0,
            OscillatorWaveform::Noise => self.rng.gen_range(-1.0..1.0),
        };

        self.phase += frequency / sample_rate;
        self.phase -= self.phase.floor();

        value
    }

    /// Fill `destination` with the waveform at a fixed frequency.
    pub fn render(&mut self, destination: &mut [f32], frequency: f32, sample_rate: f32) {
        for sample in destination.iter_mut() {
            *sample = self.next_sample(frequency, sample_rate);
        }
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sine_matches_closed_form() {
        let sample_rate = 48_000.0;
        let mut osc = OscillatorBlock::sine();
        let mut buffer = vec![0.0f32; 64];
        osc.render(&mut buffer, 440.0, sample_rate);

        let n = 12;
        let expected = (TAU * 440.0 * n as f32 / sample_rate).sin();
        assert!((buffer[n] - expected).abs() < 1e-4, "expected {expected}, got {}", buffer[n]);
    }

    #[test]
    fn every_waveform_stays_in_range() {
        for waveform in [
            OscillatorWaveform::Sine,
            OscillatorWaveform::Triangle,
            OscillatorWaveform::Square,
            OscillatorWaveform::Saw,
            OscillatorWaveform::Noise,
        ] {
            let mut osc = OscillatorBlock::new(waveform, 7);
            let mut buffer = vec![0.0f32; 1024];
            osc.render(&mut buffer, 1234.5, 44_100.0);
            assert!(buffer.iter().all(|s| (-1.0..=1.0).contains(s)), "{waveform:?} out of range");
        }
    }

    #[test]
    fn seeded_noise_is_repeatable() {
        let mut a = OscillatorBlock::noise(42);
        let mut b = OscillatorBlock::noise(42);
        let mut buf_a = vec![0.0f32; 32];
        let mut buf_b = vec![0.0f32; 32];
        a.render(&mut buf_a, 0.0, 48_000.0);
        b.render(&mut buf_b, 0.0, 48_000.0);
        assert_eq!(buf_a, buf_b);
    }
}
