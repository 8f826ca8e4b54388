//! Diffuse reverb - a long, washy tail for the steel-drum tier and the chime.
//!
//! Schroeder topology: four parallel damped comb filters build the tail, two
//! series allpass filters smear it into a diffuse wash.
//!
//! ```text
//! Input ──┬──→ [Comb 1] ──┐
//!         ├──→ [Comb 2] ──┤
//!         ├──→ [Comb 3] ──┼──→ (+) ──→ [Allpass 1] ──→ [Allpass 2] ──→ Output
//!         └──→ [Comb 4] ──┘
//! ```
//!
//! Comb feedback is derived from the requested decay time (RT60) rather than a
//! "room size" knob: a comb of delay `d` seconds that should lose 60 dB in
//! `T` seconds needs `g = 10^(-3·d / T)`.

use crate::dsp::delay::DelayLine;

const COMB_DELAYS_MS: [f32; 4] = [29.7, 37.1, 41.1, 43.7];
const ALLPASS_DELAYS_MS: [f32; 2] = [5.0, 1.7];
const ALLPASS_GAIN: f32 = 0.5;

struct CombFilter {
    line: DelayLine,
    delay_samples: usize,
    feedback: f32,
    damp: f32,
    filter_state: f32,
}

impl CombFilter {
    fn new(delay_samples: usize) -> Self {
        Self {
            line: DelayLine::new(delay_samples + 1),
            delay_samples,
            feedback: 0.0,
            damp: 0.0,
            filter_state: 0.0,
        }
    }

    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        let output = self.line.read(self.delay_samples);
        // One-pole lowpass in the loop: high frequencies die first.
        self.filter_state = output * (1.0 - self.damp) + self.filter_state * self.damp;
        self.line.write(input + self.filter_state * self.feedback);
        output
    }

    fn reset(&mut self) {
        self.line.reset();
        self.filter_state = 0.0;
    }
}

struct AllpassFilter {
    line: DelayLine,
    delay_samples: usize,
}

impl AllpassFilter {
    fn new(delay_samples: usize) -> Self {
        Self {
            line: DelayLine::new(delay_samples + 1),
            delay_samples,
        }
    }

    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        let delayed = self.line.read(self.delay_samples);
        let output = -ALLPASS_GAIN * input + delayed;
        self.line.write(input + ALLPASS_GAIN * output);
        output
    }

    fn reset(&mut self) {
        self.line.reset();
    }
}

pub struct DiffuseReverb {
    combs: Vec<CombFilter>,
    allpasses: Vec<AllpassFilter>,
}

impl DiffuseReverb {
    /// - `decay_seconds`: time for the tail to fall by 60 dB
    /// - `damping`: 0.0 (bright) to 1.0 (dark)
    pub fn new(sample_rate: f32, decay_seconds: f32, damping: f32) -> Self {
        let to_samples = |ms: f32| ((ms * sample_rate / 1000.0) as usize).max(1);

        let mut reverb = Self {
            combs: COMB_DELAYS_MS.iter().map(|&ms| CombFilter::new(to_samples(ms))).collect(),
            allpasses: ALLPASS_DELAYS_MS
                .iter()
                .map(|&ms| AllpassFilter::new(to_samples(ms)))
                .collect(),
        };
        reverb.set_decay(decay_seconds, sample_rate);
        reverb.set_damping(damping);
        reverb
    }

    pub fn set_decay(&mut self, decay_seconds: f32, sample_rate: f32) {
        let decay = decay_seconds.max(0.1);
        for comb in &mut self.combs {
            let delay_seconds = comb.delay_samples as f32 / sample_rate;
            comb.feedback = 10f32.powf(-3.0 * delay_seconds / decay).min(0.98);
        }
    }

    pub fn set_damping(&mut self, damping: f32) {
        for comb in &mut self.combs {
            comb.damp = damping.clamp(0.0, 1.0);
        }
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let mut output = 0.0;
        for comb in &mut self.combs {
            output += comb.process(input);
        }
        output *= 0.25;

        for allpass in &mut self.allpasses {
            output = allpass.process(output);
        }
        output
    }

    pub fn reset(&mut self) {
        self.combs.iter_mut().for_each(CombFilter::reset);
        self.allpasses.iter_mut().for_each(AllpassFilter::reset);
    }
}
