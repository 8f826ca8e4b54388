use crate::MIN_TIME;

/*
Percussive Envelope
===================

Every voice in the mix is struck, never held: a plucked string, a marimba
bar, a steel pan, an organ stab. So instead of a gated ADSR this envelope is
a one-shot attack/decay shape that ends on its own.

Vocabulary
----------

  level       Current output value (0.0 to 1.0). Multiplies the voice signal.

  attack      Seconds for the linear ramp 0 → 1. Kept short (a few ms) so
              the onset is crisp but does not click.

  decay       Seconds for the exponential fall 1 → SILENCE_LEVEL (-60 dB).
              When the decay time has elapsed the envelope goes Idle and the
              voice can be freed.


The Shape
---------

  Level
    1.0 ┐ ╱╲
        │╱  ╲
        │    ╲_
        │      ╲__
    0.0 └─────────╲____________→ Time
        A     Decay (exponential)

Exponential decay is what acoustic, struck sounds do: every sample is the
previous one times a constant factor.

    factor = SILENCE_LEVEL ^ (1 / (decay_time · sample_rate))

After `decay_time · sample_rate` samples the level has been multiplied down
to exactly SILENCE_LEVEL.


The State Machine
-----------------

    ┌──────┐  trigger  ┌────────┐  level=1  ┌───────┐  elapsed  ┌──────┐
    │ Idle │ ────────→ │ Attack │ ────────→ │ Decay │ ────────→ │ Idle │
    └──────┘           └────────┘           └───────┘           └──────┘

There is no note-off: the voice is fire-and-forget.
*/

/// -60 dB, the level at which a decaying voice is considered silent.
pub const SILENCE_LEVEL: f32 = 0.001;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeState {
    Idle,
    Attack,
    Decay,
}

pub struct Envelope {
    attack_time: f32,
    decay_time: f32,

    stage: EnvelopeState,
    level: f32,

    decay_factor: f32,
    decay_total_samples: u32,
    decay_elapsed_samples: u32,
}

impl Envelope {
    pub fn new(attack: f32, decay: f32) -> Self {
        Self {
            attack_time: attack.max(MIN_TIME),
            decay_time: decay.max(MIN_TIME),
            stage: EnvelopeState::Idle,
            level: 0.0,
            decay_factor: 1.0,
            decay_total_samples: 1,
            decay_elapsed_samples: 0,
        }
    }

    /// Start the attack from zero. Precomputes the decay factor for this
    /// sample rate.
    pub fn trigger(&mut self, sample_rate: f32) {
        self.level = 0.0;
        self.stage = EnvelopeState::Attack;
        self.decay_total_samples = (self.decay_time * sample_rate).round().max(1.0) as u32;
        self.decay_factor = SILENCE_LEVEL.powf(1.0 / self.decay_total_samples as f32);
        self.decay_elapsed_samples = 0;
    }

    /// Advance by one sample.
    pub fn next_sample(&mut self, sample_rate: f32) -> f32 {
        match self.stage {
            EnvelopeState::Idle => {
                self.level = 0.0;
            }
            EnvelopeState::Attack => {
                self.level += 1.0 / (self.attack_time * sample_rate);
                if self.level >= 1.0 {
                    self.level = 1.0;
                    self.stage = EnvelopeState::Decay;
                }
            }
            EnvelopeState::Decay => {
                self.level *= self.decay_factor;
                self.decay_elapsed_samples = self.decay_elapsed_samples.saturating_add(1);
                if self.decay_elapsed_samples >= self.decay_total_samples {
                    self.level = 0.0;
                    self.stage = EnvelopeState::Idle;
                }
            }
        }

        debug_assert!((0.0..=1.0).contains(&self.level));
        self.level
    }

    pub fn render(&mut self, buffer: &mut [f32], sample_rate: f32) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample(sample_rate);
        }
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.stage, EnvelopeState::Idle)
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn state(&self) -> EnvelopeState {
        self.stage
    }

    /// Total audible length in seconds.
    pub fn duration(&self) -> f32 {
        self.attack_time + self.decay_time
    }
}
