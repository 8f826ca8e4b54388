/// One-pole smoothed gain, the equivalent of "set target at time" on a
/// gain parameter. Volume changes glide with time constant `tau` instead of
/// stepping, which would click.
pub struct SmoothedGain {
    current: f32,
    target: f32,
    tau: f32,
}

impl SmoothedGain {
    pub fn new(initial: f32, tau: f32) -> Self {
        Self {
            current: initial,
            target: initial,
            tau: tau.max(crate::MIN_TIME),
        }
    }

    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    /// Multiply `buffer` by the gliding gain.
    pub fn apply(&mut self, buffer: &mut [f32], sample_rate: f32) {
        let coeff = 1.0 - (-1.0 / (self.tau * sample_rate)).exp();
        for sample in buffer.iter_mut() {
            self.current += (self.target - self.current) * coeff;
            *sample *= self.current;
        }
    }
}
