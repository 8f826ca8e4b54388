use crate::MAX_DELAY_SAMPLES;

/// Circular delay buffer. Capacity is fixed at construction so the audio
/// thread never allocates.
pub struct DelayLine {
    buffer: Vec<f32>,
    write_pos: usize,
}

impl DelayLine {
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: vec![0.0; capacity.clamp(1, MAX_DELAY_SAMPLES)],
            write_pos: 0,
        }
    }

    /// Delay line long enough for `seconds` at `sample_rate`.
    pub fn with_duration(seconds: f32, sample_rate: f32) -> Self {
        Self::new((seconds * sample_rate).ceil() as usize + 1)
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Sample written `delay_samples` ago.
    #[inline]
    pub fn read(&self, delay_samples: usize) -> f32 {
        let len = self.buffer.len();
        let delay = delay_samples.clamp(1, len);
        self.buffer[(self.write_pos + len - delay) % len]
    }

    #[inline]
    pub fn write(&mut self, sample: f32) {
        self.buffer[self.write_pos] = sample;
        self.write_pos = (self.write_pos + 1) % self.buffer.len();
    }

    pub fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }
}
