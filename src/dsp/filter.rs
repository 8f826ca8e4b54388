use std::f32::consts::TAU;

use serde::{Deserialize, Serialize};

/*
| type      | used by                         | passes          |
| --------- | ------------------------------- | --------------- |
| low-pass  | whale drone, dub delay feedback | below cutoff    |
| high-pass | shaker                          | above cutoff    |
| band-pass | ghost tick                      | around cutoff   |
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterType {
    LowPass,
    HighPass,
    BandPass,
}

pub struct FilterOutputs {
    pub lowpass: f32,
    pub bandpass: f32,
    pub highpass: f32,
}

/// Topology-preserving state-variable filter.
pub struct SVFilter {
    ic1eq: f32,
    ic2eq: f32,

    pub cutoff_hz: f32,
    pub resonance: f32,
    filter_type: FilterType,
}

impl SVFilter {
    pub fn new(filter_type: FilterType, cutoff_hz: f32) -> Self {
        Self {
            ic1eq: 0.0,
            ic2eq: 0.0,
            cutoff_hz,
            resonance: 0.0,
            filter_type,
        }
    }

    pub fn lowpass(cutoff_hz: f32) -> Self {
        Self::new(FilterType::LowPass, cutoff_hz)
    }

    pub fn highpass(cutoff_hz: f32) -> Self {
        Self::new(FilterType::HighPass, cutoff_hz)
    }

    pub fn bandpass(cutoff_hz: f32) -> Self {
        Self::new(FilterType::BandPass, cutoff_hz)
    }

    #[inline]
    fn coefficients(&self, sample_rate: f32) -> (f32, f32) {
        // Keep the cutoff below Nyquist so tan() stays finite.
        let cutoff = self.cutoff_hz.clamp(10.0, sample_rate * 0.49);
        let g = (TAU * cutoff / (2.0 * sample_rate)).tan();
        let k = 2.0 - (2.0 * self.resonance.clamp(0.0, 0.95));
        (g, k)
    }

    pub fn next_outputs(&mut self, sample: f32, k: f32, g: f32) -> FilterOutputs {
        let h = 1.0 / (1.0 + g * (g + k));
        let v3 = sample - self.ic2eq;
        let v1 = h * (self.ic1eq + g * v3);
        let v2 = self.ic2eq + g * v1;

        self.ic1eq = 2.0 * v1 - self.ic1eq;
        self.ic2eq = 2.0 * v2 - self.ic2eq;

        FilterOutputs {
            lowpass: v2,
            bandpass: v1,
            highpass: sample - k * v1 - v2,
        }
    }

    /// Filter a single sample (used inside feedback loops).
    #[inline]
    pub fn process(&mut self, sample: f32, sample_rate: f32) -> f32 {
        let (g, k) = self.coefficients(sample_rate);
        self.select(sample, k, g)
    }

    #[inline]
    fn select(&mut self, sample: f32, k: f32, g: f32) -> f32 {
        let outputs = self.next_outputs(sample, k, g);
        match self.filter_type {
            FilterType::LowPass => outputs.lowpass,
            FilterType::HighPass => outputs.highpass,
            FilterType::BandPass => outputs.bandpass,
        }
    }

    pub fn render(&mut self, buffer: &mut [f32], sample_rate: f32) {
        let (g, k) = self.coefficients(sample_rate);
        for sample in buffer.iter_mut() {
            *sample = self.select(*sample, k, g);
        }
    }

    pub fn reset(&mut self) {
        self.ic1eq = 0.0;
        self.ic2eq = 0.0;
    }

    pub fn set_cutoff(&mut self, cutoff: f32) {
        self.cutoff_hz = cutoff;
    }

    pub fn set_resonance(&mut self, resonance: f32) {
        self.resonance = resonance;
    }
}
