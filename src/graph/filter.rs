use crate::{
    dsp::filter::{FilterType, SVFilter},
    graph::node::{GraphNode, RenderCtx},
};

/// Static state-variable filter placed after a voice's oscillators.
///
/// The whale drone is a saw darkened by a low-pass; the shaker is noise
/// through a high-pass; the ghost tick is noise through a band-pass.
pub struct FilterNode {
    filter: Option<SVFilter>,
}

impl FilterNode {
    pub fn new(filter_type: FilterType, cutoff_hz: f32, resonance: f32) -> Self {
        let mut filter = SVFilter::new(filter_type, cutoff_hz);
        filter.set_resonance(resonance);
        Self { filter: Some(filter) }
    }

    pub fn lowpass(cutoff_hz: f32) -> Self {
        Self::new(FilterType::LowPass, cutoff_hz, 0.0)
    }

    pub fn highpass(cutoff_hz: f32) -> Self {
        Self::new(FilterType::HighPass, cutoff_hz, 0.0)
    }

    /// None when bypassed.
    pub fn cutoff(&self) -> Option<f32> {
        self.filter.as_ref().map(|filter| filter.cutoff_hz)
    }
}

impl GraphNode for FilterNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        if let Some(filter) = &mut self.filter {
            filter.render(out, ctx.sample_rate);
        }
    }

    fn strike(&mut self, _ctx: &RenderCtx) {
        if let Some(filter) = &mut self.filter {
            filter.reset();
        }
    }

    // A filter never keeps a voice alive on its own.
    fn is_active(&self) -> bool {
        false
    }
}
