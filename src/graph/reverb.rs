use crate::dsp::reverb::DiffuseReverb;
use crate::graph::node::{GraphNode, RenderCtx};

/// Send/return reverb: replaces the buffer with `wet · reverb(buffer)`.
///
/// The bus keeps the dry signal on its own path, so this node only ever
/// returns the tail.
pub struct ReverbNode {
    reverb: DiffuseReverb,
    wet: f32,
}

impl ReverbNode {
    pub fn new(sample_rate: f32, decay_seconds: f32, damping: f32, wet: f32) -> Self {
        Self {
            reverb: DiffuseReverb::new(sample_rate, decay_seconds, damping),
            wet: wet.clamp(0.0, 1.0),
        }
    }

    pub fn clear(&mut self) {
        self.reverb.reset();
    }
}

impl GraphNode for ReverbNode {
    fn render_block(&mut self, out: &mut [f32], _ctx: &RenderCtx) {
        for sample in out.iter_mut() {
            *sample = self.reverb.process(*sample) * self.wet;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_only_the_tail() {
        let ctx = RenderCtx::new(48_000.0);
        let mut node = ReverbNode::new(48_000.0, 3.0, 0.4, 0.8);

        let mut impulse = vec![0.0f32; 64];
        impulse[0] = 1.0;
        node.render_block(&mut impulse, &ctx);
        assert!(impulse[0].abs() < 0.6, "dry impulse must not pass straight through");

        let mut energy = 0.0;
        for _ in 0..100 {
            let mut silence = vec![0.0f32; 64];
            node.render_block(&mut silence, &ctx);
            energy += silence.iter().map(|x| x * x).sum::<f32>();
        }
        assert!(energy > 0.0001);
    }
}
