use crate::{
    graph::node::{GraphNode, RenderCtx},
    MAX_BLOCK_SIZE,
};

/// Signal × envelope × peak gain.
///
/// The envelope decides how long the voice lives: once it goes idle the whole
/// product is silent, however many oscillators feed the signal side.
pub struct Amplify<N, M> {
    pub signal: N,
    pub envelope: M,
    pub gain: f32,
    temp_buffer: Vec<f32>,
}

impl<N, M> Amplify<N, M> {
    pub fn new(signal: N, envelope: M, gain: f32) -> Self {
        Self {
            signal,
            envelope,
            gain,
            temp_buffer: vec![0.0; MAX_BLOCK_SIZE],
        }
    }
}

impl<N: GraphNode, M: GraphNode> GraphNode for Amplify<N, M> {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.signal.render_block(out, ctx);

        let frames = &mut self.temp_buffer[..out.len()];
        frames.fill(0.0);
        self.envelope.render_block(frames, ctx);

        for (o, e) in out.iter_mut().zip(frames.iter()) {
            *o *= *e * self.gain;
        }
    }

    fn strike(&mut self, ctx: &RenderCtx) {
        self.signal.strike(ctx);
        self.envelope.strike(ctx);
    }

    fn is_active(&self) -> bool {
        self.envelope.is_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{envelope::EnvNode, extensions::NodeExt, oscillator::OscNode};

    #[test]
    fn envelope_gates_and_scales() {
        let ctx = RenderCtx::new(1_000.0);
        let mut voice = OscNode::sine(50.0).amplify(EnvNode::percussive(0.001, 0.05), 0.5);

        let mut before = vec![0.0f32; 8];
        voice.render_block(&mut before, &ctx);
        assert!(before.iter().all(|&s| s == 0.0), "silent until struck");

        voice.strike(&ctx);
        let mut buffer = vec![0.0f32; 40];
        voice.render_block(&mut buffer, &ctx);
        assert!(buffer.iter().all(|s| s.abs() <= 0.5));
        assert!(buffer.iter().any(|s| s.abs() > 0.05));
        assert!(voice.is_active());

        let mut tail = vec![0.0f32; 40];
        voice.render_block(&mut tail, &ctx);
        assert!(!voice.is_active());
    }
}
