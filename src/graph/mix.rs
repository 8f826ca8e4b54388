use crate::{
    graph::{
        node::{GraphNode, RenderCtx},
        oscillator::OscNode,
    },
    MAX_BLOCK_SIZE, MAX_PARTIALS,
};

/// Weighted sum of partials.
///
/// A voice is a handful of oscillators at related frequencies (the organ
/// stab's three detuned squares, the whale's saw plus sub sine). `Stack`
/// renders each into a scratch buffer and accumulates `partial × weight`.
/// The weights are not normalised: the descriptor's per-partial gain is the
/// mix.
///
/// Layers live inline, up to `MAX_PARTIALS`. A voice slot reloads its stack
/// with `clear` + `push` when it is restarted, so the render thread never
/// allocates.
pub struct Stack {
    layers: [(OscNode, f32); MAX_PARTIALS],
    len: usize,
    temp_buffer: Vec<f32>,
}

impl Stack {
    pub fn new() -> Self {
        Self {
            layers: std::array::from_fn(|_| (OscNode::sine(0.0), 0.0)),
            len: 0,
            temp_buffer: vec![0.0; MAX_BLOCK_SIZE],
        }
    }

    pub fn with_layer(mut self, node: OscNode, weight: f32) -> Self {
        self.push(node, weight);
        self
    }

    /// Add a layer. Returns false once the stack is full.
    pub fn push(&mut self, node: OscNode, weight: f32) -> bool {
        match self.layers.get_mut(self.len) {
            Some(slot) => {
                *slot = (node, weight);
                self.len += 1;
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Default for Stack {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphNode for Stack {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        out.fill(0.0);
        let frames = &mut self.temp_buffer[..out.len()];
        for (node, weight) in &mut self.layers[..self.len] {
            frames.fill(0.0);
            node.render_block(frames, ctx);
            for (o, s) in out.iter_mut().zip(frames.iter()) {
                *o += *s * *weight;
            }
        }
    }

    fn strike(&mut self, ctx: &RenderCtx) {
        for (node, _) in &mut self.layers[..self.len] {
            node.strike(ctx);
        }
    }

    fn is_active(&self) -> bool {
        self.layers[..self.len].iter().any(|(node, _)| node.is_active())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::oscillator::OscNode;

    #[test]
    fn sums_weighted_layers() {
        let ctx = RenderCtx::new(48_000.0);
        let mut single = OscNode::sine(300.0);
        let mut stack = Stack::new()
            .with_layer(OscNode::sine(300.0), 0.25)
            .with_layer(OscNode::sine(300.0), 0.25);

        let mut a = vec![0.0f32; 64];
        let mut b = vec![0.0f32; 64];
        single.render_block(&mut a, &ctx);
        stack.render_block(&mut b, &ctx);

        for (x, y) in a.iter().zip(&b) {
            assert!((x * 0.5 - y).abs() < 1e-5);
        }
    }

    #[test]
    fn empty_stack_is_silent() {
        let ctx = RenderCtx::new(48_000.0);
        let mut stack = Stack::new();
        let mut buffer = vec![1.0f32; 16];
        stack.render_block(&mut buffer, &ctx);
        assert!(buffer.iter().all(|&s| s == 0.0));
        assert!(stack.is_empty());
    }

    #[test]
    fn full_stack_refuses_layers_and_clear_reuses_it() {
        let mut stack = Stack::new();
        for _ in 0..MAX_PARTIALS {
            assert!(stack.push(OscNode::sine(100.0), 1.0));
        }
        assert!(!stack.push(OscNode::sine(100.0), 1.0));
        assert_eq!(stack.len(), MAX_PARTIALS);

        stack.clear();
        assert!(stack.is_empty());
        assert!(stack.push(OscNode::sine(100.0), 1.0));
        assert_eq!(stack.len(), 1);
    }
}
