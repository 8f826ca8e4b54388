use crate::graph::node::{GraphNode, RenderCtx};

/*
Serial Chain (Through)
======================

Through feeds the output of one node into another, in place:

  [Source] ──→ [Effect] ──→ output

In a voice graph the source is the enveloped oscillator stack and the effect
is its tone filter:

    stack.amplify(env, gain).through(FilterNode::lowpass(380.0))

Liveness follows the source. A filter has no tail worth waiting for, so once
the envelope is idle the voice can be freed.
*/

pub struct Through<S, F> {
    pub source: S,
    pub effect: F,
}

impl<S, F> Through<S, F> {
    pub fn new(source: S, effect: F) -> Self {
        Self { source, effect }
    }
}

impl<S: GraphNode, F: GraphNode> GraphNode for Through<S, F> {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.source.render_block(out, ctx);
        self.effect.render_block(out, ctx);
    }

    fn strike(&mut self, ctx: &RenderCtx) {
        self.source.strike(ctx);
        self.effect.strike(ctx);
    }

    fn is_active(&self) -> bool {
        self.source.is_active() || self.effect.is_active()
    }
}
