use crate::{
    dsp::envelope::Envelope,
    graph::node::{GraphNode, RenderCtx},
};

/// Envelope as a control signal; pair it with a source via `.amplify()`.
pub struct EnvNode {
    env: Envelope,
}

impl EnvNode {
    pub fn percussive(attack: f32, decay: f32) -> Self {
        Self {
            env: Envelope::new(attack, decay),
        }
    }

    pub fn level(&self) -> f32 {
        self.env.level()
    }
}

impl GraphNode for EnvNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.env.render(out, ctx.sample_rate);
    }

    fn strike(&mut self, ctx: &RenderCtx) {
        self.env.trigger(ctx.sample_rate);
    }

    fn is_active(&self) -> bool {
        self.env.is_active()
    }
}
