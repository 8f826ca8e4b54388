/// Context passed to graph nodes during rendering.
///
/// - sample_rate: audio sample rate (e.g., 48000.0)
/// - time: seconds since the voice started sounding
pub struct RenderCtx {
    pub sample_rate: f32,
    pub time: f64,
}

impl RenderCtx {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            time: 0.0,
        }
    }

    /// Context for the block following one of `frames` samples.
    pub fn advanced(&self, frames: usize) -> Self {
        Self {
            sample_rate: self.sample_rate,
            time: self.time + frames as f64 / self.sample_rate as f64,
        }
    }
}

/// Core trait for audio processing graph nodes.
///
/// Voices here are one-shot: a node is struck once with `strike` and then
/// rendered until `is_active` turns false.
pub trait GraphNode: Send {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx);

    /// Start sounding. Default: nothing to reset.
    fn strike(&mut self, _ctx: &RenderCtx) {}

    /// Whether this node still produces sound.
    ///
    /// Used by the bus to know when a voice can be freed.
    fn is_active(&self) -> bool {
        true
    }
}
