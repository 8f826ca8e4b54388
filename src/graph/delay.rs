use crate::{
    dsp::{delay::DelayLine, filter::SVFilter},
    graph::node::{GraphNode, RenderCtx},
};

/*
Dub Delay
=========

The signature of dub mixing: an echo whose repeats get darker each time
round, because the feedback path runs through a low-pass filter.

            ┌──────────────────────────────────────┐
            │                                      │
  in ──(+)──┴──→ [Delay line] ──→ [Low-pass] ──(×fb)┘
   │                         │
   └──────────(+)←──(×wet)───┘──→ out

  out[n]   = in[n] + wet · delayed[n]
  write[n] = in[n] + feedback · lowpass(delayed[n])

Feedback is clamped below 0.95 so the loop always decays.
*/

pub struct DubDelayNode {
    line: DelayLine,
    tone: SVFilter,
    delay_seconds: f32,
    feedback: f32,
    wet: f32,
    sample_rate: f32,
}

impl DubDelayNode {
    pub fn new(sample_rate: f32, delay_seconds: f32, feedback: f32, tone_hz: f32, wet: f32) -> Self {
        Self {
            line: DelayLine::with_duration(delay_seconds, sample_rate),
            tone: SVFilter::lowpass(tone_hz),
            delay_seconds,
            feedback: feedback.clamp(0.0, 0.95),
            wet: wet.clamp(0.0, 1.0),
            sample_rate,
        }
    }

    pub fn delay_samples(&self) -> usize {
        (self.delay_seconds * self.sample_rate).round() as usize
    }

    /// Drop every pending echo.
    pub fn clear(&mut self) {
        self.line.reset();
        self.tone.reset();
    }
}

impl GraphNode for DubDelayNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        let delay = self.delay_samples();
        for sample in out.iter_mut() {
            let dry = *sample;
            let delayed = self.line.read(delay);
            let darkened = self.tone.process(delayed, ctx.sample_rate);
            self.line.write(dry + darkened * self.feedback);
            *sample = dry + delayed * self.wet;
        }
    }
}
