use crate::{
    audio::voice::{Route, VoiceSpec},
    graph::{
        amplify::Amplify,
        envelope::EnvNode,
        extensions::NodeExt,
        filter::FilterNode,
        mix::Stack,
        node::{GraphNode, RenderCtx},
        oscillator::OscNode,
        through::Through,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceState {
    Free,    // Available for allocation
    Waiting, // Started, still inside its start offset
    Active,  // Sounding until the envelope runs out
}

/// partials → Stack → amplify(envelope, peak) → filter (or bypass)
type VoiceGraph = Through<Amplify<Stack, EnvNode>, FilterNode>;

/// One slot of the bus's voice pool.
///
/// The graph is built once with the slot. `start` reloads it in place from a
/// descriptor, so playing a voice on the render thread never allocates.
pub struct Voice {
    graph: VoiceGraph,
    state: VoiceState,
    route: Route,
    age: u64,
    pending_samples: usize,
    sample_rate: f32,
    ctx: RenderCtx,
}

impl Voice {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            graph: Stack::new()
                .amplify(EnvNode::percussive(0.0, 0.0), 0.0)
                .through(FilterNode::bypass()),
            state: VoiceState::Free,
            route: Route::Dry,
            age: 0,
            pending_samples: 0,
            sample_rate,
            ctx: RenderCtx::new(sample_rate),
        }
    }

    /// Load `spec` into this slot. `age` orders voices for stealing.
    pub fn start(&mut self, spec: &VoiceSpec, age: u64) {
        let enveloped = &mut self.graph.source;
        enveloped.signal.clear();
        for (i, partial) in spec.partials.iter().enumerate() {
            let osc = OscNode::new(partial.waveform, partial.frequency, spec.seed.wrapping_add(i as u64))
                .with_detune(partial.detune_cents);
            enveloped.signal.push(osc, partial.weight);
        }
        enveloped.envelope = EnvNode::percussive(spec.envelope.attack, spec.envelope.decay);
        enveloped.gain = spec.envelope.peak;

        self.graph.effect = match spec.filter {
            Some(filter) => FilterNode::new(filter.filter_type, filter.cutoff_hz, filter.resonance),
            None => FilterNode::bypass(),
        };

        self.route = spec.route;
        self.age = age;
        self.pending_samples = (spec.start_offset * self.sample_rate).round() as usize;
        self.ctx = RenderCtx::new(self.sample_rate);
        self.state = VoiceState::Waiting;
    }

    /// Cut the voice immediately.
    pub fn free(&mut self) {
        self.state = VoiceState::Free;
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn age(&self) -> u64 {
        self.age
    }

    pub fn state(&self) -> VoiceState {
        self.state
    }

    pub fn is_free(&self) -> bool {
        self.state == VoiceState::Free
    }

    /// Render into `out` (overwrites). Silence until the start offset passes;
    /// the slot frees itself once the envelope has run out.
    pub fn render(&mut self, out: &mut [f32]) {
        out.fill(0.0);
        if self.state == VoiceState::Free {
            return;
        }

        let skip = self.pending_samples.min(out.len());
        self.pending_samples -= skip;
        if skip == out.len() {
            return;
        }

        if self.state == VoiceState::Waiting {
            self.graph.strike(&self.ctx);
            self.state = VoiceState::Active;
        }

        let sounding = &mut out[skip..];
        self.graph.render_block(sounding, &self.ctx);
        self.ctx = self.ctx.advanced(sounding.len());

        if !self.graph.is_active() {
            self.free();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::voice::{EnvelopeSpec, Partial, VoiceKind};
    use crate::dsp::{filter::FilterType, oscillator::OscillatorWaveform};

    fn short_spec() -> VoiceSpec {
        VoiceSpec::new(
            VoiceKind::Pluck,
            [Partial::new(OscillatorWaveform::Sine, 100.0, 1.0)],
            EnvelopeSpec {
                attack: 0.002,
                decay: 0.02,
                peak: 0.5,
            },
        )
    }

    fn started(spec: &VoiceSpec) -> Voice {
        let mut voice = Voice::new(1_000.0);
        voice.start(spec, 0);
        voice
    }

    #[test]
    fn new_slot_is_free_and_silent() {
        let mut voice = Voice::new(1_000.0);
        let mut buffer = vec![1.0f32; 16];
        voice.render(&mut buffer);
        assert!(voice.is_free());
        assert!(buffer.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn waits_for_start_offset() {
        let spec = short_spec().starting_after(0.05);
        let mut voice = started(&spec);

        let mut buffer = vec![0.0f32; 40];
        voice.render(&mut buffer);
        assert!(buffer.iter().all(|&s| s == 0.0));
        assert_eq!(voice.state(), VoiceState::Waiting);

        voice.render(&mut buffer);
        assert!(buffer[..10].iter().all(|&s| s == 0.0));
        assert!(buffer[10..].iter().any(|&s| s != 0.0));
        assert_eq!(voice.state(), VoiceState::Active);
    }

    #[test]
    fn frees_itself_after_its_duration() {
        let mut voice = started(&short_spec());
        let mut buffer = vec![0.0f32; 16];
        voice.render(&mut buffer);
        assert!(!voice.is_free());
        for _ in 0..2 {
            voice.render(&mut buffer);
        }
        assert!(voice.is_free());
    }

    #[test]
    fn restarting_a_slot_replaces_the_previous_voice() {
        let filtered = short_spec().with_filter(FilterType::LowPass, 50.0, 0.0).with_route(Route::Reverb);
        let mut voice = started(&filtered);
        assert_eq!(voice.route(), Route::Reverb);

        let mut fresh = Voice::new(1_000.0);
        voice.start(&short_spec(), 7);
        fresh.start(&short_spec(), 7);
        assert_eq!(voice.route(), Route::Dry);
        assert_eq!(voice.age(), 7);

        let mut a = vec![0.0f32; 16];
        let mut b = vec![0.0f32; 16];
        voice.render(&mut a);
        fresh.render(&mut b);
        assert_eq!(a, b);
    }
}
