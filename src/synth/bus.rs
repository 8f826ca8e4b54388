use crate::{
    dsp::gain::SmoothedGain,
    graph::{
        delay::DubDelayNode,
        node::{GraphNode, RenderCtx},
        reverb::ReverbNode,
    },
    synth::{
        message::{BusMessage, MessageReceiver},
        voice::Voice,
    },
    audio::voice::Route,
    MAX_BLOCK_SIZE,
};

/// Polyphony ceiling; past it the oldest voice is stolen.
pub const MAX_VOICES: usize = 64;
/// Master gain glide time constant (seconds).
pub const MASTER_TAU: f32 = 0.05;

const ECHO_SECONDS: f32 = 0.375;
const ECHO_FEEDBACK: f32 = 0.45;
const ECHO_TONE_HZ: f32 = 1_800.0;
const ECHO_WET: f32 = 0.35;

const REVERB_DECAY_SECONDS: f32 = 4.0;
const REVERB_DAMPING: f32 = 0.35;
const REVERB_RETURN: f32 = 0.6;

/// Render-thread end of the audio engine.
///
/// Every buffer and all `MAX_VOICES` voice slots are allocated in `new`;
/// `render_block` never touches the allocator.
///
/// ```text
/// voices ──┬──────────────────────────→ (+) ──→ [master] ──→ [dub delay] ──→ out
///          └─ (Route::Reverb) ──→ [reverb] ──┘
/// ```
pub struct SynthBus<R: MessageReceiver> {
    rx: R,
    sample_rate: f32,
    voices: Vec<Voice>,
    started: u64,
    master: SmoothedGain,
    reverb: ReverbNode,
    echo: DubDelayNode,
    ctx: RenderCtx,
    dry_buffer: Vec<f32>,
    send_buffer: Vec<f32>,
    voice_buffer: Vec<f32>,
}

impl<R: MessageReceiver> SynthBus<R> {
    pub fn new(sample_rate: f32, rx: R) -> Self {
        Self {
            rx,
            sample_rate,
            voices: (0..MAX_VOICES).map(|_| Voice::new(sample_rate)).collect(),
            started: 0,
            master: SmoothedGain::new(0.0, MASTER_TAU),
            reverb: ReverbNode::new(sample_rate, REVERB_DECAY_SECONDS, REVERB_DAMPING, REVERB_RETURN),
            echo: DubDelayNode::new(sample_rate, ECHO_SECONDS, ECHO_FEEDBACK, ECHO_TONE_HZ, ECHO_WET),
            ctx: RenderCtx::new(sample_rate),
            dry_buffer: vec![0.0; MAX_BLOCK_SIZE],
            send_buffer: vec![0.0; MAX_BLOCK_SIZE],
            voice_buffer: vec![0.0; MAX_BLOCK_SIZE],
        }
    }

    pub fn active_voices(&self) -> usize {
        self.voices.iter().filter(|voice| !voice.is_free()).count()
    }

    pub fn master_gain(&self) -> f32 {
        self.master.current()
    }

    fn process_messages(&mut self) {
        while let Some(msg) = self.rx.pop() {
            match msg {
                BusMessage::Play(spec) => {
                    let age = self.started;
                    self.started += 1;
                    if let Some(voice) = self.allocate_voice() {
                        voice.start(&spec, age);
                    }
                }
                BusMessage::SetVolume(volume) => {
                    self.master.set_target(volume.clamp(0.0, 1.0));
                }
                BusMessage::Silence => {
                    for voice in &mut self.voices {
                        voice.free();
                    }
                    self.reverb.clear();
                    self.echo.clear();
                    self.master.set_target(0.0);
                }
            }
        }
    }

    /// A free slot, or the oldest sounding voice when all are busy.
    fn allocate_voice(&mut self) -> Option<&mut Voice> {
        let idx = match self.voices.iter().position(|v| v.is_free()) {
            Some(idx) => idx,
            None => self
                .voices
                .iter()
                .enumerate()
                .min_by_key(|(_, v)| v.age())
                .map(|(idx, _)| idx)?,
        };
        self.voices.get_mut(idx)
    }

    /// Render one mono block. Blocks longer than `MAX_BLOCK_SIZE` are split.
    pub fn render_block(&mut self, out: &mut [f32]) {
        self.process_messages();

        for chunk in out.chunks_mut(MAX_BLOCK_SIZE) {
            self.render_chunk(chunk);
        }
    }

    fn render_chunk(&mut self, out: &mut [f32]) {
        let frames = out.len();
        let dry = &mut self.dry_buffer[..frames];
        let send = &mut self.send_buffer[..frames];
        let scratch = &mut self.voice_buffer[..frames];
        dry.fill(0.0);
        send.fill(0.0);

        for voice in self.voices.iter_mut().filter(|v| !v.is_free()) {
            voice.render(scratch);
            for (d, v) in dry.iter_mut().zip(scratch.iter()) {
                *d += v;
            }
            if voice.route() == Route::Reverb {
                for (s, v) in send.iter_mut().zip(scratch.iter()) {
                    *s += v;
                }
            }
        }

        self.reverb.render_block(send, &self.ctx);
        for (d, s) in dry.iter_mut().zip(send.iter()) {
            *d += s;
        }

        self.master.apply(dry, self.sample_rate);
        self.echo.render_block(dry, &self.ctx);

        for (o, d) in out.iter_mut().zip(dry.iter()) {
            *o = d.clamp(-1.0, 1.0);
        }
        self.ctx = self.ctx.advanced(frames);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::voice::{EnvelopeSpec, Partial, VoiceKind, VoiceSpec};
    use crate::dsp::oscillator::OscillatorWaveform;
    use std::collections::VecDeque;

    fn blip(route: Route) -> VoiceSpec {
        VoiceSpec::new(
            VoiceKind::Marimba,
            [Partial::new(OscillatorWaveform::Sine, 440.0, 1.0)],
            EnvelopeSpec {
                attack: 0.002,
                decay: 0.05,
                peak: 0.5,
            },
        )
        .with_route(route)
    }

    fn bus_with(messages: Vec<BusMessage>) -> SynthBus<VecDeque<BusMessage>> {
        SynthBus::new(48_000.0, messages.into_iter().collect())
    }

    #[test]
    fn silent_with_no_voices() {
        let mut bus = bus_with(vec![BusMessage::SetVolume(1.0)]);
        let mut out = vec![0.0f32; 512];
        bus.render_block(&mut out);
        assert!(out.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn voices_play_and_are_freed() {
        let mut bus = bus_with(vec![BusMessage::SetVolume(1.0), BusMessage::Play(blip(Route::Dry))]);
        let mut out = vec![0.0f32; 1024];
        bus.render_block(&mut out);
        assert_eq!(bus.active_voices(), 1);
        assert!(out.iter().any(|s| s.abs() > 0.0));
        assert!(out.iter().all(|s| s.abs() <= 1.0));

        for _ in 0..4 {
            bus.render_block(&mut out);
        }
        assert_eq!(bus.active_voices(), 0);
    }

    #[test]
    fn polyphony_is_capped() {
        let messages = (0..MAX_VOICES + 10).map(|_| BusMessage::Play(blip(Route::Reverb))).collect();
        let mut bus = bus_with(messages);
        let mut out = vec![0.0f32; 64];
        bus.render_block(&mut out);
        assert_eq!(bus.active_voices(), MAX_VOICES);
        assert_eq!(bus.voices.len(), MAX_VOICES);
    }

    #[test]
    fn full_pool_steals_the_oldest_voice() {
        let long = VoiceSpec::new(
            VoiceKind::WhaleDrone,
            [Partial::new(OscillatorWaveform::Saw, 49.0, 1.0)],
            EnvelopeSpec {
                attack: 0.01,
                decay: 5.0,
                peak: 0.3,
            },
        );
        let messages = (0..=MAX_VOICES).map(|_| BusMessage::Play(long)).collect();
        let mut bus = bus_with(messages);
        let mut out = vec![0.0f32; 64];
        bus.render_block(&mut out);

        let ages: Vec<u64> = bus.voices.iter().map(Voice::age).collect();
        assert_eq!(ages.iter().min(), Some(&1));
        assert_eq!(ages.iter().max(), Some(&(MAX_VOICES as u64)));
        assert_eq!(bus.active_voices(), MAX_VOICES);
    }

    #[test]
    fn master_gain_glides_to_volume() {
        let mut bus = bus_with(vec![BusMessage::SetVolume(0.8)]);
        let mut out = vec![0.0f32; 256];
        bus.render_block(&mut out);
        assert!(bus.master_gain() > 0.0 && bus.master_gain() < 0.8);

        for _ in 0..200 {
            bus.render_block(&mut out);
        }
        assert!((bus.master_gain() - 0.8).abs() < 0.01);
    }

    #[test]
    fn silence_drops_voices() {
        let mut bus = bus_with(vec![BusMessage::SetVolume(1.0), BusMessage::Play(blip(Route::Dry))]);
        let mut out = vec![0.0f32; 64];
        bus.render_block(&mut out);
        assert_eq!(bus.active_voices(), 1);

        bus.rx.push_back(BusMessage::Silence);
        bus.render_block(&mut out);
        assert_eq!(bus.active_voices(), 0);
    }
}
