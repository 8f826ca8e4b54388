//! The audio engine: decides which voices to play and submits their
//! descriptors to a [`VoiceSink`]. Rendering happens elsewhere
//! ([`crate::synth::SynthBus`]).

pub mod instruments;
pub mod voice;

use std::time::Duration;

pub use voice::{EnvelopeSpec, FilterSpec, Partial, Route, VoiceKind, VoiceSpec};

use crate::{
    dispatch::{Beat, RepeatingTimer},
    synth::message::{BusMessage, VoiceSink},
};

/// Period of the ambient shaker.
pub const SHAKER_PERIOD: Duration = Duration::from_millis(400);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// No output yet; every trigger is a no-op.
    Inactive,
    Running,
    /// Output exists but is paused; triggers are no-ops.
    Suspended,
}

/// Voice selection and the session-long ambient layer.
///
/// The engine keeps no handle on the voices it submits. A voice plays to the
/// end of its envelope on the render side and is freed there.
#[derive(Debug)]
pub struct AudioEngine<S> {
    sink: Option<S>,
    state: EngineState,
    volume: f32,
    muted: bool,
    shaker: RepeatingTimer,
    next_seed: u64,
    dropped: u64,
}

impl<S: VoiceSink> AudioEngine<S> {
    pub fn new(volume: f32) -> Self {
        Self {
            sink: None,
            state: EngineState::Inactive,
            volume: volume.clamp(0.0, 1.0),
            muted: false,
            shaker: RepeatingTimer::idle(),
            next_seed: 0x5EED,
            dropped: 0,
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == EngineState::Running
    }

    /// Bind the output and start the session: master volume, the startup
    /// chime, and the shaker pulse. A second call is ignored.
    pub fn activate(&mut self, sink: S, now: Duration) {
        if self.sink.is_some() {
            tracing::debug!("audio engine already active");
            return;
        }
        self.sink = Some(sink);
        self.state = EngineState::Running;
        self.push_volume();
        self.play_chime();
        self.shaker = RepeatingTimer::starting_at(now);
        tracing::info!(volume = self.volume, "audio engine running");
    }

    pub fn suspend(&mut self) {
        if self.state == EngineState::Running {
            self.state = EngineState::Suspended;
        }
    }

    pub fn resume(&mut self) {
        if self.state == EngineState::Suspended {
            self.state = EngineState::Running;
        }
    }

    /// Drive the shaker. Call from the host loop.
    pub fn poll(&mut self, now: Duration) {
        if !self.shaker.poll(now) {
            return;
        }
        self.shaker.schedule_after(now, SHAKER_PERIOD);
        let seed = self.seed();
        self.submit(instruments::shaker(seed));
    }

    /// Voice for one dispatched beat. `value` of zero plays the ghost
    /// texture instead of a pitched voice.
    pub fn play_transaction(&mut self, value: u64, beat: &Beat) {
        if !self.is_running() {
            return;
        }
        if beat.accent {
            self.play_accent();
        }
        match instruments::for_transaction(value) {
            Some(spec) => {
                tracing::trace!(value, kind = ?spec.kind, "voice");
                self.submit(spec);
            }
            None => {
                let seed = self.seed();
                self.submit(instruments::ghost(seed));
            }
        }
    }

    /// The organ skank on its own.
    pub fn play_accent(&mut self) {
        self.submit(instruments::organ_skank());
    }

    pub fn play_block_confirm(&mut self) {
        self.play_chime();
    }

    /// Master volume in [0, 1], glided on the render side.
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        self.push_volume();
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        self.push_volume();
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Voices the sink refused.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Silence the master output and stop the shaker. Voices already
    /// rendering are cut by the silence.
    pub fn shutdown(&mut self) {
        self.shaker.cancel();
        if let Some(sink) = self.sink.as_mut() {
            sink.send(BusMessage::Silence);
        }
        self.state = EngineState::Inactive;
        tracing::info!("audio engine shut down");
    }

    pub fn sink(&self) -> Option<&S> {
        self.sink.as_ref()
    }

    fn play_chime(&mut self) {
        for note in instruments::chime() {
            self.submit(note);
        }
    }

    fn push_volume(&mut self) {
        let level = if self.muted { 0.0 } else { self.volume };
        if let (EngineState::Running, Some(sink)) = (self.state, self.sink.as_mut()) {
            sink.send(BusMessage::SetVolume(level));
        }
    }

    fn submit(&mut self, spec: VoiceSpec) {
        let Some(sink) = self.sink.as_mut() else {
            return;
        };
        if self.state != EngineState::Running {
            return;
        }
        let kind = spec.kind;
        if !sink.send(BusMessage::Play(spec)) {
            self.dropped += 1;
            tracing::trace!(?kind, "voice dropped, bus full");
        }
    }

    fn seed(&mut self) -> u64 {
        self.next_seed = self.next_seed.wrapping_add(0x9E37_79B9_7F4A_7C15);
        self.next_seed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Engine = AudioEngine<Vec<BusMessage>>;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn kinds(messages: &[BusMessage]) -> Vec<VoiceKind> {
        messages
            .iter()
            .filter_map(|m| match m {
                BusMessage::Play(spec) => Some(spec.kind),
                _ => None,
            })
            .collect()
    }

    fn running() -> Engine {
        let mut engine = Engine::new(0.7);
        engine.activate(Vec::new(), ms(0));
        engine
    }

    fn sent(engine: &Engine) -> &[BusMessage] {
        engine.sink().map(Vec::as_slice).unwrap_or_default()
    }

    #[test]
    fn inactive_engine_is_a_no_op() {
        let mut engine = Engine::new(0.5);
        engine.play_transaction(1_000_000, &Beat::plain(0));
        engine.play_block_confirm();
        engine.play_accent();
        engine.set_volume(0.2);
        engine.poll(ms(10_000));
        assert!(engine.sink().is_none());
        assert_eq!(engine.state(), EngineState::Inactive);
        assert_eq!(engine.volume(), 0.2);
    }

    #[test]
    fn activation_sets_volume_and_chimes() {
        let engine = running();
        let messages = sent(&engine);
        assert_eq!(messages[0], BusMessage::SetVolume(0.7));
        assert_eq!(kinds(messages), vec![VoiceKind::Chime; 4]);
    }

    #[test]
    fn shaker_pulses_every_period() {
        let mut engine = running();
        let before = kinds(sent(&engine)).len();
        for t in (0..=2_000).step_by(50) {
            engine.poll(ms(t));
        }
        let shakers = kinds(sent(&engine))[before..]
            .iter()
            .filter(|&&k| k == VoiceKind::Shaker)
            .count();
        // t = 0, 400, ..., 2000
        assert_eq!(shakers, 6);
    }

    #[test]
    fn whale_value_plays_the_drone() {
        let mut engine = running();
        engine.play_transaction(250_000_000, &Beat::plain(1));
        assert_eq!(kinds(sent(&engine)).last(), Some(&VoiceKind::WhaleDrone));
    }

    #[test]
    fn accent_beat_adds_the_organ() {
        let mut engine = running();
        let before = kinds(sent(&engine)).len();
        engine.play_transaction(500_000, &Beat { index: 4, accent: true });
        assert_eq!(
            kinds(sent(&engine))[before..],
            [VoiceKind::OrganSkank, VoiceKind::Pluck]
        );
    }

    #[test]
    fn zero_value_plays_ghost_texture_only() {
        let mut engine = running();
        let before = kinds(sent(&engine)).len();
        engine.play_transaction(0, &Beat::plain(2));
        assert_eq!(kinds(sent(&engine))[before..], [VoiceKind::Ghost]);
    }

    #[test]
    fn suspended_engine_ignores_triggers() {
        let mut engine = running();
        let before = sent(&engine).len();
        engine.suspend();
        engine.play_transaction(5_000_000, &Beat::plain(0));
        engine.poll(ms(5_000));
        assert_eq!(sent(&engine).len(), before);
        engine.resume();
        engine.play_transaction(5_000_000, &Beat::plain(0));
        assert_eq!(kinds(sent(&engine)).last(), Some(&VoiceKind::Marimba));
    }

    #[test]
    fn volume_is_clamped_and_mute_sends_zero() {
        let mut engine = running();
        engine.set_volume(3.0);
        assert_eq!(engine.volume(), 1.0);
        assert_eq!(sent(&engine).last(), Some(&BusMessage::SetVolume(1.0)));
        engine.set_muted(true);
        assert_eq!(sent(&engine).last(), Some(&BusMessage::SetVolume(0.0)));
        assert_eq!(engine.volume(), 1.0);
    }

    #[test]
    fn shutdown_silences_and_stops_the_shaker() {
        let mut engine = running();
        engine.shutdown();
        assert_eq!(sent(&engine).last(), Some(&BusMessage::Silence));
        let len = sent(&engine).len();
        engine.poll(ms(60_000));
        engine.play_block_confirm();
        assert_eq!(sent(&engine).len(), len);
    }

    struct Full;

    impl VoiceSink for Full {
        fn send(&mut self, _msg: BusMessage) -> bool {
            false
        }
    }

    #[test]
    fn full_sink_counts_drops() {
        let mut engine = AudioEngine::new(0.5);
        engine.activate(Full, ms(0));
        assert_eq!(engine.dropped(), 4);
        engine.play_transaction(5_000_000, &Beat::plain(0));
        assert_eq!(engine.dropped(), 5);
    }
}
