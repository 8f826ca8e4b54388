//! Wires the ingestion callbacks, dispatcher, audio engine and particle
//! engine together, and owns both loop timers.
//!
//! Everything runs on the caller's thread. The host calls [`Session::poll`]
//! and checks [`Session::frame_due`] from its loop; callbacks may be invoked
//! in between at any time and only enqueue or mutate.

use std::time::Duration;

use rand::{rngs::SmallRng, Rng, SeedableRng};

use crate::{
    audio::AudioEngine,
    config::Config,
    dispatch::{Beat, BeatDispatcher, RepeatingTimer, TickEvent, TickOutcome},
    ingest::FeedEvent,
    particles::{Canvas, ParticleEngine, Point},
    synth::message::VoiceSink,
    tx::{Block, MempoolStats, Transaction},
};

/// Volume change per `nudge_volume` step.
pub const VOLUME_STEP: f32 = 0.05;

/// `R` drives the beat dispatcher's decisions; the particle field always
/// uses a `SmallRng` derived from the same seed.
pub struct Session<S, R = SmallRng> {
    dispatcher: BeatDispatcher<R>,
    audio: AudioEngine<S>,
    particles: ParticleEngine<SmallRng>,
    beat_timer: RepeatingTimer,
    frame_timer: RepeatingTimer,
    frame_period: Duration,
    latest_block: Option<Block>,
    stats: Option<MempoolStats>,
    connected: bool,
    last_beat: Option<Beat>,
    dispatched: u64,
    seed: u64,
}

impl<S: VoiceSink> Session<S> {
    pub fn new(config: &Config) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        Self::build(config, seed, SmallRng::seed_from_u64(seed))
    }
}

impl<S: VoiceSink, R: Rng> Session<S, R> {
    /// Like [`Session::new`], but beat decisions come from `rng`.
    pub fn with_dispatch_rng(config: &Config, rng: R) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        Self::build(config, seed, rng)
    }

    fn build(config: &Config, seed: u64, rng: R) -> Self {
        let fps = config.fps.max(1);
        Self {
            dispatcher: BeatDispatcher::new(rng),
            audio: AudioEngine::new(config.volume),
            particles: ParticleEngine::new(SmallRng::seed_from_u64(seed.wrapping_add(1))),
            beat_timer: RepeatingTimer::idle(),
            frame_timer: RepeatingTimer::idle(),
            frame_period: Duration::from_secs(1) / fps,
            latest_block: None,
            stats: None,
            connected: false,
            last_beat: None,
            dispatched: 0,
            seed,
        }
    }

    /// Arm both loops. The first beat and frame are due immediately.
    pub fn start(&mut self, now: Duration) {
        self.beat_timer = RepeatingTimer::starting_at(now);
        self.frame_timer = RepeatingTimer::starting_at(now);
        tracing::info!(seed = self.seed, "session started");
    }

    /// Bind an audio output. Without this the session runs silent.
    pub fn activate_audio(&mut self, sink: S, now: Duration) {
        self.audio.activate(sink, now);
    }

    pub fn is_running(&self) -> bool {
        self.beat_timer.is_armed()
    }

    pub fn on_transaction(&mut self, tx: Transaction) {
        self.particles.observe_fee_rate(tx.fee_rate);
        self.dispatcher.push(tx);
    }

    pub fn on_block(&mut self, block: Block) {
        tracing::info!(height = block.height, "block confirmed");
        self.latest_block = Some(block);
        self.particles.flash_block();
        self.audio.play_block_confirm();
    }

    pub fn on_stats(&mut self, stats: MempoolStats) {
        self.stats = Some(stats);
    }

    pub fn on_status(&mut self, connected: bool) {
        if connected != self.connected {
            tracing::info!(connected, "feed status");
        }
        self.connected = connected;
    }

    pub fn ingest(&mut self, event: FeedEvent) {
        match event {
            FeedEvent::Transaction(tx) => self.on_transaction(tx),
            FeedEvent::Block(block) => self.on_block(block),
            FeedEvent::Stats(stats) => self.on_stats(stats),
            FeedEvent::Status { connected } => self.on_status(connected),
        }
    }

    /// Run the dispatcher if its step is due, and the audio ambience.
    /// Returns the tick outcome when a beat ran.
    pub fn poll(&mut self, now: Duration) -> Option<TickOutcome> {
        let outcome = if self.beat_timer.poll(now) {
            let outcome = self.dispatcher.tick();
            self.beat_timer.schedule_after(now, outcome.delay);
            self.route(&outcome);
            Some(outcome)
        } else {
            None
        };
        self.audio.poll(now);
        outcome
    }

    fn route(&mut self, outcome: &TickOutcome) {
        let beat = outcome.beat;
        self.last_beat = Some(beat);
        match &outcome.event {
            TickEvent::Dispatched(tx) => {
                self.dispatched += 1;
                self.audio.play_transaction(tx.value, &beat);
                self.particles.add_transaction(tx.clone());
            }
            TickEvent::Ghost => self.audio.play_transaction(0, &beat),
            TickEvent::Rest if beat.accent => self.audio.play_accent(),
            TickEvent::Rest => {}
        }
    }

    /// True once per frame period. Re-arms itself.
    pub fn frame_due(&mut self, now: Duration) -> bool {
        if self.frame_timer.poll(now) {
            self.frame_timer.schedule_after(now, self.frame_period);
            true
        } else {
            false
        }
    }

    pub fn render_frame<C: Canvas + ?Sized>(&mut self, canvas: &mut C) {
        self.particles.render_frame(canvas);
    }

    /// Earliest moment either loop needs attention.
    pub fn next_wakeup(&self) -> Option<Duration> {
        match (self.beat_timer.next_due(), self.frame_timer.next_due()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Cancel both loops and silence the output.
    pub fn shutdown(&mut self) {
        self.beat_timer.cancel();
        self.frame_timer.cancel();
        self.audio.shutdown();
        tracing::info!(
            dispatched = self.dispatched,
            dropped = self.dispatcher.queue().dropped(),
            "session stopped"
        );
    }

    pub fn set_pointer(&mut self, pointer: Option<Point>) {
        self.particles.set_pointer(pointer);
    }

    pub fn hovered(&self) -> Option<&Transaction> {
        self.particles.hovered()
    }

    pub fn nudge_volume(&mut self, steps: i32) {
        let volume = self.audio.volume() + steps as f32 * VOLUME_STEP;
        self.audio.set_volume(volume);
    }

    pub fn toggle_mute(&mut self) {
        let muted = !self.audio.is_muted();
        self.audio.set_muted(muted);
    }

    pub fn queue_len(&self) -> usize {
        self.dispatcher.queue_len()
    }

    pub fn last_beat(&self) -> Option<Beat> {
        self.last_beat
    }

    pub fn dispatched(&self) -> u64 {
        self.dispatched
    }

    pub fn latest_block(&self) -> Option<Block> {
        self.latest_block
    }

    pub fn stats(&self) -> Option<MempoolStats> {
        self.stats
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn audio(&self) -> &AudioEngine<S> {
        &self.audio
    }

    pub fn particles(&self) -> &ParticleEngine<SmallRng> {
        &self.particles
    }

    pub fn dispatcher(&self) -> &BeatDispatcher<R> {
        &self.dispatcher
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{audio::voice::VoiceKind, synth::message::BusMessage};
    use rand::rngs::mock::StepRng;

    type TestSession = Session<Vec<BusMessage>>;

    fn session() -> TestSession {
        let config = Config {
            seed: Some(99),
            ..Config::default()
        };
        let mut session = TestSession::new(&config);
        session.start(Duration::ZERO);
        session
    }

    #[test]
    fn poll_ticks_only_when_due() {
        let mut s = session();
        let first = s.poll(Duration::ZERO).expect("first beat is due at start");
        assert!(s.poll(first.delay - Duration::from_millis(1)).is_none());
        assert!(s.poll(first.delay).is_some());
    }

    #[test]
    fn transactions_flow_to_particles() {
        let mut s = session();
        for n in 0..8 {
            s.on_transaction(Transaction::new(format!("t{n}"), 20_000, 3.0));
        }
        let mut now = Duration::ZERO;
        for _ in 0..64 {
            if let Some(outcome) = s.poll(now) {
                now += outcome.delay;
            }
        }
        assert_eq!(s.queue_len(), 0);
        assert_eq!(s.dispatched(), 8);
        assert_eq!(s.particles().len(), 8);
    }

    #[test]
    fn block_flashes_and_records_height() {
        let mut s = session();
        s.ingest(FeedEvent::Block(Block { height: 5, timestamp: 1 }));
        assert_eq!(s.latest_block().map(|b| b.height), Some(5));
        assert_eq!(s.particles().ambient().flash_level(), 1.0);
    }

    #[test]
    fn frame_timer_follows_fps() {
        let mut s = session();
        assert!(s.frame_due(Duration::ZERO));
        assert!(!s.frame_due(Duration::from_millis(20)));
        assert!(s.frame_due(Duration::from_millis(34)));
    }

    #[test]
    fn shutdown_stops_both_loops() {
        let mut s = session();
        s.activate_audio(Vec::new(), Duration::ZERO);
        s.shutdown();
        assert!(!s.is_running());
        assert!(s.poll(Duration::from_secs(10)).is_none());
        assert!(!s.frame_due(Duration::from_secs(10)));
        assert_eq!(s.next_wakeup(), None);
        let sent = s.audio().sink().map(Vec::as_slice).unwrap_or_default();
        assert_eq!(sent.last(), Some(&BusMessage::Silence));
    }

    #[test]
    fn volume_nudges_and_mute() {
        let mut s = session();
        let start = s.audio().volume();
        s.nudge_volume(2);
        assert!((s.audio().volume() - (start + 2.0 * VOLUME_STEP)).abs() < 1e-6);
        s.nudge_volume(-100);
        assert_eq!(s.audio().volume(), 0.0);
        s.toggle_mute();
        assert!(s.audio().is_muted());
    }

    #[test]
    fn accented_rest_plays_the_organ_skank() {
        // Draws step through 0.25, 0.5, 0.75, 0.0: the ghost rolls on beats
        // 0, 2 and 4 miss, the accent roll on beat 4 hits.
        let rng = StepRng::new(1 << 62, 1 << 62);
        let config = Config {
            seed: Some(3),
            ..Config::default()
        };
        let mut s: Session<Vec<BusMessage>, StepRng> = Session::with_dispatch_rng(&config, rng);
        s.start(Duration::ZERO);
        s.activate_audio(Vec::new(), Duration::ZERO);
        let before = s.audio().sink().map(Vec::len).unwrap_or_default();

        let mut now = Duration::ZERO;
        let mut outcomes = Vec::new();
        while outcomes.len() < 5 {
            if let Some(outcome) = s.poll(now) {
                now += outcome.delay;
                outcomes.push(outcome);
            }
        }

        let skank = &outcomes[4];
        assert_eq!(skank.beat.index, 4);
        assert!(skank.beat.accent);
        assert_eq!(skank.event, TickEvent::Rest);
        assert!(outcomes[..4].iter().all(|o| o.event == TickEvent::Rest && !o.beat.accent));

        let sent = s.audio().sink().map(Vec::as_slice).unwrap_or_default();
        let kinds: Vec<VoiceKind> = sent[before..]
            .iter()
            .filter_map(|msg| match msg {
                BusMessage::Play(spec) if spec.kind != VoiceKind::Shaker => Some(spec.kind),
                _ => None,
            })
            .collect();
        assert_eq!(kinds, [VoiceKind::OrganSkank]);
    }
}
