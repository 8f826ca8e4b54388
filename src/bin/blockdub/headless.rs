//! Run without a terminal UI: the bubble field is still simulated, and a
//! status line is logged periodically.

use std::time::{Duration, Instant};

use blockdub::{particles::DisplayList, synth::VoiceSink, Session};
use color_eyre::eyre::Result as EyreResult;

use crate::feed::FeedHandle;

const REPORT_EVERY: Duration = Duration::from_secs(5);
const MAX_SLEEP: Duration = Duration::from_millis(20);

/// Runs until the feed is exhausted and every bubble has left the field.
/// A demo feed never ends.
pub fn run<S: VoiceSink>(
    session: &mut Session<S>,
    feed: &mut FeedHandle,
    clock: Instant,
) -> EyreResult<()> {
    let mut display = DisplayList::new();
    let mut last_report = Duration::ZERO;

    loop {
        let now = clock.elapsed();
        feed.drain(|event| session.ingest(event));

        if let Some(outcome) = session.poll(now) {
            if let Some(tx) = outcome.dispatched() {
                tracing::debug!(
                    id = %tx.id,
                    value = tx.value,
                    fee_rate = tx.fee_rate,
                    beat = outcome.beat.index,
                    "dispatched"
                );
            }
        }

        if session.frame_due(now) {
            display.clear();
            session.render_frame(&mut display);
        }

        if now.saturating_sub(last_report) >= REPORT_EVERY {
            last_report = now;
            tracing::info!(
                queue = session.queue_len(),
                dispatched = session.dispatched(),
                bubbles = session.particles().len(),
                congestion = session.particles().ambient().intensity(),
                block = session.latest_block().map(|b| b.height),
                "status"
            );
        }

        if feed.is_finished() && session.queue_len() == 0 && session.particles().is_empty() {
            tracing::info!("feed drained");
            return Ok(());
        }

        let wait = session
            .next_wakeup()
            .map(|due| due.saturating_sub(clock.elapsed()))
            .unwrap_or(MAX_SLEEP)
            .min(MAX_SLEEP);
        std::thread::sleep(wait);
    }
}
