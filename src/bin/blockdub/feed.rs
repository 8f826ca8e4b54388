//! Feed thread: reads or generates events and hands them to the main loop
//! over an SPSC ring buffer.

use std::{
    fs::File,
    io::{BufRead, BufReader},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
    time::{Duration, Instant},
};

use blockdub::{
    config::FeedSource,
    ingest::{decode_line, DemoFeed, FeedEvent},
};
use color_eyre::eyre::{Result as EyreResult, WrapErr};
use rand::{rngs::SmallRng, SeedableRng};
use rtrb::{Consumer, Producer, PushError, RingBuffer};

const FEED_QUEUE: usize = 4096;
const DEMO_TICK: Duration = Duration::from_millis(10);
const BACKOFF: Duration = Duration::from_millis(5);
/// Events handed to the session per drain, so a flood cannot stall a frame.
const MAX_DRAIN: usize = 2048;

pub struct FeedHandle {
    events: Consumer<FeedEvent>,
    stop: Arc<AtomicBool>,
    finished: Arc<AtomicBool>,
}

impl FeedHandle {
    pub fn drain(&mut self, mut sink: impl FnMut(FeedEvent)) -> usize {
        let mut count = 0;
        while count < MAX_DRAIN {
            match self.events.pop() {
                Ok(event) => sink(event),
                Err(_) => break,
            }
            count += 1;
        }
        count
    }

    /// Source exhausted and everything drained.
    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::Acquire) && self.events.is_empty()
    }

    /// Ask the thread to stop. A thread blocked on stdin exits with the
    /// process.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::Release);
    }
}

pub fn spawn(source: &FeedSource, demo_rate: f64, seed: u64) -> EyreResult<FeedHandle> {
    let (tx, rx) = RingBuffer::<FeedEvent>::new(FEED_QUEUE);
    let stop = Arc::new(AtomicBool::new(false));
    let finished = Arc::new(AtomicBool::new(false));
    let mut writer = Writer {
        tx,
        stop: stop.clone(),
    };
    // distinct stream from the session's generators
    let rng = SmallRng::seed_from_u64(seed ^ 0xFEED_FEED_FEED_FEED);

    let done = finished.clone();
    let builder = thread::Builder::new().name("feed".into());
    match source {
        FeedSource::Demo => {
            let mut demo = DemoFeed::new(rng, demo_rate);
            builder.spawn(move || {
                let start = Instant::now();
                let mut batch = Vec::new();
                while !writer.stopped() {
                    demo.poll(start.elapsed(), &mut batch);
                    for event in batch.drain(..) {
                        writer.send(event);
                    }
                    thread::sleep(DEMO_TICK);
                }
                done.store(true, Ordering::Release);
            })
        }
        FeedSource::Stdin => builder.spawn(move || {
            read_lines(std::io::stdin().lock(), rng, &mut writer);
            done.store(true, Ordering::Release);
        }),
        FeedSource::File(path) => {
            let file =
                File::open(path).wrap_err_with(|| format!("failed to open feed {}", path.display()))?;
            builder.spawn(move || {
                read_lines(BufReader::new(file), rng, &mut writer);
                done.store(true, Ordering::Release);
            })
        }
    }
    .wrap_err("failed to spawn feed thread")?;

    tracing::info!(?source, "feed started");
    Ok(FeedHandle {
        events: rx,
        stop,
        finished,
    })
}

fn read_lines(reader: impl BufRead, mut rng: SmallRng, writer: &mut Writer) {
    for line in reader.lines() {
        if writer.stopped() {
            return;
        }
        match line {
            Ok(line) => {
                if let Some(event) = decode_line(&line, &mut rng) {
                    writer.send(event);
                }
            }
            Err(err) => {
                tracing::warn!(%err, "feed read failed");
                return;
            }
        }
    }
    tracing::info!("feed exhausted");
}

struct Writer {
    tx: Producer<FeedEvent>,
    stop: Arc<AtomicBool>,
}

impl Writer {
    fn stopped(&self) -> bool {
        self.stop.load(Ordering::Acquire)
    }

    /// Blocks while the ring is full, so a file replays without loss; the
    /// pending queue does the shedding.
    fn send(&mut self, mut event: FeedEvent) {
        loop {
            match self.tx.push(event) {
                Ok(()) => return,
                Err(PushError::Full(back)) => {
                    if self.stopped() {
                        return;
                    }
                    event = back;
                    thread::sleep(BACKOFF);
                }
            }
        }
    }
}
