//! blockdub - mempool dub sonification in the terminal
//!
//! Run with: cargo run -- --feed demo

mod audio_out;
mod feed;
mod headless;
mod ui;

use std::{
    fs::File,
    path::PathBuf,
    sync::Mutex,
    time::{Duration, Instant},
};

use blockdub::{config::FeedSource, Config, Session};
use clap::Parser;
use color_eyre::eyre::{Result as EyreResult, WrapErr};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "blockdub=info";

/// Realtime dub sonification of a mempool transaction stream.
#[derive(Debug, Parser)]
#[command(name = "blockdub", version, about)]
struct Cli {
    /// TOML config file
    #[arg(long, env = "BLOCKDUB_CONFIG")]
    config: Option<PathBuf>,

    /// Master volume, 0.0 to 1.0
    #[arg(long)]
    volume: Option<f32>,

    /// Seed for all random decisions
    #[arg(long)]
    seed: Option<u64>,

    /// `demo`, `stdin` (or `-`), or a path to a JSON-lines file
    #[arg(long, value_parser = parse_feed)]
    feed: Option<FeedSource>,

    /// No TUI; log to stderr
    #[arg(long)]
    headless: bool,

    /// Log file used in TUI mode
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Frame rate of the bubble field
    #[arg(long)]
    fps: Option<u32>,
}

fn parse_feed(value: &str) -> Result<FeedSource, String> {
    if value.is_empty() {
        return Err("feed must not be empty".into());
    }
    Ok(FeedSource::parse(value))
}

impl Cli {
    /// Config file (or defaults), then flags on top.
    fn resolve(self) -> EyreResult<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)
                .wrap_err_with(|| format!("failed to load config {}", path.display()))?,
            None => Config::default(),
        };
        if let Some(volume) = self.volume {
            config.volume = volume;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(feed) = self.feed {
            config.feed = feed;
        }
        if let Some(log_file) = self.log_file {
            config.log_file = log_file;
        }
        if let Some(fps) = self.fps {
            config.fps = fps;
        }
        config.headless |= self.headless;
        config.validate().wrap_err("invalid command line")?;
        Ok(config)
    }
}

fn init_tracing(config: &Config) -> EyreResult<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    if config.headless {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        // the terminal belongs to the TUI
        let file = File::create(&config.log_file)
            .wrap_err_with(|| format!("failed to create log file {}", config.log_file.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    }
    Ok(())
}

fn main() -> EyreResult<()> {
    color_eyre::install()?;

    let mut config = Cli::parse().resolve()?;
    init_tracing(&config)?;

    // pin the seed so it can be logged and replayed
    let seed = config.seed.unwrap_or_else(rand::random);
    config.seed = Some(seed);

    let mut feed = feed::spawn(&config.feed, config.demo_rate, seed)?;
    let clock = Instant::now();

    let mut session = Session::new(&config);
    session.start(clock.elapsed());

    let mut output = match audio_out::AudioOutput::open(config.voice_queue) {
        Ok((output, voices)) => {
            session.activate_audio(voices, clock.elapsed());
            Some(output)
        }
        Err(err) => {
            tracing::warn!("running silent: {err:#}");
            None
        }
    };

    let result = if config.headless {
        headless::run(&mut session, &mut feed, clock)
    } else {
        let scope = output.as_mut().and_then(audio_out::AudioOutput::take_scope);
        ui::run(&mut session, &mut feed, clock, scope)
    };

    session.shutdown();
    feed.stop();
    // let the master fade out before the stream is dropped
    std::thread::sleep(Duration::from_millis(150));
    drop(output);

    result
}
