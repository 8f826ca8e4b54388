//! Runtime configuration. Policy constants (beat timing, probabilities,
//! queue cap) are compile-time; only presentation knobs live here.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Where transactions come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedSource {
    /// Built-in synthetic generator.
    Demo,
    /// JSON lines on standard input.
    Stdin,
    /// JSON lines read from a file.
    File(PathBuf),
}

impl FeedSource {
    /// `demo`, `stdin` or a path.
    pub fn parse(value: &str) -> Self {
        match value {
            "demo" => Self::Demo,
            "stdin" | "-" => Self::Stdin,
            path => Self::File(PathBuf::from(path)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Master volume in [0, 1].
    pub volume: f32,
    /// Seed for every random decision; None seeds from entropy.
    pub seed: Option<u64>,
    pub feed: FeedSource,
    /// Frame loop rate.
    pub fps: u32,
    /// Skip the TUI and log to stderr.
    pub headless: bool,
    /// Log destination in TUI mode.
    pub log_file: PathBuf,
    /// Transactions per second produced by the demo feed, on average.
    pub demo_rate: f64,
    /// Capacity of the engine → audio thread ring buffer.
    pub voice_queue: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            volume: 0.6,
            seed: None,
            feed: FeedSource::Demo,
            fps: 30,
            headless: false,
            log_file: PathBuf::from("blockdub.log"),
            demo_rate: 12.0,
            voice_queue: 256,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.volume) {
            return Err(Error::ConfigValue {
                field: "volume",
                reason: format!("{} is outside [0, 1]", self.volume),
            });
        }
        if self.fps == 0 || self.fps > 240 {
            return Err(Error::ConfigValue {
                field: "fps",
                reason: format!("{} is outside 1..=240", self.fps),
            });
        }
        if self.demo_rate.is_nan() || self.demo_rate <= 0.0 {
            return Err(Error::ConfigValue {
                field: "demo_rate",
                reason: "must be positive".into(),
            });
        }
        if self.voice_queue == 0 {
            return Err(Error::ConfigValue {
                field: "voice_queue",
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }
}
