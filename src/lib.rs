pub mod audio; // Voice selection and descriptors
pub mod config;
pub mod dispatch; // Beat grid, pending queue, scheduling policy
pub mod dsp;
pub mod error;
pub mod graph; // Composable audio graph nodes
pub mod ingest;
pub mod mapping;
pub mod particles;
pub mod session;
pub mod synth; // Realtime voice rendering and the shared effects bus
pub mod tx;

pub use config::Config;
pub use error::{Error, Result};
pub use session::Session;

pub const MAX_BLOCK_SIZE: usize = 2048;
pub(crate) const MIN_TIME: f32 = 1.0 / 48_000.0;
pub const MAX_DELAY_SAMPLES: usize = 192_000;
/// Most oscillators a single voice stacks.
pub const MAX_PARTIALS: usize = 4;
