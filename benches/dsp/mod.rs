//! Benchmarks for low-level DSP primitives.

mod filter;
mod oscillator;
mod reverb;

pub use filter::bench_filter;
pub use oscillator::bench_oscillator;
pub use reverb::bench_reverb;
