//! Low-level DSP primitives used by the graph nodes and the effects bus.
//!
//! Everything here is allocation-free once constructed, so it can live inside
//! the audio callback.

/// Circular delay buffer.
pub mod delay;
/// One-shot attack / exponential-decay envelope.
pub mod envelope;
/// State-variable filter.
pub mod filter;
/// Smoothed master gain.
pub mod gain;
/// Phase-accumulator oscillators and seeded noise.
pub mod oscillator;
/// Schroeder diffuse reverb.
pub mod reverb;

pub use envelope::EnvelopeState;
