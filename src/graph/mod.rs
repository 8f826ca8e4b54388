//! Composable building blocks for voice graphs.
//!
//! Graph nodes wrap the low-level DSP primitives with what a one-shot voice
//! needs: a strike event, block rendering and an "am I still sounding" flag.
//! `extensions` adds the fluent `.amplify()` / `.through()` helpers used by
//! `synth::voice` to assemble a voice from its descriptor.

/// Multiply a signal by an envelope.
pub mod amplify;
/// Low-passed feedback delay ("dub" echo).
pub mod delay;
/// Percussive envelope node.
pub mod envelope;
/// Fluent combinators.
pub mod extensions;
/// State-variable filter node.
pub mod filter;
/// Sum of several partials.
pub mod mix;
/// Core traits shared by all graph nodes.
pub mod node;
/// Fixed-frequency oscillators and noise.
pub mod oscillator;
/// Diffuse reverb node.
pub mod reverb;
/// Serial chaining of two nodes (source → effect).
pub mod through;

pub use node::{GraphNode, RenderCtx};
