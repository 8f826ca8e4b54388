//! Synthesis backend: turns voice descriptors into samples on the render
//! thread. The engine side only ever sees `VoiceSink`.

pub mod bus;
pub mod message;
pub mod voice;

pub use bus::SynthBus;
pub use message::{BusMessage, MessageReceiver, VoiceSink};
