#[cfg(feature = "rtrb")]
use rtrb::{Consumer, Producer};
use std::collections::VecDeque;

use crate::audio::voice::VoiceSpec;

/// Control traffic from the audio engine to the render thread. Plain data:
/// popping a message on the render thread frees nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BusMessage {
    Play(VoiceSpec),
    SetVolume(f32),
    /// Stop every voice, clear the effect tails, fade the master to zero.
    Silence,
}

/// Backend side: where the bus pulls messages from.
pub trait MessageReceiver {
    fn pop(&mut self) -> Option<BusMessage>;
}

#[cfg(feature = "rtrb")]
impl MessageReceiver for Consumer<BusMessage> {
    fn pop(&mut self) -> Option<BusMessage> {
        Consumer::pop(self).ok()
    }
}

impl MessageReceiver for VecDeque<BusMessage> {
    fn pop(&mut self) -> Option<BusMessage> {
        self.pop_front()
    }
}

/// Engine side: where voice descriptors are submitted.
///
/// Returns false when the message could not be delivered; callers treat that
/// as a dropped voice, never as an error.
pub trait VoiceSink {
    fn send(&mut self, msg: BusMessage) -> bool;
}

#[cfg(feature = "rtrb")]
impl VoiceSink for Producer<BusMessage> {
    fn send(&mut self, msg: BusMessage) -> bool {
        self.push(msg).is_ok()
    }
}

impl VoiceSink for Vec<BusMessage> {
    fn send(&mut self, msg: BusMessage) -> bool {
        self.push(msg);
        true
    }
}
