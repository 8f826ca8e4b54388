//! cpal output stream driving the synth bus.

use blockdub::{
    synth::{BusMessage, SynthBus},
    MAX_BLOCK_SIZE,
};
use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rtrb::{Consumer, Producer, RingBuffer};

/// Mono samples kept for the scope.
const SCOPE_CAPACITY: usize = 8192;

/// Copy of the rendered signal for display.
pub struct ScopeTap {
    pub samples: Consumer<f32>,
    pub sample_rate: f32,
}

/// Owns the running stream. Dropping it stops audio.
pub struct AudioOutput {
    _stream: cpal::Stream,
    scope: Option<ScopeTap>,
}

impl AudioOutput {
    /// Open the default device. Returns the output and the producer the
    /// engine submits voices through.
    pub fn open(voice_queue: usize) -> EyreResult<(Self, Producer<BusMessage>)> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available"))?;
        let config = device
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;

        let sample_rate = config.sample_rate().0 as f32;
        let channels = config.channels() as usize;

        let (voice_tx, voice_rx) = RingBuffer::<BusMessage>::new(voice_queue);
        let (mut scope_tx, scope_rx) = RingBuffer::<f32>::new(SCOPE_CAPACITY);

        let mut bus = SynthBus::new(sample_rate, voice_rx);
        let mut mono = vec![0.0f32; MAX_BLOCK_SIZE];

        let stream = device
            .build_output_stream(
                &config.into(),
                move |data: &mut [f32], _| {
                    for chunk in data.chunks_mut(MAX_BLOCK_SIZE * channels) {
                        let frames = chunk.len() / channels;
                        let block = &mut mono[..frames];
                        bus.render_block(block);

                        // mono to all channels
                        for (frame, &sample) in chunk.chunks_mut(channels).zip(block.iter()) {
                            frame.fill(sample);
                            // scope is best effort
                            let _ = scope_tx.push(sample);
                        }
                    }
                },
                |err| tracing::error!("audio stream error: {err}"),
                None,
            )
            .wrap_err("failed to build output stream")?;

        stream.play().wrap_err("failed to start output stream")?;
        tracing::info!(sample_rate, channels, "audio output open");

        Ok((
            Self {
                _stream: stream,
                scope: Some(ScopeTap {
                    samples: scope_rx,
                    sample_rate,
                }),
            },
            voice_tx,
        ))
    }

    /// Hand the scope tap to the UI. Only the first call gets it.
    pub fn take_scope(&mut self) -> Option<ScopeTap> {
        self.scope.take()
    }
}
