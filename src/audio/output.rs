use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use ringbuf::traits::{Consumer, Split};
use ringbuf::{HeapCons, HeapProd, HeapRb};
use std::fmt;
use tracing::warn;

/// Why the output stream could not be brought up. All of these are
/// recoverable from the app's point of view: the scene keeps running
/// silently and the next user gesture retries.
#[derive(Debug)]
pub enum AudioError {
    NoDevice,
    DefaultConfig(cpal::DefaultStreamConfigError),
    BuildStream(cpal::BuildStreamError),
    Play(cpal::PlayStreamError),
}

impl fmt::Display for AudioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioError::NoDevice => write!(f, "no default audio output device"),
            AudioError::DefaultConfig(e) => write!(f, "no default stream config: {e}"),
            AudioError::BuildStream(e) => write!(f, "failed to build output stream: {e}"),
            AudioError::Play(e) => write!(f, "failed to start output stream: {e}"),
        }
    }
}

impl std::error::Error for AudioError {}

/// Cpal output stream fed from an SPSC ring. The worker renders mono;
/// the device callback duplicates the sample across all channels.
pub struct AudioOutput {
    stream: Option<cpal::Stream>,
    sample_rate: u32,
}

impl AudioOutput {
    pub fn new(latency_ms: f32) -> Result<(Self, HeapProd<f32>), AudioError> {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or(AudioError::NoDevice)?;
        let supported = device
            .default_output_config()
            .map_err(AudioError::DefaultConfig)?;
        let sample_rate = supported.sample_rate().0;
        let channels = supported.channels() as usize;

        let config = cpal::StreamConfig {
            channels: channels as u16,
            sample_rate: cpal::SampleRate(sample_rate),
            buffer_size: cpal::BufferSize::Default,
        };

        let capacity = ((sample_rate as f32 * latency_ms / 1000.0) as usize).max(256);
        let rb = HeapRb::<f32>::new(capacity * 4);
        let (prod, mut cons): (HeapProd<f32>, HeapCons<f32>) = rb.split();

        let stream = device
            .build_output_stream(
                &config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    let n_frames = data.len() / channels;
                    for frame in 0..n_frames {
                        let s = cons.try_pop().unwrap_or(0.0);
                        for ch in 0..channels {
                            data[frame * channels + ch] = s;
                        }
                    }
                },
                |err| warn!("audio stream error: {err}"),
                None,
            )
            .map_err(AudioError::BuildStream)?;
        stream.play().map_err(AudioError::Play)?;

        Ok((
            Self {
                stream: Some(stream),
                sample_rate,
            },
            prod,
        ))
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

impl Drop for AudioOutput {
    fn drop(&mut self) {
        self.stream.take();
    }
}
