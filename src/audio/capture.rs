//! Microphone capture via the host's default audio input device.

use anyhow::{anyhow, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SampleFormat, SizedSample};
use std::sync::{Arc, Mutex};
use tracing::{error, info};

use super::analyzer::SampleRing;

/// Generic failure surfaced to the caller; the underlying cause is logged in
/// detail before this is raised.
const STREAM_NOT_CREATED: &str = "audio input stream not created";

/// Live capture stream feeding the analyzer's sample ring.
pub struct CaptureStream {
    /// Input stream (kept alive; capture stops when dropped)
    _stream: cpal::Stream,

    /// Sample rate of the opened device (Hz)
    sample_rate: u32,
}

impl CaptureStream {
    /// Open the default audio input device and start streaming mono samples
    /// into `sink`.
    ///
    /// Acquisition failures are logged with their underlying cause, then
    /// surfaced as one generic error. There is no retry; the caller aborts
    /// startup.
    pub fn open(sink: Arc<Mutex<SampleRing>>) -> Result<Self> {
        let host = cpal::default_host();
        let device = match host.default_input_device() {
            Some(device) => device,
            None => {
                error!("no audio input device available");
                return Err(anyhow!(STREAM_NOT_CREATED));
            }
        };

        let supported = match device.default_input_config() {
            Ok(config) => config,
            Err(err) => {
                error!("failed to query input config: {err}");
                return Err(anyhow!(STREAM_NOT_CREATED));
            }
        };

        info!(
            "capturing from {} @ {}Hz ({} channel(s), {:?})",
            device.name().unwrap_or_else(|_| "unknown device".to_string()),
            supported.sample_rate().0,
            supported.channels(),
            supported.sample_format(),
        );

        let sample_rate = supported.sample_rate().0;
        let channels = supported.channels() as usize;

        // Default buffer size lets the audio server manage its own timing.
        let config = cpal::StreamConfig {
            channels: supported.channels(),
            sample_rate: supported.sample_rate(),
            buffer_size: cpal::BufferSize::Default,
        };

        let built = match supported.sample_format() {
            SampleFormat::F32 => build_stream::<f32>(&device, &config, channels, sink),
            SampleFormat::I16 => build_stream::<i16>(&device, &config, channels, sink),
            SampleFormat::U16 => build_stream::<u16>(&device, &config, channels, sink),
            other => {
                error!("unsupported input sample format: {other:?}");
                return Err(anyhow!(STREAM_NOT_CREATED));
            }
        };

        let stream = match built {
            Ok(stream) => stream,
            Err(err) => {
                error!("failed to build input stream: {err}");
                return Err(anyhow!(STREAM_NOT_CREATED));
            }
        };

        if let Err(err) = stream.play() {
            error!("failed to start input stream: {err}");
            return Err(anyhow!(STREAM_NOT_CREATED));
        }

        Ok(Self {
            _stream: stream,
            sample_rate,
        })
    }

    /// Sample rate of the capture device (Hz)
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

/// Build an input stream that mixes interleaved frames down to mono and
/// pushes them into the shared sample ring.
fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    channels: usize,
    sink: Arc<Mutex<SampleRing>>,
) -> Result<cpal::Stream, cpal::BuildStreamError>
where
    T: SizedSample,
    f32: FromSample<T>,
{
    let channels = channels.max(1);
    let mut mono = Vec::new();

    device.build_input_stream(
        config,
        move |data: &[T], _: &cpal::InputCallbackInfo| {
            mono.clear();
            mono.extend(data.chunks(channels).map(|frame| {
                frame.iter().map(|&s| f32::from_sample(s)).sum::<f32>() / frame.len() as f32
            }));

            if let Ok(mut ring) = sink.lock() {
                ring.push_slice(&mono);
            }
        },
        |err| error!("audio input stream error: {err}"),
        None,
    )
}
