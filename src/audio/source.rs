//! Microphone adapter over CPAL.
//!
//! Converts driver callbacks into queued frames. Every supported sample type
//! is converted to f32 up front so the rest of the pipeline stays
//! format-agnostic. Stream errors reported by the driver (overrun/underrun
//! class) are logged as capture warnings and never abort the capture.

use super::dispatch::FrameChunker;
use super::queue::FrameProducer;
use super::session::CaptureConfig;
use crate::error::PipelineError;
use crate::logging::{log_debug, log_warn};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, Stream, StreamConfig};
use std::sync::{Arc, Mutex};

/// Seam between the capture session and the platform audio device. Mock
/// implementations drive the session tests without hardware.
pub trait AudioSource {
    /// Start continuous capture, handing each produced frame to `producer`.
    fn open(
        &mut self,
        config: &CaptureConfig,
        producer: FrameProducer,
    ) -> Result<(), PipelineError>;

    /// Stop capture and release the device. Idempotent; the session
    /// guarantees it runs on every exit path after a successful `open`.
    fn close(&mut self);
}

/// CPAL-backed microphone source.
pub struct MicSource {
    device: cpal::Device,
    stream: Option<Stream>,
    chunker: Option<Arc<Mutex<FrameChunker>>>,
}

impl MicSource {
    /// List microphone names so the CLI can expose a device selector.
    pub fn list_devices() -> Result<Vec<String>, PipelineError> {
        let host = cpal::default_host();
        let devices = host
            .input_devices()
            .map_err(|err| PipelineError::Device(format!("no input devices available: {err}")))?;
        let mut names = Vec::new();
        for device in devices {
            if let Ok(name) = device.name() {
                names.push(name);
            }
        }
        Ok(names)
    }

    /// Create a source, optionally forcing a specific device so users can
    /// pick the right microphone when the host exposes several inputs.
    pub fn new(preferred_device: Option<&str>) -> Result<Self, PipelineError> {
        let host = cpal::default_host();
        let device = match preferred_device {
            Some(name) => {
                let mut devices = host.input_devices().map_err(|err| {
                    PipelineError::Device(format!("no input devices available: {err}"))
                })?;
                devices
                    .find(|d| d.name().map(|n| n == name).unwrap_or(false))
                    .ok_or_else(|| {
                        PipelineError::Device(format!("input device '{name}' not found"))
                    })?
            }
            None => host.default_input_device().ok_or_else(|| {
                PipelineError::Device("no default input device available".to_string())
            })?,
        };
        Ok(Self {
            device,
            stream: None,
            chunker: None,
        })
    }

    /// Name of the active recording device.
    pub fn device_name(&self) -> String {
        self.device
            .name()
            .unwrap_or_else(|_| "Unknown Device".to_string())
    }
}

impl AudioSource for MicSource {
    fn open(
        &mut self,
        config: &CaptureConfig,
        producer: FrameProducer,
    ) -> Result<(), PipelineError> {
        config.validate()?;
        let format = self
            .device
            .default_input_config()
            .map_err(|err| PipelineError::Device(format!("failed to query input config: {err}")))?
            .sample_format();

        let stream_config = StreamConfig {
            channels: config.channels,
            sample_rate: cpal::SampleRate(config.sample_rate),
            buffer_size: cpal::BufferSize::Fixed(config.frame_size as u32),
        };

        log_debug(&format!(
            "mic open: device={} format={format:?} rate={} channels={} frame_size={}",
            self.device_name(),
            config.sample_rate,
            config.channels,
            config.frame_size
        ));

        let chunker = Arc::new(Mutex::new(FrameChunker::new(
            config.samples_per_frame(),
            producer,
        )));

        let err_fn = |err: cpal::StreamError| {
            log_warn(&format!("capture warning: audio stream reported: {err}"));
        };

        let stream = match format {
            SampleFormat::F32 => {
                let chunker = chunker.clone();
                self.device.build_input_stream(
                    &stream_config,
                    move |data: &[f32], _: &cpal::InputCallbackInfo| {
                        if let Ok(mut chunker) = chunker.lock() {
                            chunker.push_samples(data, |sample| sample);
                        }
                    },
                    err_fn,
                    None,
                )
            }
            SampleFormat::I16 => {
                let chunker = chunker.clone();
                self.device.build_input_stream(
                    &stream_config,
                    move |data: &[i16], _: &cpal::InputCallbackInfo| {
                        if let Ok(mut chunker) = chunker.lock() {
                            chunker.push_samples(data, |sample| sample as f32 / 32_768.0);
                        }
                    },
                    err_fn,
                    None,
                )
            }
            SampleFormat::U16 => {
                let chunker = chunker.clone();
                self.device.build_input_stream(
                    &stream_config,
                    move |data: &[u16], _: &cpal::InputCallbackInfo| {
                        if let Ok(mut chunker) = chunker.lock() {
                            chunker
                                .push_samples(data, |sample| (sample as f32 - 32_768.0) / 32_768.0);
                        }
                    },
                    err_fn,
                    None,
                )
            }
            other => {
                return Err(PipelineError::Device(format!(
                    "unsupported sample format: {other:?}"
                )))
            }
        }
        .map_err(|err| PipelineError::Stream(format!("failed to build input stream: {err}")))?;

        stream
            .play()
            .map_err(|err| PipelineError::Stream(format!("failed to start input stream: {err}")))?;

        self.stream = Some(stream);
        self.chunker = Some(chunker);
        Ok(())
    }

    fn close(&mut self) {
        let Some(stream) = self.stream.take() else {
            return;
        };
        if let Err(err) = stream.pause() {
            log_debug(&format!("failed to pause audio stream: {err}"));
        }
        // Dropping the stream stops callbacks before we touch the chunker, so
        // the final flush cannot race the producer.
        drop(stream);

        if let Some(chunker) = self.chunker.take() {
            if let Ok(mut chunker) = chunker.lock() {
                chunker.flush();
                let rejected = chunker.rejected();
                if rejected > 0 {
                    log_warn(&format!(
                        "capture warning: {rejected} frame(s) could not be enqueued"
                    ));
                }
            }
        }
        log_debug("mic closed");
    }
}

impl Drop for MicSource {
    fn drop(&mut self) {
        self.close();
    }
}
