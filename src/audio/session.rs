//! Timed capture session: open the source, wait out the window, drain, and
//! concatenate.
//!
//! The session owns its queue, so concurrent sessions never share state. The
//! calling thread blocks for the whole window; there is no early exit on
//! silence and no cancellation.

use super::dispatch::downmix_to_mono;
use super::queue::FrameQueue;
use super::source::AudioSource;
use crate::error::PipelineError;
use crate::logging::log_debug;
use std::thread;
use std::time::Duration;

/// Capture window parameters. `frame_size` is samples per channel per frame.
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    pub duration_ms: u64,
    pub sample_rate: u32,
    pub channels: u16,
    pub frame_size: usize,
}

impl CaptureConfig {
    /// Reject impossible windows before any device is touched.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.duration_ms == 0 {
            return Err(PipelineError::Config(
                "capture duration must be greater than zero".to_string(),
            ));
        }
        if self.sample_rate == 0 {
            return Err(PipelineError::Config(
                "sample rate must be greater than zero".to_string(),
            ));
        }
        if self.channels == 0 {
            return Err(PipelineError::Config(
                "channel count must be greater than zero".to_string(),
            ));
        }
        if self.frame_size == 0 {
            return Err(PipelineError::Config(
                "frame size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    /// Interleaved sample count per frame.
    pub fn samples_per_frame(&self) -> usize {
        self.frame_size * usize::from(self.channels)
    }
}

/// Mono PCM assembled from every frame the window produced, in capture order.
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedAudio {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl CapturedAudio {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_secs(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.sample_rate as f32
    }
}

/// Closes the source when dropped, so the device is released exactly once on
/// every exit path after a successful open.
struct OpenSource<'a> {
    source: &'a mut dyn AudioSource,
}

impl Drop for OpenSource<'_> {
    fn drop(&mut self) {
        self.source.close();
    }
}

/// Record for the configured window and return the concatenated audio.
///
/// Frames that arrive while the stream is open are never dropped or
/// reordered; everything pushed before the source closes is visible to the
/// drain. Zero drained frames is [`PipelineError::EmptyCapture`].
pub fn capture(
    source: &mut dyn AudioSource,
    config: &CaptureConfig,
) -> Result<CapturedAudio, PipelineError> {
    config.validate()?;

    let queue = FrameQueue::new();
    source.open(config, queue.producer())?;
    {
        let _open = OpenSource { source };
        thread::sleep(config.duration());
        // _open drops here: the device closes before we drain, which is the
        // happens-before edge that makes every pushed frame visible below.
    }

    let frames = queue.drain();
    if frames.is_empty() {
        return Err(PipelineError::EmptyCapture);
    }

    let total: usize = frames.iter().map(Vec::len).sum();
    let mut interleaved = Vec::with_capacity(total);
    for frame in frames {
        interleaved.extend(frame);
    }
    let samples = downmix_to_mono(&interleaved, usize::from(config.channels));

    let captured = CapturedAudio {
        samples,
        sample_rate: config.sample_rate,
    };
    log_debug(&format!(
        "capture complete: {} samples ({:.2}s at {} Hz)",
        captured.len(),
        captured.duration_secs(),
        captured.sample_rate
    ));
    Ok(captured)
}
