//! Microphone capture pipeline.
//!
//! Audio flows from the CPAL callback through a session-owned frame queue
//! into one contiguous mono buffer: source → queue → session. The callback
//! context only converts and pushes; everything else happens sequentially on
//! the caller's thread after the window closes.

/// Default capture sample rate, matching what Whisper expects.
pub const DEFAULT_SAMPLE_RATE: u32 = 16_000;

/// Default samples per driver frame.
pub const DEFAULT_FRAME_SIZE: usize = 1024;

mod dispatch;
mod queue;
mod session;
mod source;

pub use queue::{Frame, FrameProducer, FrameQueue};
pub use session::{capture, CaptureConfig, CapturedAudio};
pub use source::{AudioSource, MicSource};
