//! Error taxonomy for the capture and transcription pipeline.
//!
//! Capture warnings (driver overruns, failed enqueues) are not part of this
//! enum: they are logged and capture continues. Remote translator failures
//! stay `anyhow::Error` since the translator is an external collaborator.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    /// Invalid duration, sample rate, channel count, or frame size. Raised
    /// before any device is opened.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The audio input device could not be found or queried.
    #[error("audio device error: {0}")]
    Device(String),

    /// The input stream could not be built or started.
    #[error("audio stream error: {0}")]
    Stream(String),

    /// The recording window elapsed without a single frame arriving.
    #[error("no audio captured during the recording window")]
    EmptyCapture,

    /// Writing or reading the temporary audio artifact failed.
    #[error("audio artifact I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The speech model is missing, unloadable, or failed to run.
    #[error("speech model unavailable: {0}")]
    ModelUnavailable(String),
}

impl From<hound::Error> for PipelineError {
    fn from(err: hound::Error) -> Self {
        match err {
            hound::Error::IoError(io) => PipelineError::Io(io),
            other => PipelineError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                other,
            )),
        }
    }
}
