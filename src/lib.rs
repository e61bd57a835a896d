//! Voice-command pipeline: timed microphone capture, offline Whisper
//! transcription, and remote translation of the transcript into a
//! structured command.

pub mod artifact;
pub mod audio;
pub mod config;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod stt;
pub mod translator;

pub use error::PipelineError;
pub use logging::{init_logging, log_debug, log_file_path, log_warn};
