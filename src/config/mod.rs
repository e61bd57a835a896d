//! Command-line parsing and validation helpers.

mod defaults;
mod validation;

use crate::audio::{DEFAULT_FRAME_SIZE, DEFAULT_SAMPLE_RATE};
use clap::Parser;

/// CLI options for the voicepilot pipeline. Validated values keep the
/// capture session and downstream requests safe.
#[derive(Debug, Parser, Clone)]
#[command(about = "voicepilot: timed voice capture to structured commands", author, version)]
pub struct AppConfig {
    /// Recording duration in seconds
    #[arg(long, default_value_t = 5)]
    pub seconds: u64,

    /// Capture sample rate (Hz)
    #[arg(long = "sample-rate", default_value_t = DEFAULT_SAMPLE_RATE)]
    pub sample_rate: u32,

    /// Capture channel count
    #[arg(long, default_value_t = 1)]
    pub channels: u16,

    /// Samples per channel per driver frame
    #[arg(long = "frame-size", default_value_t = DEFAULT_FRAME_SIZE)]
    pub frame_size: usize,

    /// Preferred audio input device name
    #[arg(long)]
    pub input_device: Option<String>,

    /// Print detected audio input devices and exit
    #[arg(long = "list-input-devices", default_value_t = false)]
    pub list_input_devices: bool,

    /// Transcription language hint ("auto" enables detection)
    #[arg(long, default_value = "en")]
    pub lang: String,

    /// Whisper model path (ggml format)
    #[arg(long = "whisper-model-path")]
    pub whisper_model_path: Option<String>,

    /// Whisper beam size (>1 enables beam search)
    #[arg(long = "whisper-beam-size", default_value_t = 0)]
    pub whisper_beam_size: u32,

    /// Whisper temperature
    #[arg(long = "whisper-temperature", default_value_t = 0.0)]
    pub whisper_temperature: f32,

    /// Command translator endpoint URL
    #[arg(long = "translator-url", env = "VOICEPILOT_TRANSLATOR_URL")]
    pub translator_url: Option<String>,

    /// Command translator model name
    #[arg(long = "translator-model", default_value = "gpt-4o-mini")]
    pub translator_model: String,

    /// API key for the command translator
    #[arg(long = "translator-key", env = "VOICEPILOT_API_KEY", hide_env_values = true)]
    pub translator_key: Option<String>,

    /// Enable file logging (debug)
    #[arg(long = "logs", env = "VOICEPILOT_LOGS", default_value_t = false)]
    pub logs: bool,

    /// Enable verbose timing logs
    #[arg(long)]
    pub log_timings: bool,
}
