use super::defaults::{
    ISO_639_1_CODES, MAX_BEAM_SIZE, MAX_CHANNELS, MAX_FRAME_SIZE, MAX_RECORD_SECONDS,
    MAX_SAMPLE_RATE, MIN_FRAME_SIZE, MIN_RECORD_SECONDS, MIN_SAMPLE_RATE,
};
use super::AppConfig;
use crate::audio::CaptureConfig;
use crate::pipeline::PipelineConfig;
use crate::stt::DecodeOptions;
use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use std::path::Path;

impl AppConfig {
    /// Parse CLI arguments and validate them right away.
    pub fn parse_args() -> Result<Self> {
        let mut config = Self::parse();
        config.validate()?;
        Ok(config)
    }

    /// Check CLI values and normalize paths.
    pub fn validate(&mut self) -> Result<()> {
        if !(MIN_RECORD_SECONDS..=MAX_RECORD_SECONDS).contains(&self.seconds) {
            bail!(
                "--seconds must be between {MIN_RECORD_SECONDS} and {MAX_RECORD_SECONDS}, got {}",
                self.seconds
            );
        }
        if !(MIN_SAMPLE_RATE..=MAX_SAMPLE_RATE).contains(&self.sample_rate) {
            bail!(
                "--sample-rate must be between {MIN_SAMPLE_RATE} and {MAX_SAMPLE_RATE} Hz, got {}",
                self.sample_rate
            );
        }
        if self.channels == 0 || self.channels > MAX_CHANNELS {
            bail!(
                "--channels must be between 1 and {MAX_CHANNELS}, got {}",
                self.channels
            );
        }
        if !(MIN_FRAME_SIZE..=MAX_FRAME_SIZE).contains(&self.frame_size) {
            bail!(
                "--frame-size must be between {MIN_FRAME_SIZE} and {MAX_FRAME_SIZE} samples, got {}",
                self.frame_size
            );
        }
        if self.whisper_beam_size > MAX_BEAM_SIZE {
            bail!(
                "--whisper-beam-size must be between 0 and {MAX_BEAM_SIZE}, got {}",
                self.whisper_beam_size
            );
        }
        if !(0.0..=5.0).contains(&self.whisper_temperature) {
            bail!(
                "--whisper-temperature must be between 0.0 and 5.0, got {}",
                self.whisper_temperature
            );
        }

        if self.lang.trim().is_empty() {
            bail!("--lang must not be empty");
        }
        if !self.lang.eq_ignore_ascii_case("auto") {
            if !self
                .lang
                .chars()
                .all(|ch| ch.is_ascii_alphabetic() || ch == '-' || ch == '_')
            {
                bail!("--lang must contain only alphabetic characters or '-'/'_' separators");
            }
            // Allow locale-style values but only check the leading ISO-639-1 code.
            let lang_primary = self
                .lang
                .split(['-', '_'])
                .next()
                .unwrap_or("")
                .to_ascii_lowercase();
            if !ISO_639_1_CODES.contains(&lang_primary.as_str()) {
                bail!(
                    "--lang must start with a valid ISO-639-1 code or be 'auto', got '{}'",
                    self.lang
                );
            }
        }

        // Device listing does not touch the model or the translator.
        if self.list_input_devices {
            return Ok(());
        }

        let Some(model) = &self.whisper_model_path else {
            bail!("--whisper-model-path is required");
        };
        let model_path = Path::new(model);
        if !model_path.exists() {
            bail!("whisper model path '{}' does not exist", model_path.display());
        }
        // Store a canonical absolute path.
        let canonical = model_path
            .canonicalize()
            .with_context(|| format!("failed to canonicalize whisper model path '{model}'"))?;
        self.whisper_model_path = Some(
            canonical
                .to_str()
                .map(|s| s.to_string())
                .ok_or_else(|| anyhow!("whisper model path must be valid UTF-8"))?,
        );

        match &self.translator_url {
            None => bail!("--translator-url is required"),
            Some(url) if !(url.starts_with("http://") || url.starts_with("https://")) => {
                bail!("--translator-url must be an http(s) URL, got '{url}'")
            }
            Some(_) => {}
        }
        match &self.translator_key {
            None => bail!("--translator-key is required"),
            Some(key) if key.trim().is_empty() => bail!("--translator-key must not be empty"),
            Some(_) => {}
        }

        Ok(())
    }

    /// Snapshot the capture window settings for the audio session.
    pub fn capture_config(&self) -> CaptureConfig {
        CaptureConfig {
            duration_ms: self.seconds * 1_000,
            sample_rate: self.sample_rate,
            channels: self.channels,
            frame_size: self.frame_size,
        }
    }

    /// Snapshot the full pipeline settings for downstream consumers.
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            capture: self.capture_config(),
            language: self.lang.clone(),
            log_timings: self.log_timings,
        }
    }

    /// Whisper decoding knobs taken from the CLI.
    pub fn decode_options(&self) -> DecodeOptions {
        DecodeOptions {
            beam_size: self.whisper_beam_size,
            temperature: self.whisper_temperature,
        }
    }
}
