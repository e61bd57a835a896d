//! Whisper speech-to-text integration.
//!
//! Wraps `whisper_rs` behind the [`SpeechToText`] seam. The model is loaded
//! once per process and shared by every capture session; loading is the
//! expensive part, transcription reuses the context.

use crate::artifact;
use crate::error::PipelineError;
use crate::logging::log_debug;
use regex::Regex;
use std::os::raw::{c_char, c_uint, c_void};
use std::path::Path;
use std::sync::{Mutex, Once, OnceLock};
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

/// Transcribes an encoded audio artifact into plain text. Atomic from the
/// caller's perspective: full text or an error, never partial output.
pub trait SpeechToText {
    fn transcribe(&self, artifact_path: &Path, language: &str) -> Result<String, PipelineError>;
}

/// Decoding knobs forwarded to whisper. Beam size zero or one selects greedy
/// sampling.
#[derive(Debug, Clone, Copy)]
pub struct DecodeOptions {
    pub beam_size: u32,
    pub temperature: f32,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            beam_size: 0,
            temperature: 0.0,
        }
    }
}

/// Whisper model context. Create once at startup and reuse for all
/// transcription requests to avoid repeated model loading.
pub struct WhisperTranscriber {
    ctx: WhisperContext,
    options: DecodeOptions,
}

impl WhisperTranscriber {
    /// Load a GGML model from disk. A missing or unreadable model is
    /// [`PipelineError::ModelUnavailable`]; it is never retried.
    pub fn new(model_path: &str, options: DecodeOptions) -> Result<Self, PipelineError> {
        install_whisper_log_silencer();
        let ctx = WhisperContext::new_with_params(model_path, WhisperContextParameters::default())
            .map_err(|err| {
                PipelineError::ModelUnavailable(format!(
                    "failed to load whisper model '{model_path}': {err}"
                ))
            })?;
        Ok(Self { ctx, options })
    }
}

impl SpeechToText for WhisperTranscriber {
    fn transcribe(&self, artifact_path: &Path, language: &str) -> Result<String, PipelineError> {
        let (samples, sample_rate) = artifact::load_samples(artifact_path)?;
        log_debug(&format!(
            "transcribe: {} samples at {} Hz, lang={language}",
            samples.len(),
            sample_rate
        ));

        let mut state = self.ctx.create_state().map_err(|err| {
            PipelineError::ModelUnavailable(format!("failed to create whisper state: {err}"))
        })?;

        let mut params = if self.options.beam_size > 1 {
            FullParams::new(SamplingStrategy::BeamSearch {
                beam_size: self.options.beam_size as i32,
                patience: -1.0,
            })
        } else {
            FullParams::new(SamplingStrategy::Greedy { best_of: 1 })
        };
        if language.eq_ignore_ascii_case("auto") {
            params.set_language(None);
            params.set_detect_language(true);
        } else {
            params.set_language(Some(language));
            params.set_detect_language(false);
        }
        params.set_temperature(self.options.temperature);
        // Cap threads so laptops don't max out all cores.
        params.set_n_threads(num_cpus::get().min(8) as i32);
        params.set_print_progress(false);
        params.set_print_timestamps(false);
        params.set_print_special(false);
        params.set_print_realtime(false);
        params.set_translate(false);
        params.set_token_timestamps(false);

        state.full(params, &samples).map_err(|err| {
            PipelineError::ModelUnavailable(format!("whisper inference failed: {err}"))
        })?;

        let mut transcript = String::new();
        let num_segments = state.full_n_segments();
        if num_segments < 0 {
            log_debug("whisper returned a negative segment count");
            return Ok(transcript);
        }
        // Whisper splits output into small segments; stitch them together.
        for i in 0..num_segments {
            let Some(segment) = state.get_segment(i) else {
                log_debug(&format!("failed to read whisper segment {i}"));
                continue;
            };
            match segment.to_str_lossy() {
                Ok(text) => transcript.push_str(&text),
                Err(err) => log_debug(&format!("failed to read whisper segment {i}: {err}")),
            }
        }

        Ok(sanitize_transcript(&transcript))
    }
}

/// Strip non-speech markers whisper emits for silence, noise, and music, and
/// collapse the remaining whitespace.
pub fn sanitize_transcript(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    static NON_SPEECH_RE: OnceLock<Regex> = OnceLock::new();
    let re = NON_SPEECH_RE.get_or_init(|| {
        Regex::new(
            r"(?i)\[\s*\]|\(\s*\)|\[(?:\s*(?:silence|noise|inaudible|blank_audio|blank audio|music|laughter|applause|cough|breath(?:ing)?|wind|background)\s*)\]|\((?:\s*(?:silence|noise|inaudible|blank audio|music|laughter|applause|cough|breath(?:ing)?|wind|background)\s*)\)",
        )
        .expect("non-speech regex should compile")
    });
    let without_markers = re.replace_all(trimmed, " ");
    without_markers
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

static MODEL: OnceLock<Mutex<WhisperTranscriber>> = OnceLock::new();

/// Load the process-wide model handle. Safe to call more than once; only the
/// first successful load sticks.
pub fn init_model(model_path: &str, options: DecodeOptions) -> Result<(), PipelineError> {
    if MODEL.get().is_some() {
        return Ok(());
    }
    let transcriber = WhisperTranscriber::new(model_path, options)?;
    let _ = MODEL.set(Mutex::new(transcriber));
    Ok(())
}

/// Shared reference to the process-wide model. Fails if [`init_model`] has
/// not completed successfully.
pub fn model() -> Result<&'static Mutex<WhisperTranscriber>, PipelineError> {
    MODEL.get().ok_or_else(|| {
        PipelineError::ModelUnavailable("speech model has not been initialized".to_string())
    })
}

fn install_whisper_log_silencer() {
    static INSTALL_LOG_CALLBACK: Once = Once::new();
    INSTALL_LOG_CALLBACK.call_once(|| unsafe {
        whisper_rs::set_log_callback(Some(whisper_log_callback), std::ptr::null_mut());
    });
}

unsafe extern "C" fn whisper_log_callback(
    _level: c_uint,
    _text: *const c_char,
    _user_data: *mut c_void,
) {
    // Silence the default whisper.cpp logger; its init chatter belongs in
    // our own log, not on the user's terminal.
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transcriber_rejects_missing_model() {
        let result = WhisperTranscriber::new("/no/such/model.bin", DecodeOptions::default());
        assert!(matches!(result, Err(PipelineError::ModelUnavailable(_))));
    }

    #[test]
    fn sanitize_strips_non_speech_markers() {
        assert_eq!(
            sanitize_transcript(" [BLANK_AUDIO] turn  left "),
            "turn left"
        );
        assert_eq!(sanitize_transcript("(noise) go to base (cough)"), "go to base");
        assert_eq!(sanitize_transcript("   "), "");
    }

    #[test]
    fn model_handle_requires_initialization() {
        // The global may have been initialized by another test binary run,
        // but in this test process nothing loads a real model.
        if MODEL.get().is_none() {
            assert!(matches!(
                model(),
                Err(PipelineError::ModelUnavailable(_))
            ));
        }
    }
}
