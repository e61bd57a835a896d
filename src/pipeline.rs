//! One full pass: capture a timed window, transcribe it, translate the text
//! into a structured command.
//!
//! Each stage runs sequentially on the calling thread after the device is
//! closed. The artifact stays alive until transcription finishes, so the
//! speech model never reads a deleted file.

use crate::artifact::WavArtifact;
use crate::audio::{self, AudioSource, CaptureConfig};
use crate::logging::log_debug;
use crate::stt::SpeechToText;
use crate::translator::CommandTranslator;
use anyhow::{bail, Result};
use std::time::Instant;

/// Settings for a single pipeline pass, snapshotted from the CLI config.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub capture: CaptureConfig,
    /// Language hint for the speech model; "auto" enables detection.
    pub language: String,
    pub log_timings: bool,
}

/// Record once, transcribe once, translate once. Returns the structured
/// command text exactly as the translator produced it.
pub fn run_once(
    source: &mut dyn AudioSource,
    config: &PipelineConfig,
    model: &dyn SpeechToText,
    translator: &dyn CommandTranslator,
) -> Result<String> {
    let record_start = Instant::now();
    let captured = audio::capture(source, &config.capture)?;
    let record_elapsed = record_start.elapsed().as_secs_f64();

    let stt_start = Instant::now();
    let artifact = WavArtifact::persist(&captured)?;
    let transcript = model.transcribe(artifact.path(), &config.language)?;
    let stt_elapsed = stt_start.elapsed().as_secs_f64();

    if config.log_timings {
        log_debug(&format!(
            "timing|phase=pipeline|record_s={record_elapsed:.3}|stt_s={stt_elapsed:.3}|chars={}",
            transcript.len()
        ));
    }

    if transcript.is_empty() {
        bail!("no speech recognized in the capture window");
    }

    // The transcript goes to the translator unchanged.
    translator.translate(&transcript)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::FrameProducer;
    use crate::error::PipelineError;
    use anyhow::anyhow;
    use std::cell::{Cell, RefCell};
    use std::path::Path;

    /// Pushes a fixed set of frames as soon as the session opens it.
    struct ScriptedSource {
        frames: Vec<Vec<f32>>,
        opens: Cell<usize>,
        closes: Cell<usize>,
    }

    impl ScriptedSource {
        fn new(frames: Vec<Vec<f32>>) -> Self {
            Self {
                frames,
                opens: Cell::new(0),
                closes: Cell::new(0),
            }
        }
    }

    impl AudioSource for ScriptedSource {
        fn open(
            &mut self,
            _config: &CaptureConfig,
            producer: FrameProducer,
        ) -> std::result::Result<(), PipelineError> {
            self.opens.set(self.opens.get() + 1);
            for frame in &self.frames {
                producer.push(frame.clone());
            }
            Ok(())
        }

        fn close(&mut self) {
            self.closes.set(self.closes.get() + 1);
        }
    }

    struct FixedTranscriber {
        transcript: String,
        calls: Cell<usize>,
        seen_artifact: Cell<bool>,
    }

    impl FixedTranscriber {
        fn new(transcript: &str) -> Self {
            Self {
                transcript: transcript.to_string(),
                calls: Cell::new(0),
                seen_artifact: Cell::new(false),
            }
        }
    }

    impl SpeechToText for FixedTranscriber {
        fn transcribe(
            &self,
            artifact_path: &Path,
            _language: &str,
        ) -> std::result::Result<String, PipelineError> {
            self.calls.set(self.calls.get() + 1);
            self.seen_artifact.set(artifact_path.exists());
            Ok(self.transcript.clone())
        }
    }

    struct FailingTranscriber;

    impl SpeechToText for FailingTranscriber {
        fn transcribe(
            &self,
            _artifact_path: &Path,
            _language: &str,
        ) -> std::result::Result<String, PipelineError> {
            Err(PipelineError::ModelUnavailable("model gone".to_string()))
        }
    }

    struct RecordingTranslator {
        inputs: RefCell<Vec<String>>,
        response: String,
    }

    impl RecordingTranslator {
        fn new(response: &str) -> Self {
            Self {
                inputs: RefCell::new(Vec::new()),
                response: response.to_string(),
            }
        }
    }

    impl CommandTranslator for RecordingTranslator {
        fn translate(&self, transcript: &str) -> Result<String> {
            self.inputs.borrow_mut().push(transcript.to_string());
            Ok(self.response.clone())
        }
    }

    struct FailingTranslator;

    impl CommandTranslator for FailingTranslator {
        fn translate(&self, _transcript: &str) -> Result<String> {
            Err(anyhow!("remote translator unreachable"))
        }
    }

    fn test_config() -> PipelineConfig {
        PipelineConfig {
            capture: CaptureConfig {
                duration_ms: 1,
                sample_rate: 16_000,
                channels: 1,
                frame_size: 4,
            },
            language: "en".to_string(),
            log_timings: false,
        }
    }

    #[test]
    fn happy_path_runs_each_stage_once_and_passes_text_through() {
        let mut source = ScriptedSource::new(vec![vec![0.1; 160], vec![0.2; 160]]);
        let transcriber = FixedTranscriber::new("move to dock");
        let translator = RecordingTranslator::new(r#"{"command":"move","target":[3,4]}"#);

        let command = run_once(&mut source, &test_config(), &transcriber, &translator)
            .expect("pipeline should succeed");

        assert_eq!(command, r#"{"command":"move","target":[3,4]}"#);
        assert_eq!(transcriber.calls.get(), 1);
        assert!(transcriber.seen_artifact.get(), "artifact must exist during transcription");
        assert_eq!(translator.inputs.borrow().as_slice(), ["move to dock"]);
        assert_eq!(source.closes.get(), 1);
    }

    #[test]
    fn empty_capture_skips_transcription_and_translation() {
        let mut source = ScriptedSource::new(Vec::new());
        let transcriber = FixedTranscriber::new("never used");
        let translator = RecordingTranslator::new("never used");

        let err = run_once(&mut source, &test_config(), &transcriber, &translator)
            .expect_err("empty capture should fail");

        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::EmptyCapture)
        ));
        assert_eq!(transcriber.calls.get(), 0);
        assert!(translator.inputs.borrow().is_empty());
        assert_eq!(source.closes.get(), 1);
    }

    #[test]
    fn transcription_failure_aborts_before_translation() {
        let mut source = ScriptedSource::new(vec![vec![0.1; 64]]);
        let translator = RecordingTranslator::new("never used");

        let err = run_once(&mut source, &test_config(), &FailingTranscriber, &translator)
            .expect_err("model failure should propagate");

        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::ModelUnavailable(_))
        ));
        assert!(translator.inputs.borrow().is_empty());
        assert_eq!(source.closes.get(), 1);
    }

    #[test]
    fn empty_transcript_never_reaches_translator() {
        let mut source = ScriptedSource::new(vec![vec![0.0; 64]]);
        let transcriber = FixedTranscriber::new("");
        let translator = RecordingTranslator::new("never used");

        let err = run_once(&mut source, &test_config(), &transcriber, &translator)
            .expect_err("empty transcript should fail");

        assert!(err.to_string().contains("no speech recognized"));
        assert_eq!(transcriber.calls.get(), 1);
        assert!(translator.inputs.borrow().is_empty());
    }

    #[test]
    fn translator_errors_propagate_opaquely() {
        let mut source = ScriptedSource::new(vec![vec![0.3; 64]]);
        let transcriber = FixedTranscriber::new("spin around");

        let err = run_once(&mut source, &test_config(), &transcriber, &FailingTranslator)
            .expect_err("translator failure should propagate");

        assert!(err.to_string().contains("remote translator unreachable"));
        assert_eq!(source.closes.get(), 1);
    }
}
