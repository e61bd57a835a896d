//! Temporary WAV artifact bridging capture and the speech model.
//!
//! The capture side hands over an in-memory buffer; the speech model wants a
//! file path. This adapter owns that format choice: mono 16-bit PCM WAV in a
//! private temp directory whose lifetime is tied to the artifact value, so
//! the file outlives every reader and disappears on drop.

use crate::audio::CapturedAudio;
use crate::error::PipelineError;
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub struct WavArtifact {
    path: PathBuf,
    _dir: TempDir,
}

impl WavArtifact {
    /// Write the captured buffer to a fresh temp WAV at its native sample
    /// rate. Any write failure aborts the session; no partial artifact is
    /// handed on.
    pub fn persist(audio: &CapturedAudio) -> Result<Self, PipelineError> {
        let dir = TempDir::new()?;
        let path = dir.path().join("capture.wav");

        let spec = WavSpec {
            channels: 1,
            sample_rate: audio.sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(&path, spec)?;
        for &sample in &audio.samples {
            let quantized = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
            writer.write_sample(quantized)?;
        }
        writer.finalize()?;

        Ok(Self { path, _dir: dir })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Read an artifact back as mono f32 samples plus its sample rate.
///
/// Accepts 16-bit integer (what [`WavArtifact::persist`] writes) and 32-bit
/// float WAVs; multi-channel files are averaged down to mono.
pub fn load_samples(path: &Path) -> Result<(Vec<f32>, u32), PipelineError> {
    let mut reader = WavReader::open(path)?;
    let spec = reader.spec();

    let samples: Vec<f32> = match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Int, 16) => reader
            .samples::<i16>()
            .map(|s| s.map(|sample| sample as f32 / 32_768.0))
            .collect::<Result<Vec<_>, _>>()?,
        (SampleFormat::Float, 32) => reader
            .samples::<f32>()
            .collect::<Result<Vec<_>, _>>()?,
        (format, bits) => {
            return Err(PipelineError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("unsupported WAV encoding: {format:?} at {bits} bits"),
            )))
        }
    };

    let mono = if spec.channels <= 1 {
        samples
    } else {
        samples
            .chunks(usize::from(spec.channels))
            .map(|group| group.iter().sum::<f32>() / group.len() as f32)
            .collect()
    };

    Ok((mono, spec.sample_rate))
}
