use super::queue::FrameProducer;

/// Average interleaved multi-channel samples down to one channel. A trailing
/// partial group (fewer samples than channels) is averaged over what is
/// there rather than dropped.
pub(crate) fn downmix_to_mono(samples: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return samples.to_vec();
    }

    let mut mono = Vec::with_capacity(samples.len() / channels + 1);
    let mut acc = 0.0f32;
    let mut count = 0usize;
    for &sample in samples {
        acc += sample;
        count += 1;
        if count == channels {
            mono.push(acc / channels as f32);
            acc = 0.0;
            count = 0;
        }
    }
    if count > 0 {
        mono.push(acc / count as f32);
    }
    mono
}

/// Regroups driver callback buffers into frames of a fixed sample count and
/// pushes them to the session queue. Runs inside the audio callback, so it
/// does nothing beyond format conversion, slicing, and the push itself.
pub(super) struct FrameChunker {
    samples_per_frame: usize,
    pending: Vec<f32>,
    producer: FrameProducer,
}

impl FrameChunker {
    pub(super) fn new(samples_per_frame: usize, producer: FrameProducer) -> Self {
        let samples_per_frame = samples_per_frame.max(1);
        Self {
            samples_per_frame,
            pending: Vec::with_capacity(samples_per_frame),
            producer,
        }
    }

    /// Convert the callback's samples to `f32`, append them, and emit every
    /// complete frame that results.
    pub(super) fn push_samples<T, F>(&mut self, data: &[T], mut convert: F)
    where
        T: Copy,
        F: FnMut(T) -> f32,
    {
        self.pending.extend(data.iter().copied().map(&mut convert));
        while self.pending.len() >= self.samples_per_frame {
            let frame: Vec<f32> = self.pending.drain(..self.samples_per_frame).collect();
            self.producer.push(frame);
        }
    }

    /// Emit whatever is left as a final short frame, as-is. Called once after
    /// the stream has stopped, so no further callbacks race this.
    pub(super) fn flush(&mut self) {
        if !self.pending.is_empty() {
            let remainder = std::mem::take(&mut self.pending);
            self.producer.push(remainder);
        }
    }

    pub(super) fn rejected(&self) -> usize {
        self.producer.rejected()
    }
}
