//! Frame handoff between the audio callback and the capture session.
//!
//! The queue is the only shared mutable state in the pipeline: the driver
//! callback pushes frames, and the session drains them once the recording
//! window has closed. Unbounded so the callback never blocks and no frame
//! produced during the window is dropped.

use crossbeam_channel::{unbounded, Receiver, Sender};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

/// One batch of interleaved samples delivered by a single driver callback.
pub type Frame = Vec<f32>;

/// Session-owned FIFO channel between the producer callback and the consumer.
pub struct FrameQueue {
    tx: Sender<Frame>,
    rx: Receiver<Frame>,
    rejected: Arc<AtomicUsize>,
}

impl FrameQueue {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self {
            tx,
            rx,
            rejected: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Hand out the push side for the audio callback context.
    pub fn producer(&self) -> FrameProducer {
        FrameProducer {
            tx: self.tx.clone(),
            rejected: self.rejected.clone(),
        }
    }

    /// Remove and return every queued frame in production order, leaving the
    /// queue empty. Non-blocking; call only after the producer has stopped.
    pub fn drain(&self) -> Vec<Frame> {
        self.rx.try_iter().collect()
    }
}

impl Default for FrameQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Push handle used from the driver callback. Never blocks; a push after the
/// consumer side is gone is counted instead of raised so the real-time
/// context stays cheap.
#[derive(Clone)]
pub struct FrameProducer {
    tx: Sender<Frame>,
    rejected: Arc<AtomicUsize>,
}

impl FrameProducer {
    pub fn push(&self, frame: Frame) {
        if self.tx.send(frame).is_err() {
            self.rejected.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Number of frames that could not be enqueued. Reported as a capture
    /// warning at close time.
    pub fn rejected(&self) -> usize {
        self.rejected.load(Ordering::Relaxed)
    }
}
