//! Capture session: a bounded append-only frame queue.
//!
//! The session is the only component that accumulates data before a run
//! starts. Audio frames are delivered by an external mechanism (the cpal
//! callback, a test harness) through a [`FrameFeeder`]; the caller decides
//! when the recording is complete and finalizes the session into an
//! [`Utterance`]. The queue is bounded: frames arriving when it is full are
//! dropped and counted rather than blocking the delivery thread.

use crate::defaults;
use crate::error::{DubashError, Result};
use crate::pipeline::types::Utterance;
use crossbeam_channel::{Receiver, Sender, TrySendError, bounded};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Accumulates audio frames for one recording, finalized by the caller.
pub struct CaptureSession {
    receiver: Receiver<Vec<i16>>,
    feeder: FrameFeeder,
    sample_rate: u32,
}

impl CaptureSession {
    /// Create a session with the given sample rate and frame capacity.
    pub fn new(sample_rate: u32, frame_capacity: usize) -> Self {
        let (sender, receiver) = bounded(frame_capacity);
        Self {
            receiver,
            feeder: FrameFeeder {
                sender,
                dropped: Arc::new(AtomicUsize::new(0)),
            },
            sample_rate,
        }
    }

    /// Handle for the frame-delivery side (cloneable, Send).
    pub fn feeder(&self) -> FrameFeeder {
        self.feeder.clone()
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Frames dropped because the queue was full.
    pub fn dropped_frames(&self) -> usize {
        self.feeder.dropped.load(Ordering::SeqCst)
    }

    /// End the recording and concatenate the queued frames into an utterance.
    ///
    /// This is the caller-driven "recording complete" signal; the session
    /// never decides on its own that capture has ended.
    ///
    /// # Errors
    /// Returns `AudioCapture` if no frames were delivered.
    pub fn finalize(self) -> Result<Utterance> {
        // Close this session's delivery handle so the drain below sees
        // everything that was queued before finalize.
        drop(self.feeder);

        let mut samples = Vec::new();
        while let Ok(frame) = self.receiver.try_recv() {
            samples.extend_from_slice(&frame);
        }

        if samples.is_empty() {
            return Err(DubashError::AudioCapture {
                message: "no audio frames captured".to_string(),
            });
        }

        Ok(Utterance::mono(samples, self.sample_rate))
    }
}

impl Default for CaptureSession {
    fn default() -> Self {
        Self::new(defaults::CAPTURE_SAMPLE_RATE, defaults::FRAME_CAPACITY)
    }
}

/// Frame-delivery handle for a [`CaptureSession`].
///
/// Safe to use from an audio callback: pushing never blocks.
#[derive(Debug, Clone)]
pub struct FrameFeeder {
    sender: Sender<Vec<i16>>,
    dropped: Arc<AtomicUsize>,
}

impl FrameFeeder {
    /// Append a frame to the session's queue.
    ///
    /// Returns false if the frame was dropped (queue full or session
    /// already finalized). Empty frames are ignored.
    pub fn push(&self, frame: &[i16]) -> bool {
        if frame.is_empty() {
            return true;
        }
        match self.sender.try_send(frame.to_vec()) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                self.dropped.fetch_add(1, Ordering::SeqCst);
                false
            }
            Err(TrySendError::Disconnected(_)) => false,
        }
    }
}
