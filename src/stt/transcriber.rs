use crate::error::{DubashError, Result};
use crate::lang::DetectedLanguage;
use crate::pipeline::types::Transcript;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Trait for speech-to-text transcription with language detection.
///
/// This trait allows swapping implementations (real Whisper vs mock).
/// Implementations consume a WAV file on disk, matching the temporary
/// artifact the pipeline serializes each utterance into.
pub trait Transcriber: Send + Sync {
    /// Transcribe the audio in a WAV file and detect the spoken language.
    ///
    /// # Arguments
    /// * `audio` - Path to a WAV file (any rate/channels the implementation accepts)
    ///
    /// # Returns
    /// Transcript with text and detected language, or an error
    fn transcribe(&self, audio: &Path) -> Result<Transcript>;

    /// Get the name of the loaded model
    fn model_name(&self) -> &str;

    /// Check if the transcriber is ready
    fn is_ready(&self) -> bool;
}

/// Implement Transcriber for Arc<T> to allow sharing across runs.
impl<T: Transcriber> Transcriber for Arc<T> {
    fn transcribe(&self, audio: &Path) -> Result<Transcript> {
        (**self).transcribe(audio)
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }

    fn is_ready(&self) -> bool {
        (**self).is_ready()
    }
}

/// Mock transcriber for testing
#[derive(Debug, Clone)]
pub struct MockTranscriber {
    model_name: String,
    text: String,
    language: String,
    should_fail: bool,
    error_message: String,
    calls: Arc<AtomicUsize>,
}

impl MockTranscriber {
    /// Create a new mock transcriber with default settings
    pub fn new(model_name: &str) -> Self {
        Self {
            model_name: model_name.to_string(),
            text: "mock transcription".to_string(),
            language: "en".to_string(),
            should_fail: false,
            error_message: "mock transcription failure".to_string(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Configure the mock to return a specific transcript
    pub fn with_transcript(mut self, text: &str, language: &str) -> Self {
        self.text = text.to_string();
        self.language = language.to_string();
        self
    }

    /// Configure the mock to fail on transcribe
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }

    /// Configure the error message for failures
    pub fn with_error_message(mut self, message: &str) -> Self {
        self.error_message = message.to_string();
        self
    }

    /// Shared counter of transcribe invocations
    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }

    /// Number of times transcribe was invoked
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Transcriber for MockTranscriber {
    fn transcribe(&self, audio: &Path) -> Result<Transcript> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.should_fail {
            return Err(DubashError::Transcription {
                message: self.error_message.clone(),
            });
        }
        if !audio.exists() {
            return Err(DubashError::Transcription {
                message: format!("audio file missing: {}", audio.display()),
            });
        }
        Ok(Transcript::new(
            self.text.clone(),
            DetectedLanguage::from_code(&self.language),
        ))
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn is_ready(&self) -> bool {
        !self.should_fail
    }
}
