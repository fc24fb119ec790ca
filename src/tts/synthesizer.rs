use crate::error::{DubashError, Result};
use crate::lang::Language;
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Trait for speech synthesis.
///
/// This trait allows swapping implementations (web service vs mock).
/// Returns encoded audio bytes; the pipeline spills them to a temporary
/// artifact when file-like access is needed for playback.
pub trait Synthesizer: Send + Sync {
    /// Synthesize speech for the given text in the given language.
    ///
    /// # Arguments
    /// * `text` - Text to speak
    /// * `language` - Target language (a voice must exist for it)
    ///
    /// # Returns
    /// Encoded audio bytes, or an error
    fn synthesize(&self, text: &str, language: Language) -> Result<Vec<u8>>;
}

/// Implement Synthesizer for Arc<T> to allow sharing across runs.
impl<T: Synthesizer> Synthesizer for Arc<T> {
    fn synthesize(&self, text: &str, language: Language) -> Result<Vec<u8>> {
        (**self).synthesize(text, language)
    }
}

/// One recorded mock invocation: (text, language code).
pub type SynthesizeCall = (String, String);

/// Mock synthesizer for testing
#[derive(Debug, Clone)]
pub struct MockSynthesizer {
    bytes: Vec<u8>,
    should_fail: bool,
    error_message: String,
    calls: Arc<AtomicUsize>,
    invocations: Arc<Mutex<Vec<SynthesizeCall>>>,
}

impl MockSynthesizer {
    /// Create a new mock synthesizer with default settings
    pub fn new() -> Self {
        Self {
            bytes: vec![0u8; 16],
            should_fail: false,
            error_message: "mock synthesis failure".to_string(),
            calls: Arc::new(AtomicUsize::new(0)),
            invocations: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Configure the mock to return specific audio bytes
    pub fn with_bytes(mut self, bytes: Vec<u8>) -> Self {
        self.bytes = bytes;
        self
    }

    /// Configure the mock to fail on synthesize
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }

    /// Configure the error message for failures
    pub fn with_error_message(mut self, message: &str) -> Self {
        self.error_message = message.to_string();
        self
    }

    /// Shared counter of synthesize invocations
    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }

    /// Number of times synthesize was invoked
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Recorded invocations as (text, language code) tuples
    pub fn invocations(&self) -> Vec<SynthesizeCall> {
        self.invocations
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

impl Default for MockSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Synthesizer for MockSynthesizer {
    fn synthesize(&self, text: &str, language: Language) -> Result<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut log) = self.invocations.lock() {
            log.push((text.to_string(), language.as_code().to_string()));
        }
        if self.should_fail {
            return Err(DubashError::Synthesis {
                message: self.error_message.clone(),
            });
        }
        Ok(self.bytes.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_synthesizer_returns_configured_bytes() {
        let synthesizer = MockSynthesizer::new().with_bytes(vec![1, 2, 3]);

        let bytes = synthesizer.synthesize("hello", Language::Hi).unwrap();

        assert_eq!(bytes, vec![1, 2, 3]);
    }

    #[test]
    fn test_mock_synthesizer_default_bytes_nonempty() {
        let synthesizer = MockSynthesizer::new();
        let bytes = synthesizer.synthesize("hello", Language::En).unwrap();
        assert!(!bytes.is_empty());
    }

    #[test]
    fn test_mock_synthesizer_returns_error_when_configured() {
        let synthesizer = MockSynthesizer::new().with_failure();

        match synthesizer.synthesize("hello", Language::Kn) {
            Err(DubashError::Synthesis { message }) => {
                assert_eq!(message, "mock synthesis failure");
            }
            _ => panic!("Expected Synthesis error"),
        }
    }

    #[test]
    fn test_mock_synthesizer_custom_error_message() {
        let synthesizer = MockSynthesizer::new()
            .with_failure()
            .with_error_message("no voice for language");

        match synthesizer.synthesize("hello", Language::Kn) {
            Err(DubashError::Synthesis { message }) => {
                assert_eq!(message, "no voice for language");
            }
            _ => panic!("Expected Synthesis error"),
        }
    }

    #[test]
    fn test_mock_synthesizer_records_invocations() {
        let synthesizer = MockSynthesizer::new();

        synthesizer.synthesize("नमस्ते", Language::Hi).unwrap();

        let calls = synthesizer.invocations();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0], ("नमस्ते".to_string(), "hi".to_string()));
    }

    #[test]
    fn test_mock_synthesizer_counts_calls_including_failures() {
        let synthesizer = MockSynthesizer::new().with_failure();
        let counter = synthesizer.call_counter();

        let _ = synthesizer.synthesize("a", Language::En);
        let _ = synthesizer.synthesize("b", Language::En);

        assert_eq!(counter.load(Ordering::SeqCst), 2);
        assert_eq!(synthesizer.call_count(), 2);
    }

    #[test]
    fn test_synthesizer_trait_is_object_safe() {
        let synthesizer: Box<dyn Synthesizer> =
            Box::new(MockSynthesizer::new().with_bytes(vec![7]));

        let bytes = synthesizer.synthesize("text", Language::En).unwrap();
        assert_eq!(bytes, vec![7]);
    }

    #[test]
    fn test_synthesizer_arc_impl() {
        let shared = Arc::new(MockSynthesizer::new().with_bytes(vec![9]));
        let bytes = shared.synthesize("text", Language::Hi).unwrap();
        assert_eq!(bytes, vec![9]);
        assert_eq!(shared.call_count(), 1);
    }
}
