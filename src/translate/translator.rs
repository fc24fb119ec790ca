use crate::error::{DubashError, Result};
use crate::lang::{DetectedLanguage, Language};
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Trait for text translation between languages.
///
/// This trait allows swapping implementations (web service vs mock).
/// Both language codes are assumed valid and distinct — validated upstream
/// by the pipeline before the translator is invoked.
pub trait Translator: Send + Sync {
    /// Translate text from the detected source language to the target.
    ///
    /// # Arguments
    /// * `text` - Source text to translate
    /// * `source` - Detected source language (may be outside the supported set)
    /// * `target` - Target language from the supported set
    ///
    /// # Returns
    /// Translated text, or an error
    fn translate(&self, text: &str, source: &DetectedLanguage, target: Language) -> Result<String>;
}

/// Implement Translator for Arc<T> to allow sharing across runs.
impl<T: Translator> Translator for Arc<T> {
    fn translate(&self, text: &str, source: &DetectedLanguage, target: Language) -> Result<String> {
        (**self).translate(text, source, target)
    }
}

/// One recorded mock invocation: (text, source code, target code).
pub type TranslateCall = (String, String, String);

/// Mock translator for testing
#[derive(Debug, Clone)]
pub struct MockTranslator {
    response: Option<String>,
    should_fail: bool,
    error_message: String,
    calls: Arc<AtomicUsize>,
    invocations: Arc<Mutex<Vec<TranslateCall>>>,
}

impl MockTranslator {
    /// Create a new mock translator with default settings
    pub fn new() -> Self {
        Self {
            response: None,
            should_fail: false,
            error_message: "mock translation failure".to_string(),
            calls: Arc::new(AtomicUsize::new(0)),
            invocations: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Configure the mock to return a specific translation
    pub fn with_response(mut self, response: &str) -> Self {
        self.response = Some(response.to_string());
        self
    }

    /// Configure the mock to fail on translate
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }

    /// Configure the error message for failures
    pub fn with_error_message(mut self, message: &str) -> Self {
        self.error_message = message.to_string();
        self
    }

    /// Shared counter of translate invocations
    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }

    /// Number of times translate was invoked
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Recorded invocations as (text, source code, target code) tuples
    pub fn invocations(&self) -> Vec<TranslateCall> {
        self.invocations
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    /// Shared handle to the recorded invocations
    pub fn invocation_log(&self) -> Arc<Mutex<Vec<TranslateCall>>> {
        Arc::clone(&self.invocations)
    }
}

impl Default for MockTranslator {
    fn default() -> Self {
        Self::new()
    }
}

impl Translator for MockTranslator {
    fn translate(&self, text: &str, source: &DetectedLanguage, target: Language) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut log) = self.invocations.lock() {
            log.push((
                text.to_string(),
                source.code().to_string(),
                target.as_code().to_string(),
            ));
        }
        if self.should_fail {
            return Err(DubashError::Translation {
                message: self.error_message.clone(),
            });
        }
        Ok(self
            .response
            .clone()
            .unwrap_or_else(|| format!("{} [{}]", text, target.as_code())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_translator_returns_configured_response() {
        let translator = MockTranslator::new().with_response("नमस्ते");
        let source = DetectedLanguage::from_code("en");

        let result = translator.translate("hello", &source, Language::Hi).unwrap();

        assert_eq!(result, "नमस्ते");
    }

    #[test]
    fn test_mock_translator_default_response_tags_target() {
        let translator = MockTranslator::new();
        let source = DetectedLanguage::from_code("en");

        let result = translator.translate("hello", &source, Language::Kn).unwrap();

        assert_eq!(result, "hello [kn]");
    }

    #[test]
    fn test_mock_translator_returns_error_when_configured() {
        let translator = MockTranslator::new().with_failure();
        let source = DetectedLanguage::from_code("en");

        let result = translator.translate("hello", &source, Language::Hi);

        match result {
            Err(DubashError::Translation { message }) => {
                assert_eq!(message, "mock translation failure");
            }
            _ => panic!("Expected Translation error"),
        }
    }

    #[test]
    fn test_mock_translator_custom_error_message() {
        let translator = MockTranslator::new()
            .with_failure()
            .with_error_message("unsupported pair");
        let source = DetectedLanguage::from_code("en");

        match translator.translate("hello", &source, Language::Hi) {
            Err(DubashError::Translation { message }) => {
                assert_eq!(message, "unsupported pair");
            }
            _ => panic!("Expected Translation error"),
        }
    }

    #[test]
    fn test_mock_translator_records_invocations() {
        let translator = MockTranslator::new().with_response("ಹಲೋ");
        let source = DetectedLanguage::from_code("en");

        translator.translate("hello", &source, Language::Kn).unwrap();

        let calls = translator.invocations();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0],
            (
                "hello".to_string(),
                "en".to_string(),
                "kn".to_string()
            )
        );
    }

    #[test]
    fn test_mock_translator_records_out_of_set_source() {
        let translator = MockTranslator::new();
        let source = DetectedLanguage::from_code("fr");

        translator.translate("bonjour", &source, Language::En).unwrap();

        let calls = translator.invocations();
        assert_eq!(calls[0].1, "fr");
        assert_eq!(calls[0].2, "en");
    }

    #[test]
    fn test_mock_translator_counts_calls_including_failures() {
        let translator = MockTranslator::new().with_failure();
        let counter = translator.call_counter();
        let source = DetectedLanguage::from_code("en");

        let _ = translator.translate("one", &source, Language::Hi);
        let _ = translator.translate("two", &source, Language::Hi);

        assert_eq!(counter.load(Ordering::SeqCst), 2);
        assert_eq!(translator.call_count(), 2);
    }

    #[test]
    fn test_translator_trait_is_object_safe() {
        let translator: Box<dyn Translator> = Box::new(MockTranslator::new().with_response("ok"));
        let source = DetectedLanguage::from_code("hi");

        let result = translator.translate("text", &source, Language::En).unwrap();
        assert_eq!(result, "ok");
    }

    #[test]
    fn test_translator_arc_impl_shares_log() {
        let inner = MockTranslator::new();
        let log = inner.invocation_log();
        let shared = Arc::new(inner);
        let source = DetectedLanguage::from_code("en");

        shared.translate("a", &source, Language::Hi).unwrap();
        Arc::clone(&shared)
            .translate("b", &source, Language::Kn)
            .unwrap();

        assert_eq!(log.lock().unwrap().len(), 2);
    }
}
