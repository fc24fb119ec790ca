//! Error types for dubash.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DubashError {
    // Configuration errors
    #[error("Configuration file not found at {path}")]
    ConfigFileNotFound { path: String },

    #[error("Invalid configuration value for {key}: {message}")]
    ConfigInvalidValue { key: String, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    // Audio capture errors
    #[error("Audio device not found: {device}")]
    AudioDeviceNotFound { device: String },

    #[error("Audio format mismatch: expected {expected}, got {actual}")]
    AudioFormatMismatch { expected: String, actual: String },

    #[error("Audio capture failed: {message}")]
    AudioCapture { message: String },

    // Transcription errors
    #[error("Transcription model not found at {path}")]
    TranscriptionModelNotFound { path: String },

    #[error("Transcription failed: {message}")]
    Transcription { message: String },

    // Target language selection errors
    #[error("Target language matches the detected source language: {code}")]
    SameLanguage { code: String },

    #[error("Unsupported target language: {code}")]
    UnsupportedLanguage { code: String },

    // Translation errors
    #[error("Translation failed: {message}")]
    Translation { message: String },

    // Speech synthesis errors
    #[error("Speech synthesis failed: {message}")]
    Synthesis { message: String },

    // Temporary artifact errors
    #[error("Artifact storage failed: {message}")]
    Artifact { message: String },

    // Playback errors
    #[error("Audio player not found: {tool}")]
    PlayerNotFound { tool: String },

    #[error("Playback failed: {message}")]
    Playback { message: String },

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Generic error for cases not covered above
    #[error("{0}")]
    Other(String),
}

impl DubashError {
    /// Whether this error is an invalid target-language selection.
    ///
    /// Groups the two rejection reasons of the validation policy so callers
    /// can distinguish selection mistakes from external service failures.
    pub fn is_invalid_selection(&self) -> bool {
        matches!(
            self,
            DubashError::SameLanguage { .. } | DubashError::UnsupportedLanguage { .. }
        )
    }
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, DubashError>;
