//! Supported languages and the target-selection validation policy.
//!
//! The language set is closed: a target must be one of the three supported
//! codes. Detected source languages may fall outside the set (the transcriber
//! reports whatever it heard); those are carried as opaque codes and can still
//! act as a translation source, but never as a target.

use crate::error::{DubashError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A language the system can translate into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Hi,
    Kn,
}

/// The closed set of supported target languages.
pub const SUPPORTED: [Language; 3] = [Language::En, Language::Hi, Language::Kn];

impl Language {
    /// ISO 639-1 code for this language.
    pub fn as_code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Hi => "hi",
            Language::Kn => "kn",
        }
    }

    /// Human-readable name for display.
    pub fn display_name(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Hi => "Hindi",
            Language::Kn => "Kannada",
        }
    }

    /// Parse a language code, returning None for codes outside the set.
    pub fn parse(code: &str) -> Option<Language> {
        match code.trim().to_ascii_lowercase().as_str() {
            "en" => Some(Language::En),
            "hi" => Some(Language::Hi),
            "kn" => Some(Language::Kn),
            _ => None,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_code())
    }
}

impl FromStr for Language {
    type Err = DubashError;

    fn from_str(s: &str) -> Result<Self> {
        Language::parse(s).ok_or_else(|| DubashError::UnsupportedLanguage {
            code: s.trim().to_ascii_lowercase(),
        })
    }
}

/// The language a transcriber detected in an utterance.
///
/// Transcribers report whatever language they heard; codes outside the
/// supported set are kept as opaque strings with the raw code doubling as
/// the display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetectedLanguage {
    Supported(Language),
    Other(String),
}

impl DetectedLanguage {
    /// Map a raw transcriber code onto the supported set where possible.
    pub fn from_code(code: &str) -> Self {
        let normalized = code.trim().to_ascii_lowercase();
        match Language::parse(&normalized) {
            Some(lang) => DetectedLanguage::Supported(lang),
            None => DetectedLanguage::Other(normalized),
        }
    }

    /// The language code as reported by the transcriber.
    pub fn code(&self) -> &str {
        match self {
            DetectedLanguage::Supported(lang) => lang.as_code(),
            DetectedLanguage::Other(code) => code,
        }
    }

    /// Display name, falling back to the raw code for out-of-set languages.
    pub fn display_name(&self) -> &str {
        match self {
            DetectedLanguage::Supported(lang) => lang.display_name(),
            DetectedLanguage::Other(code) => code,
        }
    }

    /// Whether the detected language is in the supported set.
    pub fn is_supported(&self) -> bool {
        matches!(self, DetectedLanguage::Supported(_))
    }
}

impl fmt::Display for DetectedLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Candidate target languages for a run: every supported language except the
/// detected source.
pub fn candidate_targets(detected: &DetectedLanguage) -> Vec<Language> {
    SUPPORTED
        .iter()
        .copied()
        .filter(|lang| lang.as_code() != detected.code())
        .collect()
}

/// Validate a requested target language against the detected source.
///
/// Rejects a target that equals the detected source (checked first, on the
/// raw codes, so it holds regardless of the supported set) or that is not a
/// member of `supported`. Pure and idempotent: a valid target is returned
/// unchanged.
pub fn validate_target(
    detected: &DetectedLanguage,
    requested: &str,
    supported: &[Language],
) -> Result<Language> {
    let code = requested.trim().to_ascii_lowercase();
    if code == detected.code() {
        return Err(DubashError::SameLanguage { code });
    }
    match Language::parse(&code) {
        Some(lang) if supported.contains(&lang) => Ok(lang),
        _ => Err(DubashError::UnsupportedLanguage { code }),
    }
}
