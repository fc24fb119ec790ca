//! Web text-to-speech via a Google-Translate-compatible endpoint.
//!
//! The `translate_tts` endpoint answers a GET request with MP3 bytes but
//! rejects long inputs, so longer texts are split on word boundaries and the
//! returned MP3 segments concatenated (MP3 frames are self-delimiting, so
//! byte concatenation yields a playable stream).
//!
//! # Feature Gate
//!
//! Requires the `online` feature. Without it this module compiles to a stub
//! that errors when used.

use crate::defaults;
use crate::error::{DubashError, Result};
use crate::lang::Language;
use crate::tts::synthesizer::Synthesizer;

#[cfg(feature = "online")]
use std::time::Duration;

/// Synthesizer backed by a web endpoint.
#[cfg(feature = "online")]
#[derive(Debug)]
pub struct WebSynthesizer {
    client: reqwest::blocking::Client,
    endpoint: String,
}

/// Web synthesizer placeholder (without online feature).
#[cfg(not(feature = "online"))]
#[derive(Debug)]
pub struct WebSynthesizer {
    #[allow(dead_code)]
    endpoint: String,
}

#[cfg(feature = "online")]
impl WebSynthesizer {
    /// Create a synthesizer against the given endpoint.
    ///
    /// # Errors
    /// Returns `DubashError::Synthesis` if the HTTP client cannot be built.
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(defaults::HTTP_TIMEOUT_SECS))
            .build()
            .map_err(|e| DubashError::Synthesis {
                message: format!("Failed to build HTTP client: {}", e),
            })?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn fetch_chunk(&self, text: &str, language: Language) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("ie", "UTF-8"),
                ("client", "tw-ob"),
                ("tl", language.as_code()),
                ("q", text),
            ])
            .send()
            .map_err(|e| DubashError::Synthesis {
                message: format!("Request failed: {}", e),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DubashError::Synthesis {
                message: format!("Service returned {} for language {}", status, language),
            });
        }

        let bytes = response.bytes().map_err(|e| DubashError::Synthesis {
            message: format!("Failed to read response body: {}", e),
        })?;
        Ok(bytes.to_vec())
    }
}

#[cfg(not(feature = "online"))]
impl WebSynthesizer {
    /// Create a synthesizer against the given endpoint (stub implementation).
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        Ok(Self {
            endpoint: endpoint.into(),
        })
    }
}

impl Default for WebSynthesizer {
    fn default() -> Self {
        // The builder only fails on TLS misconfiguration; defaults are sound.
        match Self::new(defaults::TTS_ENDPOINT) {
            Ok(synthesizer) => synthesizer,
            Err(_) => unreachable!("default HTTP client configuration is valid"),
        }
    }
}

#[cfg(feature = "online")]
impl Synthesizer for WebSynthesizer {
    fn synthesize(&self, text: &str, language: Language) -> Result<Vec<u8>> {
        let text = text.trim();
        if text.is_empty() {
            return Err(DubashError::Synthesis {
                message: "nothing to synthesize".to_string(),
            });
        }

        let mut audio = Vec::new();
        for chunk in split_text(text, defaults::TTS_CHUNK_CHARS) {
            audio.extend(self.fetch_chunk(&chunk, language)?);
        }

        if audio.is_empty() {
            return Err(DubashError::Synthesis {
                message: "Service returned no audio".to_string(),
            });
        }
        Ok(audio)
    }
}

#[cfg(not(feature = "online"))]
impl Synthesizer for WebSynthesizer {
    fn synthesize(&self, _text: &str, _language: Language) -> Result<Vec<u8>> {
        Err(DubashError::Synthesis {
            message: "Online feature not enabled. This binary was built without web synthesis.\n\
                To fix: cargo build --release (online is enabled by default)"
                .to_string(),
        })
    }
}

/// Split text into chunks of at most `max_chars` characters, breaking on
/// whitespace where possible. A single overlong word becomes its own chunk.
#[cfg_attr(not(feature = "online"), allow(dead_code))]
fn split_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_chars = 0;

    for word in text.split_whitespace() {
        let word_chars = word.chars().count();
        if current_chars > 0 && current_chars + 1 + word_chars > max_chars {
            chunks.push(std::mem::take(&mut current));
            current_chars = 0;
        }
        if current_chars > 0 {
            current.push(' ');
            current_chars += 1;
        }
        current.push_str(word);
        current_chars += word_chars;
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_text_short_input_single_chunk() {
        let chunks = split_text("hello world", 200);
        assert_eq!(chunks, vec!["hello world"]);
    }

    #[test]
    fn test_split_text_breaks_on_word_boundaries() {
        let chunks = split_text("one two three four", 9);
        assert_eq!(chunks, vec!["one two", "three", "four"]);
    }

    #[test]
    fn test_split_text_overlong_word_is_own_chunk() {
        let chunks = split_text("a veryveryverylongword b", 10);
        assert_eq!(chunks, vec!["a", "veryveryverylongword", "b"]);
    }

    #[test]
    fn test_split_text_counts_chars_not_bytes() {
        // Devanagari text: multi-byte characters must not split mid-char.
        let text = "नमस्ते दुनिया";
        let chunks = split_text(text, 7);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks.join(" "), text);
    }

    #[test]
    fn test_split_text_empty_input() {
        assert!(split_text("", 10).is_empty());
        assert!(split_text("   ", 10).is_empty());
    }

    #[test]
    fn test_split_text_rejoins_to_original_words() {
        let text = "the quick brown fox jumps over the lazy dog";
        let chunks = split_text(text, 12);
        assert_eq!(chunks.join(" "), text);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 12);
        }
    }

    #[test]
    fn test_default_uses_configured_endpoint() {
        let synthesizer = WebSynthesizer::default();
        #[cfg(feature = "online")]
        assert_eq!(synthesizer.endpoint(), defaults::TTS_ENDPOINT);
        #[cfg(not(feature = "online"))]
        let _ = synthesizer;
    }
}
