//! Web translation via a Google-Translate-compatible endpoint.
//!
//! Uses the unofficial `translate_a/single` gtx API: a GET request carrying
//! the source/target codes and the text, answered with a nested JSON array
//! whose first element lists the translated segments.
//!
//! # Feature Gate
//!
//! Requires the `online` feature. Without it this module compiles to a stub
//! that errors when used.

use crate::defaults;
use crate::error::{DubashError, Result};
use crate::lang::{DetectedLanguage, Language};
use crate::translate::translator::Translator;

#[cfg(feature = "online")]
use std::time::Duration;

/// Translator backed by a web endpoint.
#[cfg(feature = "online")]
#[derive(Debug)]
pub struct WebTranslator {
    client: reqwest::blocking::Client,
    endpoint: String,
}

/// Web translator placeholder (without online feature).
#[cfg(not(feature = "online"))]
#[derive(Debug)]
pub struct WebTranslator {
    #[allow(dead_code)]
    endpoint: String,
}

#[cfg(feature = "online")]
impl WebTranslator {
    /// Create a translator against the given endpoint.
    ///
    /// # Errors
    /// Returns `DubashError::Translation` if the HTTP client cannot be built.
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(defaults::HTTP_TIMEOUT_SECS))
            .build()
            .map_err(|e| DubashError::Translation {
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
}

#[cfg(not(feature = "online"))]
impl WebTranslator {
    /// Create a translator against the given endpoint (stub implementation).
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        Ok(Self {
            endpoint: endpoint.into(),
        })
    }
}

impl Default for WebTranslator {
    fn default() -> Self {
        // The builder only fails on TLS misconfiguration; defaults are sound.
        match Self::new(defaults::TRANSLATE_ENDPOINT) {
            Ok(translator) => translator,
            Err(_) => unreachable!("default HTTP client configuration is valid"),
        }
    }
}

#[cfg(feature = "online")]
impl Translator for WebTranslator {
    fn translate(&self, text: &str, source: &DetectedLanguage, target: Language) -> Result<String> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("client", "gtx"),
                ("sl", source.code()),
                ("tl", target.as_code()),
                ("dt", "t"),
                ("ie", "UTF-8"),
                ("oe", "UTF-8"),
                ("q", text),
            ])
            .send()
            .map_err(|e| DubashError::Translation {
                message: format!("Request failed: {}", e),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DubashError::Translation {
                message: format!("Service returned {}", status),
            });
        }

        let body: serde_json::Value = response.json().map_err(|e| DubashError::Translation {
            message: format!("Invalid response body: {}", e),
        })?;

        extract_translation(&body)
    }
}

#[cfg(not(feature = "online"))]
impl Translator for WebTranslator {
    fn translate(
        &self,
        _text: &str,
        _source: &DetectedLanguage,
        _target: Language,
    ) -> Result<String> {
        Err(DubashError::Translation {
            message: "Online feature not enabled. This binary was built without web translation.\n\
                To fix: cargo build --release (online is enabled by default)"
                .to_string(),
        })
    }
}

/// Concatenate the translated segments out of the gtx response array.
///
/// Response shape: `[[["segment", "original", ...], ...], ...]`.
#[cfg_attr(not(feature = "online"), allow(dead_code))]
fn extract_translation(body: &serde_json::Value) -> Result<String> {
    let segments = body
        .get(0)
        .and_then(|v| v.as_array())
        .ok_or_else(|| DubashError::Translation {
            message: "Unexpected response shape".to_string(),
        })?;

    let mut translated = String::new();
    for segment in segments {
        if let Some(text) = segment.get(0).and_then(|v| v.as_str()) {
            translated.push_str(text);
        }
    }

    if translated.is_empty() {
        return Err(DubashError::Translation {
            message: "Service returned no translation".to_string(),
        });
    }
    Ok(translated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_translation_single_segment() {
        let body = json!([[["नमस्ते", "hello", null, null]], null, "en"]);
        assert_eq!(extract_translation(&body).unwrap(), "नमस्ते");
    }

    #[test]
    fn test_extract_translation_concatenates_segments() {
        let body = json!([
            [
                ["First sentence. ", "Erste Satz. ", null],
                ["Second sentence.", "Zweiter Satz.", null]
            ],
            null,
            "de"
        ]);
        assert_eq!(
            extract_translation(&body).unwrap(),
            "First sentence. Second sentence."
        );
    }

    #[test]
    fn test_extract_translation_rejects_wrong_shape() {
        let body = json!({"error": "bad request"});
        assert!(matches!(
            extract_translation(&body),
            Err(DubashError::Translation { .. })
        ));
    }

    #[test]
    fn test_extract_translation_rejects_empty_segments() {
        let body = json!([[], null, "en"]);
        assert!(extract_translation(&body).is_err());
    }

    #[test]
    fn test_extract_translation_skips_non_string_heads() {
        let body = json!([[[null, "x"], ["ok", "y"]], null, "en"]);
        assert_eq!(extract_translation(&body).unwrap(), "ok");
    }

    #[test]
    fn test_default_uses_configured_endpoint() {
        let translator = WebTranslator::default();
        #[cfg(feature = "online")]
        assert_eq!(translator.endpoint(), defaults::TRANSLATE_ENDPOINT);
        #[cfg(not(feature = "online"))]
        let _ = translator;
    }
}
