//! Data types for one pipeline run.
//!
//! Every entity here is scoped to a single run: created by one stage,
//! consumed by the next, and gone when the run ends.

use crate::artifact::AudioArtifact;
use crate::error::{DubashError, Result};
use crate::lang::{DetectedLanguage, Language};
use std::fmt;
use std::path::Path;

/// One bounded audio payload submitted for processing.
///
/// Mono 16-bit PCM. Owned by the run that processes it and consumed by the
/// transcription stage.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    /// PCM samples (16-bit signed integers).
    pub samples: Vec<i16>,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Channel count. Always 1 after normalization.
    pub channels: u16,
}

impl Utterance {
    /// Create a mono utterance from raw samples.
    pub fn mono(samples: Vec<i16>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
            channels: 1,
        }
    }

    /// Duration of the utterance in seconds.
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Whether the utterance carries no audio at all.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Text plus detected source language from a transcription step.
///
/// Produced once per run, immutable thereafter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    pub text: String,
    pub detected: DetectedLanguage,
}

impl Transcript {
    pub fn new(text: impl Into<String>, detected: DetectedLanguage) -> Self {
        Self {
            text: text.into(),
            detected,
        }
    }
}

/// Text rendered from the source language into the target language.
///
/// Invariant: `source.code() != target.as_code()`, enforced by validation
/// before the translator runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub text: String,
    pub source: DetectedLanguage,
    pub target: Language,
}

/// Terminal entity of a successful run: encoded speech in the target language.
#[derive(Debug)]
pub struct SynthesizedAudio {
    /// Encoded audio (MP3 from the web synthesizer, format per synthesizer).
    pub bytes: Vec<u8>,
    /// Language the speech was synthesized in.
    pub language: Language,
    /// Temp artifact holding the bytes for playback; released when this
    /// value is dropped or persisted via [`SynthesizedAudio::save`].
    pub artifact: Option<AudioArtifact>,
}

impl SynthesizedAudio {
    /// Path of the on-disk artifact, if one was spilled.
    pub fn artifact_path(&self) -> Option<&Path> {
        self.artifact.as_ref().map(|a| a.path())
    }

    /// Persist the audio to a caller-chosen path, ending the artifact's
    /// lifecycle.
    pub fn save(mut self, dest: &Path) -> Result<()> {
        match self.artifact.take() {
            Some(artifact) => artifact.keep(dest),
            None => std::fs::write(dest, &self.bytes).map_err(DubashError::Io),
        }
    }
}

/// The pipeline stage a failure is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Transcribe,
    Validate,
    Translate,
    Synthesize,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Transcribe => "transcription",
            Stage::Validate => "validation",
            Stage::Translate => "translation",
            Stage::Synthesize => "synthesis",
        };
        write!(f, "{}", name)
    }
}

/// Terminal status of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Done,
    Failed,
}

/// Caller-facing result of one complete run.
///
/// Carries whatever entities the run produced before it ended; on failure
/// the stage and error say where and why it stopped.
#[derive(Debug)]
pub struct RunReport {
    pub status: RunStatus,
    pub transcript: Option<Transcript>,
    pub translation: Option<Translation>,
    pub audio: Option<SynthesizedAudio>,
    pub stage: Option<Stage>,
    pub error: Option<DubashError>,
}

impl RunReport {
    /// Build a successful report from the run's three entities.
    pub fn done(transcript: Transcript, translation: Translation, audio: SynthesizedAudio) -> Self {
        Self {
            status: RunStatus::Done,
            transcript: Some(transcript),
            translation: Some(translation),
            audio: Some(audio),
            stage: None,
            error: None,
        }
    }

    /// Build a failed report tagged with the stage that stopped the run.
    pub fn failed(stage: Stage, error: DubashError) -> Self {
        Self {
            status: RunStatus::Failed,
            transcript: None,
            translation: None,
            audio: None,
            stage: Some(stage),
            error: Some(error),
        }
    }

    /// Attach the transcript produced before the failure.
    pub fn with_transcript(mut self, transcript: Transcript) -> Self {
        self.transcript = Some(transcript);
        self
    }

    /// Attach the translation produced before the failure.
    pub fn with_translation(mut self, translation: Translation) -> Self {
        self.translation = Some(translation);
        self
    }

    pub fn is_done(&self) -> bool {
        self.status == RunStatus::Done
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utterance_mono() {
        let utterance = Utterance::mono(vec![1, 2, 3], 48_000);
        assert_eq!(utterance.channels, 1);
        assert_eq!(utterance.sample_rate, 48_000);
        assert_eq!(utterance.samples, vec![1, 2, 3]);
        assert!(!utterance.is_empty());
    }

    #[test]
    fn test_utterance_duration() {
        let utterance = Utterance::mono(vec![0i16; 48_000], 48_000);
        assert!((utterance.duration_secs() - 1.0).abs() < f64::EPSILON);

        let empty = Utterance::mono(vec![], 48_000);
        assert_eq!(empty.duration_secs(), 0.0);
        assert!(empty.is_empty());
    }

    #[test]
    fn test_utterance_duration_zero_rate() {
        let utterance = Utterance {
            samples: vec![0i16; 100],
            sample_rate: 0,
            channels: 1,
        };
        assert_eq!(utterance.duration_secs(), 0.0);
    }

    #[test]
    fn test_transcript_new() {
        let transcript = Transcript::new("hello", DetectedLanguage::from_code("en"));
        assert_eq!(transcript.text, "hello");
        assert_eq!(transcript.detected.code(), "en");
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(Stage::Transcribe.to_string(), "transcription");
        assert_eq!(Stage::Validate.to_string(), "validation");
        assert_eq!(Stage::Translate.to_string(), "translation");
        assert_eq!(Stage::Synthesize.to_string(), "synthesis");
    }

    #[test]
    fn test_report_done() {
        let transcript = Transcript::new("hello", DetectedLanguage::from_code("en"));
        let translation = Translation {
            text: "नमस्ते".to_string(),
            source: DetectedLanguage::from_code("en"),
            target: Language::Hi,
        };
        let audio = SynthesizedAudio {
            bytes: vec![1, 2, 3],
            language: Language::Hi,
            artifact: None,
        };

        let report = RunReport::done(transcript, translation, audio);
        assert!(report.is_done());
        assert_eq!(report.status, RunStatus::Done);
        assert!(report.transcript.is_some());
        assert!(report.translation.is_some());
        assert!(report.audio.is_some());
        assert!(report.stage.is_none());
        assert!(report.error.is_none());
    }

    #[test]
    fn test_report_failed_carries_stage_and_error() {
        let report = RunReport::failed(
            Stage::Translate,
            DubashError::Translation {
                message: "service error".to_string(),
            },
        );
        assert!(!report.is_done());
        assert_eq!(report.stage, Some(Stage::Translate));
        assert!(report.error.is_some());
        assert!(report.transcript.is_none());
        assert!(report.audio.is_none());
    }

    #[test]
    fn test_report_failed_with_partial_entities() {
        let transcript = Transcript::new("hello", DetectedLanguage::from_code("en"));
        let report = RunReport::failed(
            Stage::Validate,
            DubashError::SameLanguage {
                code: "en".to_string(),
            },
        )
        .with_transcript(transcript);

        assert_eq!(report.status, RunStatus::Failed);
        assert!(report.transcript.is_some());
        assert!(report.translation.is_none());
    }

    #[test]
    fn test_synthesized_audio_save_without_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.mp3");
        let audio = SynthesizedAudio {
            bytes: vec![9, 8, 7],
            language: Language::Kn,
            artifact: None,
        };

        audio.save(&dest).unwrap();
        assert_eq!(std::fs::read(&dest).unwrap(), vec![9, 8, 7]);
    }

    #[test]
    fn test_synthesized_audio_save_with_artifact() {
        let scope = crate::artifact::ArtifactScope::new();
        let stats = scope.stats();
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.mp3");

        let artifact = scope.create_with(".mp3", b"speech").unwrap();
        let audio = SynthesizedAudio {
            bytes: b"speech".to_vec(),
            language: Language::Hi,
            artifact: Some(artifact),
        };
        assert!(audio.artifact_path().is_some());

        audio.save(&dest).unwrap();
        assert_eq!(std::fs::read(&dest).unwrap(), b"speech");
        assert!(stats.is_balanced());
    }
}
