//! Pipeline controller: drives one run from an utterance to synthesized speech.
//!
//! The controller owns nothing but the injected capabilities and an artifact
//! scope; every run gets its own state machine, advanced strictly along the
//! legal-transition table. External calls are blocking, synchronous, and
//! single-attempt — a failed stage halts the run at the first error and the
//! caller decides whether to retry with a fresh run.

use crate::artifact::{ArtifactScope, ArtifactStats};
use crate::audio::wav;
use crate::error::Result;
use crate::lang::{self, DetectedLanguage, Language};
use crate::pipeline::state::{RunState, advance};
use crate::pipeline::types::{
    RunReport, Stage, SynthesizedAudio, Transcript, Translation, Utterance,
};
use crate::stt::transcriber::Transcriber;
use crate::translate::translator::Translator;
use crate::tts::synthesizer::Synthesizer;
use std::sync::Arc;

/// Orchestrates transcribe → validate → translate → synthesize for one run.
///
/// Capabilities are injected at construction so tests can substitute
/// deterministic stand-ins for the external services.
pub struct PipelineController<T, R, S> {
    transcriber: T,
    translator: R,
    synthesizer: S,
    supported: Vec<Language>,
    artifacts: ArtifactScope,
}

impl<T, R, S> PipelineController<T, R, S>
where
    T: Transcriber,
    R: Translator,
    S: Synthesizer,
{
    /// Create a controller over the full supported-language set.
    pub fn new(transcriber: T, translator: R, synthesizer: S) -> Self {
        Self {
            transcriber,
            translator,
            synthesizer,
            supported: lang::SUPPORTED.to_vec(),
            artifacts: ArtifactScope::new(),
        }
    }

    /// Override the supported-language set.
    pub fn with_supported_languages(mut self, supported: Vec<Language>) -> Self {
        self.supported = supported;
        self
    }

    /// Languages this controller accepts as targets.
    pub fn supported_languages(&self) -> &[Language] {
        &self.supported
    }

    /// Acquire/release counters for the temp artifacts of this controller's runs.
    pub fn artifact_stats(&self) -> Arc<ArtifactStats> {
        self.artifacts.stats()
    }

    /// Submit an utterance, running the transcription stage.
    ///
    /// Serializes the utterance into a scoped temp WAV, invokes the
    /// transcriber exactly once with its path, and releases the artifact on
    /// every exit path. On success the run is awaiting a target selection;
    /// on failure the stage-tagged error is returned and the run is over.
    pub fn submit_utterance(&self, utterance: Utterance) -> Result<RunHandle<'_, T, R, S>> {
        let mut state = RunState::Idle;
        advance(&mut state, RunState::Transcribing);

        let artifact = match self.artifacts.create(".wav") {
            Ok(artifact) => artifact,
            Err(e) => {
                advance(&mut state, RunState::Failed);
                return Err(e);
            }
        };

        let outcome = wav::write_file(artifact.path(), &utterance)
            .and_then(|()| self.transcriber.transcribe(artifact.path()));
        let released = artifact.release();

        let transcript = match outcome {
            Ok(transcript) => transcript,
            Err(e) => {
                advance(&mut state, RunState::Failed);
                return Err(e);
            }
        };
        if let Err(e) = released {
            advance(&mut state, RunState::Failed);
            return Err(e);
        }

        advance(&mut state, RunState::AwaitingTargetSelection);
        Ok(RunHandle {
            controller: self,
            state,
            transcript,
        })
    }

    /// One-shot convenience: submit and immediately select a target.
    ///
    /// Used when the target is known up front (file upload with `--target`).
    /// Transcription failures fold into a `Failed` report instead of an `Err`.
    pub fn run_to_completion(&self, utterance: Utterance, requested: &str) -> RunReport {
        match self.submit_utterance(utterance) {
            Ok(run) => run.select_target(requested),
            Err(e) => RunReport::failed(Stage::Transcribe, e),
        }
    }
}

/// A run paused between transcription and target selection.
///
/// Exposes the detected language and the candidate targets; consumed by
/// [`RunHandle::select_target`], which drives the run to its terminal state.
pub struct RunHandle<'c, T, R, S> {
    controller: &'c PipelineController<T, R, S>,
    state: RunState,
    transcript: Transcript,
}

impl<'c, T, R, S> RunHandle<'c, T, R, S>
where
    T: Transcriber,
    R: Translator,
    S: Synthesizer,
{
    /// Current state of the run.
    pub fn state(&self) -> RunState {
        self.state
    }

    /// The transcript produced by the transcription stage.
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// The language detected in the utterance.
    pub fn detected_language(&self) -> &DetectedLanguage {
        &self.transcript.detected
    }

    /// Candidate targets: every supported language except the detected one.
    pub fn candidate_targets(&self) -> Vec<Language> {
        self.controller
            .supported
            .iter()
            .copied()
            .filter(|language| language.as_code() != self.transcript.detected.code())
            .collect()
    }

    /// Validate the requested target and drive the run to completion.
    ///
    /// An invalid selection short-circuits to `Failed` without touching the
    /// translator or synthesizer. Each later stage gets exactly one attempt.
    pub fn select_target(mut self, requested: &str) -> RunReport {
        advance(&mut self.state, RunState::Validating);
        let target = match lang::validate_target(
            &self.transcript.detected,
            requested,
            &self.controller.supported,
        ) {
            Ok(target) => target,
            Err(e) => {
                advance(&mut self.state, RunState::Failed);
                return RunReport::failed(Stage::Validate, e).with_transcript(self.transcript);
            }
        };

        advance(&mut self.state, RunState::Translating);
        let translated = match self.controller.translator.translate(
            &self.transcript.text,
            &self.transcript.detected,
            target,
        ) {
            Ok(text) => text,
            Err(e) => {
                advance(&mut self.state, RunState::Failed);
                return RunReport::failed(Stage::Translate, e).with_transcript(self.transcript);
            }
        };
        let translation = Translation {
            text: translated,
            source: self.transcript.detected.clone(),
            target,
        };

        advance(&mut self.state, RunState::Synthesizing);
        let bytes = match self
            .controller
            .synthesizer
            .synthesize(&translation.text, target)
        {
            Ok(bytes) => bytes,
            Err(e) => {
                advance(&mut self.state, RunState::Failed);
                return RunReport::failed(Stage::Synthesize, e)
                    .with_transcript(self.transcript)
                    .with_translation(translation);
            }
        };
        let artifact = match self.controller.artifacts.create_with(".mp3", &bytes) {
            Ok(artifact) => artifact,
            Err(e) => {
                advance(&mut self.state, RunState::Failed);
                return RunReport::failed(Stage::Synthesize, e)
                    .with_transcript(self.transcript)
                    .with_translation(translation);
            }
        };

        advance(&mut self.state, RunState::Done);
        RunReport::done(
            self.transcript,
            translation,
            SynthesizedAudio {
                bytes,
                language: target,
                artifact: Some(artifact),
            },
        )
    }
}
