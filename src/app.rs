//! Voice translation application entry point.
//!
//! Orchestrates the complete voice-to-voice flow:
//! record/load → transcribe → select target → translate → synthesize → play/save

use crate::audio::wav;
use crate::config::Config;
use crate::error::{DubashError, Result};
use crate::lang::Language;
use crate::pipeline::controller::PipelineController;
use crate::pipeline::types::{RunStatus, Utterance};
use crate::playback::{AudioPlayer, SystemCommandExecutor};
use crate::stt::whisper::{WhisperConfig, WhisperTranscriber};
use crate::translate::web::WebTranslator;
use crate::tts::web::WebSynthesizer;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Run the translate command: acquire audio → transcribe → translate → synthesize.
///
/// # Arguments
/// * `config` - Base configuration (can be overridden by CLI args)
/// * `input` - Optional WAV file; microphone mode when None
/// * `target` - Optional preselected target language; prompts when None
/// * `device` - Optional capture device override from CLI
/// * `model` - Optional model path override from CLI
/// * `play` - Play the synthesized audio on completion
/// * `output` - Optional path to save the synthesized audio to
/// * `limit_secs` - Recording time limit for microphone mode
/// * `quiet` - Suppress status messages
/// * `verbosity` - Verbosity level
///
/// # Returns
/// Ok(()) when the run reaches Done, or the stage-tagged error otherwise
#[allow(clippy::too_many_arguments)]
pub fn run_translate_command(
    mut config: Config,
    input: Option<PathBuf>,
    target: Option<String>,
    device: Option<String>,
    model: Option<PathBuf>,
    play: bool,
    output: Option<PathBuf>,
    limit_secs: u64,
    quiet: bool,
    verbosity: u8,
) -> Result<()> {
    // Apply CLI overrides
    if let Some(d) = device {
        config.audio.device = Some(d);
    }
    if let Some(m) = model {
        config.stt.model_path = m.to_string_lossy().to_string();
    }
    if play {
        config.playback.enabled = true;
    }

    let utterance = match &input {
        Some(path) => {
            if !quiet {
                eprintln!("Reading {}...", path.display());
            }
            wav::read_file(path)?
        }
        None => record_utterance(&config, quiet, limit_secs)?,
    };
    if verbosity >= 1 {
        eprintln!("Acquired {:.1}s of audio.", utterance.duration_secs());
    }

    if !quiet {
        eprintln!("Loading model '{}'...", config.stt.model_path);
    }
    let transcriber = WhisperTranscriber::new(WhisperConfig {
        model_path: PathBuf::from(&config.stt.model_path),
        threads: config.stt.threads,
    })?;
    let translator = WebTranslator::new(config.translate.endpoint.clone())?;
    let synthesizer = WebSynthesizer::new(config.tts.endpoint.clone())?;
    let controller = PipelineController::new(transcriber, translator, synthesizer);

    if !quiet {
        eprintln!("Transcribing...");
    }
    let run = controller.submit_utterance(utterance)?;

    println!(
        "Detected spoken language: {}",
        run.detected_language().display_name()
    );
    println!("Transcript: {}", run.transcript().text);

    let requested = match target {
        Some(code) => code,
        None => prompt_for_target(&run.candidate_targets())?,
    };

    if !quiet {
        eprintln!("Translating to '{}'...", requested.trim());
    }
    let mut report = run.select_target(&requested);

    match report.status {
        RunStatus::Done => {
            if let Some(translation) = &report.translation {
                println!(
                    "Translation ({}): {}",
                    translation.target.display_name(),
                    translation.text
                );
            }
            let audio = report.audio.take().ok_or_else(|| {
                DubashError::Other("run completed without synthesized audio".to_string())
            })?;

            if config.playback.enabled
                && let Some(path) = audio.artifact_path()
            {
                play_best_effort(&config, path, quiet);
            }

            if let Some(dest) = &output {
                audio.save(dest)?;
                if !quiet {
                    eprintln!("Saved synthesized audio to {}", dest.display());
                }
            }
            Ok(())
        }
        RunStatus::Failed => {
            let error = report
                .error
                .take()
                .unwrap_or_else(|| DubashError::Other("run failed".to_string()));
            render_failure_guidance(&error);
            Err(error)
        }
    }
}

/// Print distinct guidance per failure class, ahead of the error itself.
fn render_failure_guidance(error: &DubashError) {
    match error {
        DubashError::SameLanguage { .. } => {
            eprintln!("The target language matches what was spoken. Pick a different target.");
        }
        DubashError::UnsupportedLanguage { .. } => {
            let codes: Vec<&str> = crate::lang::SUPPORTED.iter().map(|l| l.as_code()).collect();
            eprintln!(
                "That language is not supported. Choose one of: {}",
                codes.join(", ")
            );
        }
        DubashError::Translation { .. } | DubashError::Synthesis { .. } => {
            eprintln!("An external service failed; the run was not retried. Try again later.");
        }
        _ => {}
    }
}

/// List candidate targets and read the user's choice from stdin.
fn prompt_for_target(candidates: &[Language]) -> Result<String> {
    println!("\nChoose a language to translate to:");
    for language in candidates {
        println!("- {} ({})", language.display_name(), language.as_code());
    }
    print!("\nEnter language code: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_ascii_lowercase())
}

/// Play the synthesized audio, logging rather than failing the run on error.
fn play_best_effort(config: &Config, path: &Path, quiet: bool) {
    let mut player = AudioPlayer::new(SystemCommandExecutor::new());
    if let Some(name) = &config.playback.player {
        player = player.with_player(name);
    }
    match player.play(path) {
        Ok(()) => {}
        Err(e) => {
            if !quiet {
                eprintln!("Playback unavailable: {}", e);
            }
        }
    }
}

/// Record from the microphone until Enter is pressed or the limit elapses.
#[cfg(feature = "cpal-audio")]
fn record_utterance(config: &Config, quiet: bool, limit_secs: u64) -> Result<Utterance> {
    use crate::audio::capture::{MicrophoneCapture, suppress_audio_warnings};
    use crate::audio::session::CaptureSession;
    use std::time::Duration;

    suppress_audio_warnings();

    let session = CaptureSession::new(config.audio.sample_rate, config.audio.frame_capacity);
    let capture = MicrophoneCapture::start(
        config.audio.device.as_deref(),
        session.feeder(),
        config.audio.sample_rate,
    )?;

    if !quiet {
        eprintln!(
            "Recording from '{}'. Press Enter to stop (limit {}s)...",
            capture.device_name(),
            limit_secs
        );
    }

    // Finalizing is the caller's signal: Enter, or the limit as a backstop.
    let (done_tx, done_rx) = crossbeam_channel::bounded::<()>(1);
    std::thread::spawn(move || {
        let mut line = String::new();
        let _ = io::stdin().read_line(&mut line);
        let _ = done_tx.send(());
    });
    let _ = done_rx.recv_timeout(Duration::from_secs(limit_secs));

    capture.stop();

    if session.dropped_frames() > 0 && !quiet {
        eprintln!(
            "Warning: {} audio frames dropped (recording exceeded the buffer).",
            session.dropped_frames()
        );
    }

    session.finalize()
}

/// Microphone capture placeholder (without cpal-audio feature).
#[cfg(not(feature = "cpal-audio"))]
fn record_utterance(_config: &Config, _quiet: bool, _limit_secs: u64) -> Result<Utterance> {
    Err(DubashError::AudioCapture {
        message: concat!(
            "Microphone capture not enabled. This binary was built without audio capture.\n",
            "To fix: cargo build --release --features cpal-audio\n",
            "Or pass a WAV file to translate instead."
        )
        .to_string(),
    })
}
