//! Default configuration constants for dubash.
//!
//! This module provides shared constants used across different configuration types
//! to ensure consistency and eliminate duplication.

/// Default microphone capture sample rate in Hz.
///
/// 48kHz mono is what desktop audio stacks (PipeWire/PulseAudio) deliver
/// natively; utterances are resampled down to the transcriber's rate later.
pub const CAPTURE_SAMPLE_RATE: u32 = 48_000;

/// Sample rate expected by the Whisper transcriber, in Hz.
pub const STT_SAMPLE_RATE: u32 = 16_000;

/// Capacity of the capture session's frame queue.
///
/// At ~100ms per cpal callback frame this bounds a recording at roughly
/// two minutes. Frames arriving on a full queue are dropped and counted.
pub const FRAME_CAPACITY: usize = 1200;

/// Default path to the Whisper model file.
pub const MODEL_PATH: &str = "models/ggml-tiny.bin";

/// Default web translation endpoint (Google Translate's unofficial gtx API).
pub const TRANSLATE_ENDPOINT: &str = "https://translate.googleapis.com/translate_a/single";

/// Default web text-to-speech endpoint.
pub const TTS_ENDPOINT: &str = "https://translate.google.com/translate_tts";

/// HTTP timeout for translation and synthesis requests, in seconds.
pub const HTTP_TIMEOUT_SECS: u64 = 30;

/// Maximum characters per text-to-speech request.
///
/// The web endpoint rejects long inputs; longer texts are split on word
/// boundaries and the returned MP3 segments concatenated.
pub const TTS_CHUNK_CHARS: usize = 200;
