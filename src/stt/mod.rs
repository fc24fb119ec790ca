//! Speech-to-text: the Transcriber capability and its implementations.

pub mod transcriber;
pub mod whisper;
