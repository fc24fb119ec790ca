//! Text-to-speech: the Synthesizer capability and its implementations.

pub mod synthesizer;
pub mod web;
