//! Translation: the Translator capability and its implementations.

pub mod translator;
pub mod web;
