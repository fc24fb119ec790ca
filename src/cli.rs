//! Command-line interface for dubash
//!
//! Provides argument parsing using clap derive macros.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Voice-to-voice translation between English, Hindi, and Kannada
#[derive(Parser, Debug)]
#[command(
    name = "dubash",
    version,
    about = "Voice-to-voice translation between English, Hindi, and Kannada"
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Suppress status output (quiet mode)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Audio file to translate (WAV). Records from the microphone when omitted
    #[arg(value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Target language code (en/hi/kn). Prompts interactively when omitted
    #[arg(short, long, value_name = "LANG")]
    pub target: Option<String>,

    /// Audio input device for microphone mode
    #[arg(long, value_name = "DEVICE")]
    pub device: Option<String>,

    /// Path to the Whisper model file
    #[arg(long, value_name = "PATH")]
    pub model: Option<PathBuf>,

    /// Play the synthesized audio when the run completes
    #[arg(long)]
    pub play: bool,

    /// Save the synthesized audio to this path
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Recording time limit for microphone mode. Examples: 30s, 2m
    #[arg(long, value_name = "DURATION", default_value = "60s", value_parser = parse_limit_secs)]
    pub limit: u64,
}

/// Parse a recording limit string into seconds.
///
/// Supports any duration format accepted by `humantime`: bare numbers
/// (seconds), single-unit (`30s`, `5m`), and compound (`1m30s`).
fn parse_limit_secs(s: &str) -> Result<u64, String> {
    let s = s.trim();
    // Bare number → seconds
    if let Ok(secs) = s.parse::<u64>() {
        return Ok(secs);
    }
    humantime::parse_duration(s)
        .map(|d| d.as_secs())
        .map_err(|e| e.to_string())
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List supported languages
    Languages,

    /// List available audio input devices
    Devices,

    /// Manage configuration
    Config {
        /// Action to perform
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Configuration management actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the active configuration
    Show,

    /// Print the configuration file path
    Path,

    /// Write a default configuration file
    Init,
}
