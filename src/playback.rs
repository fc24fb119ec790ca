//! Optional audio playback with testable command execution.
//!
//! Playback is a presentation nicety, separate from synthesis: it may fail
//! (headless machine, no player installed) without affecting the run result.
//! The `CommandExecutor` trait enables full testability without external
//! dependencies.

use crate::error::{DubashError, Result};
use std::path::Path;
use std::process::Command;

/// Trait for executing system commands.
///
/// Object-safe, Send + Sync for use in concurrent contexts.
/// Enables testability by allowing mock implementations.
pub trait CommandExecutor: Send + Sync {
    /// Execute a command with arguments.
    ///
    /// Returns the stdout of the command on success.
    /// Returns an error if the command fails or is not found.
    fn execute(&self, command: &str, args: &[&str]) -> Result<String>;
}

/// Production command executor using std::process::Command.
#[derive(Debug, Clone, Default)]
pub struct SystemCommandExecutor;

impl SystemCommandExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl CommandExecutor for SystemCommandExecutor {
    fn execute(&self, command: &str, args: &[&str]) -> Result<String> {
        let output = Command::new(command).args(args).output().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                DubashError::PlayerNotFound {
                    tool: command.to_string(),
                }
            } else {
                DubashError::Playback {
                    message: format!("Failed to execute {}: {}", command, e),
                }
            }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DubashError::Playback {
                message: format!(
                    "{} failed with status {:?}: {}",
                    command, output.status, stderr
                ),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

/// Players tried in order when none is configured.
const PLAYERS: &[(&str, &[&str])] = &[
    ("mpv", &["--no-video", "--really-quiet"]),
    ("ffplay", &["-nodisp", "-autoexit", "-loglevel", "quiet"]),
    ("mpg123", &["-q"]),
];

/// Plays a synthesized audio file through a system media player.
pub struct AudioPlayer<E: CommandExecutor> {
    executor: E,
    player: Option<String>,
}

impl<E: CommandExecutor> AudioPlayer<E> {
    /// Create a player with the given executor and the default player list.
    pub fn new(executor: E) -> Self {
        Self {
            executor,
            player: None,
        }
    }

    /// Use a specific player command instead of the default list.
    pub fn with_player(mut self, player: &str) -> Self {
        self.player = Some(player.to_string());
        self
    }

    /// Play the audio file, blocking until playback ends.
    ///
    /// With a configured player, only that command is tried. Otherwise each
    /// known player is tried in order; a missing binary moves on to the next,
    /// any other failure stops the attempt.
    ///
    /// # Errors
    /// Returns `PlayerNotFound` if no player is available, or `Playback` if
    /// the chosen player failed.
    pub fn play(&self, path: &Path) -> Result<()> {
        let file = path.to_string_lossy();

        if let Some(player) = &self.player {
            self.executor.execute(player, &[&file])?;
            return Ok(());
        }

        for (tool, args) in PLAYERS {
            let mut full_args: Vec<&str> = args.to_vec();
            full_args.push(&file);
            match self.executor.execute(tool, &full_args) {
                Ok(_) => return Ok(()),
                Err(DubashError::PlayerNotFound { .. }) => continue,
                Err(e) => return Err(e),
            }
        }

        Err(DubashError::PlayerNotFound {
            tool: PLAYERS
                .iter()
                .map(|(tool, _)| *tool)
                .collect::<Vec<_>>()
                .join(", "),
        })
    }
}
