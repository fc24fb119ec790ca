//! Temporary artifact lifecycle management.
//!
//! Every transient audio payload that needs file-like access mid-pipeline
//! (an utterance serialized to WAV for transcription, synthesized speech
//! spilled to disk for playback) is allocated through an [`ArtifactScope`]
//! and released exactly once: explicitly via [`AudioArtifact::release`],
//! by persisting it with [`AudioArtifact::keep`], or implicitly on drop
//! when a stage fails. The scope counts acquire/release pairs so tests can
//! verify that no run leaks or double-frees an artifact.

use crate::error::{DubashError, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::{Builder, TempPath};

/// Acquire/release counters for the artifacts of one scope.
#[derive(Debug, Default)]
pub struct ArtifactStats {
    acquired: AtomicUsize,
    released: AtomicUsize,
}

impl ArtifactStats {
    /// Number of artifacts allocated so far.
    pub fn acquired(&self) -> usize {
        self.acquired.load(Ordering::SeqCst)
    }

    /// Number of artifacts released so far.
    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    /// Number of artifacts currently alive.
    pub fn live(&self) -> usize {
        self.acquired() - self.released()
    }

    /// True when every acquired artifact has been released.
    pub fn is_balanced(&self) -> bool {
        self.acquired() == self.released()
    }
}

/// Allocates uniquely named temporary files and tracks their lifecycle.
#[derive(Debug, Clone, Default)]
pub struct ArtifactScope {
    stats: Arc<ArtifactStats>,
}

impl ArtifactScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle to this scope's acquire/release counters.
    pub fn stats(&self) -> Arc<ArtifactStats> {
        Arc::clone(&self.stats)
    }

    /// Allocate an empty temporary file with the given suffix (e.g. ".wav").
    pub fn create(&self, suffix: &str) -> Result<AudioArtifact> {
        let file = Builder::new()
            .prefix("dubash-")
            .suffix(suffix)
            .tempfile()
            .map_err(|e| DubashError::Artifact {
                message: format!("Failed to allocate temporary file: {}", e),
            })?;
        let temp = file.into_temp_path();
        self.register(temp)
    }

    /// Allocate a temporary file pre-filled with the given bytes.
    pub fn create_with(&self, suffix: &str, bytes: &[u8]) -> Result<AudioArtifact> {
        let mut file = Builder::new()
            .prefix("dubash-")
            .suffix(suffix)
            .tempfile()
            .map_err(|e| DubashError::Artifact {
                message: format!("Failed to allocate temporary file: {}", e),
            })?;
        file.write_all(bytes).map_err(|e| DubashError::Artifact {
            message: format!("Failed to write temporary file: {}", e),
        })?;
        file.flush().map_err(|e| DubashError::Artifact {
            message: format!("Failed to flush temporary file: {}", e),
        })?;
        let temp = file.into_temp_path();
        self.register(temp)
    }

    fn register(&self, temp: TempPath) -> Result<AudioArtifact> {
        self.stats.acquired.fetch_add(1, Ordering::SeqCst);
        let path = temp.to_path_buf();
        Ok(AudioArtifact {
            path,
            temp: Some(temp),
            stats: Arc::clone(&self.stats),
        })
    }
}

/// A scoped temporary file holding one transient audio payload.
///
/// The underlying file is deleted when the artifact is released or dropped,
/// whichever comes first. Release is structurally exactly-once: the inner
/// temp path is taken out of the guard on every exit path.
#[derive(Debug)]
pub struct AudioArtifact {
    path: PathBuf,
    temp: Option<TempPath>,
    stats: Arc<ArtifactStats>,
}

impl AudioArtifact {
    /// Location of the artifact on disk.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the artifact, surfacing filesystem errors.
    ///
    /// Prefer this over relying on drop where an error should reach the
    /// caller; drop still guarantees deletion on failure paths.
    pub fn release(mut self) -> Result<()> {
        match self.temp.take() {
            Some(temp) => {
                self.stats.released.fetch_add(1, Ordering::SeqCst);
                temp.close().map_err(|e| DubashError::Artifact {
                    message: format!("Failed to release {}: {}", self.path.display(), e),
                })
            }
            None => Ok(()),
        }
    }

    /// Persist the artifact to a caller-chosen path, ending its lifecycle.
    pub fn keep(mut self, dest: &Path) -> Result<()> {
        match self.temp.take() {
            Some(temp) => {
                self.stats.released.fetch_add(1, Ordering::SeqCst);
                // Rename first; fall back to copy for cross-filesystem moves.
                match temp.persist(dest) {
                    Ok(()) => Ok(()),
                    Err(e) => {
                        let temp = e.path;
                        std::fs::copy(&self.path, dest).map_err(|e| DubashError::Artifact {
                            message: format!("Failed to persist to {}: {}", dest.display(), e),
                        })?;
                        temp.close().map_err(|e| DubashError::Artifact {
                            message: format!("Failed to release {}: {}", self.path.display(), e),
                        })
                    }
                }
            }
            None => Ok(()),
        }
    }
}

impl Drop for AudioArtifact {
    fn drop(&mut self) {
        if let Some(temp) = self.temp.take() {
            self.stats.released.fetch_add(1, Ordering::SeqCst);
            drop(temp);
        }
    }
}
