use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
#[cfg(feature = "cli")]
use std::path::PathBuf;

use crate::defaults;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub audio: AudioConfig,
    pub stt: SttConfig,
    pub translate: TranslateConfig,
    pub tts: TtsConfig,
    pub playback: PlaybackConfig,
}

/// Audio capture configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AudioConfig {
    pub device: Option<String>,
    pub sample_rate: u32,
    pub frame_capacity: usize,
}

/// Speech-to-text configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SttConfig {
    pub model_path: String,
    pub threads: Option<usize>,
}

/// Translation service configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TranslateConfig {
    pub endpoint: String,
}

/// Speech synthesis service configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TtsConfig {
    pub endpoint: String,
}

/// Playback configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct PlaybackConfig {
    pub enabled: bool,
    pub player: Option<String>,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            device: None,
            sample_rate: defaults::CAPTURE_SAMPLE_RATE,
            frame_capacity: defaults::FRAME_CAPACITY,
        }
    }
}

impl Default for SttConfig {
    fn default() -> Self {
        Self {
            model_path: defaults::MODEL_PATH.to_string(),
            threads: None,
        }
    }
}

impl Default for TranslateConfig {
    fn default() -> Self {
        Self {
            endpoint: defaults::TRANSLATE_ENDPOINT.to_string(),
        }
    }
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            endpoint: defaults::TTS_ENDPOINT.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Returns an error if the file contains invalid TOML.
    /// Missing fields will use default values.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a file or return defaults if file doesn't exist
    ///
    /// Only returns defaults if the file is missing.
    /// Returns errors for invalid TOML.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                if e.downcast_ref::<std::io::Error>()
                    .map(|io_err| io_err.kind() == std::io::ErrorKind::NotFound)
                    .unwrap_or(false)
                {
                    Self::default()
                } else {
                    panic!("Failed to load config from {}: {}", path.display(), e);
                }
            }
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - DUBASH_MODEL → stt.model_path
    /// - DUBASH_AUDIO_DEVICE → audio.device
    /// - DUBASH_TRANSLATE_ENDPOINT → translate.endpoint
    /// - DUBASH_TTS_ENDPOINT → tts.endpoint
    /// - DUBASH_PLAYER → playback.player
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(model) = std::env::var("DUBASH_MODEL")
            && !model.is_empty()
        {
            self.stt.model_path = model;
        }

        if let Ok(device) = std::env::var("DUBASH_AUDIO_DEVICE")
            && !device.is_empty()
        {
            self.audio.device = Some(device);
        }

        if let Ok(endpoint) = std::env::var("DUBASH_TRANSLATE_ENDPOINT")
            && !endpoint.is_empty()
        {
            self.translate.endpoint = endpoint;
        }

        if let Ok(endpoint) = std::env::var("DUBASH_TTS_ENDPOINT")
            && !endpoint.is_empty()
        {
            self.tts.endpoint = endpoint;
        }

        if let Ok(player) = std::env::var("DUBASH_PLAYER")
            && !player.is_empty()
        {
            self.playback.player = Some(player);
        }

        self
    }

    /// Get the default configuration file path
    ///
    /// Returns ~/.config/dubash/config.toml on Linux
    #[cfg(feature = "cli")]
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("dubash")
            .join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.audio.sample_rate, defaults::CAPTURE_SAMPLE_RATE);
        assert_eq!(config.audio.frame_capacity, defaults::FRAME_CAPACITY);
        assert!(config.audio.device.is_none());
        assert_eq!(config.stt.model_path, defaults::MODEL_PATH);
        assert_eq!(config.translate.endpoint, defaults::TRANSLATE_ENDPOINT);
        assert_eq!(config.tts.endpoint, defaults::TTS_ENDPOINT);
        assert!(!config.playback.enabled);
        assert!(config.playback.player.is_none());
    }

    #[test]
    fn test_load_full_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[audio]
device = "pipewire"
sample_rate = 44100

[stt]
model_path = "/models/ggml-base.bin"
threads = 4

[translate]
endpoint = "http://localhost:8080/translate"

[tts]
endpoint = "http://localhost:8080/tts"

[playback]
enabled = true
player = "mpv"
"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.audio.device.as_deref(), Some("pipewire"));
        assert_eq!(config.audio.sample_rate, 44_100);
        assert_eq!(config.stt.model_path, "/models/ggml-base.bin");
        assert_eq!(config.stt.threads, Some(4));
        assert_eq!(config.translate.endpoint, "http://localhost:8080/translate");
        assert_eq!(config.tts.endpoint, "http://localhost:8080/tts");
        assert!(config.playback.enabled);
        assert_eq!(config.playback.player.as_deref(), Some("mpv"));
    }

    #[test]
    fn test_load_partial_config_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[stt]
model_path = "/custom/model.bin"
"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.stt.model_path, "/custom/model.bin");
        assert_eq!(config.audio.sample_rate, defaults::CAPTURE_SAMPLE_RATE);
        assert_eq!(config.translate.endpoint, defaults::TRANSLATE_ENDPOINT);
    }

    #[test]
    fn test_load_invalid_toml_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "not = valid = toml").unwrap();

        assert!(Config::load(file.path()).is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = Config::load_or_default(Path::new("/nonexistent/config.toml"));
        assert_eq!(config, Config::default());
    }

    #[test]
    #[should_panic(expected = "Failed to load config")]
    fn test_load_or_default_panics_on_invalid_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[audio\nbroken").unwrap();
        let _ = Config::load_or_default(file.path());
    }

    #[test]
    fn test_config_roundtrips_through_toml() {
        let mut config = Config::default();
        config.audio.device = Some("hw:1".to_string());
        config.playback.enabled = true;

        let serialized = toml::to_string(&config).unwrap();
        let back: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(back, config);
    }
}
