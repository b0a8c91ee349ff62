//! Configuration settings for Utdrag.

use crate::summary::LengthPreset;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub transcription: TranscriptionSettings,
    pub summary: SummarySettings,
    pub oracle: OracleSettings,
    pub prompts: PromptSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory for temporary session artifacts.
    pub temp_dir: String,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            temp_dir: "/tmp/utdrag".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Transcription service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptionSettings {
    /// Whisper model to use.
    pub model: String,
    /// Duration in seconds for splitting long audio files.
    pub chunk_duration_seconds: u32,
    /// Maximum episode duration to process (in seconds).
    pub max_duration_seconds: u32,
    /// Maximum concurrent chunk transcriptions.
    pub max_concurrent_chunks: usize,
}

impl Default for TranscriptionSettings {
    fn default() -> Self {
        Self {
            model: "whisper-1".to_string(),
            chunk_duration_seconds: 120,
            max_duration_seconds: 7200, // 2 hours
            max_concurrent_chunks: 3,
        }
    }
}

/// Digest generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarySettings {
    /// Default summary length preset (short, middle, long).
    pub default_length: String,
    /// Minimum accepted length of a consecutive segment run.
    pub min_run_segments: usize,
    /// Maximum accepted length of a consecutive segment run.
    pub max_run_segments: usize,
    /// Apply a fade-in to each excerpt.
    pub fade_in: bool,
    /// Fade-in duration in seconds.
    pub fade_seconds: f64,
    /// Delay between successive oracle calls, in milliseconds.
    pub throttle_ms: u64,
}

impl Default for SummarySettings {
    fn default() -> Self {
        Self {
            default_length: "middle".to_string(),
            min_run_segments: 3,
            max_run_segments: 11,
            fade_in: true,
            fade_seconds: 0.5,
            throttle_ms: 3000,
        }
    }
}

impl SummarySettings {
    /// Parse the configured default length preset.
    pub fn default_preset(&self) -> crate::error::Result<LengthPreset> {
        self.default_length.parse()
    }
}

/// Oracle (LLM) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleSettings {
    /// Chat model for classification and relevance ranking.
    pub model: String,
    /// Token cap per oracle reply.
    pub max_tokens: u32,
    /// Number of leading transcript words sent to the classifier.
    pub classify_excerpt_words: usize,
}

impl Default for OracleSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            max_tokens: 1000,
            classify_excerpt_words: 1000,
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to the default configuration file.
    pub fn save(&self) -> crate::error::Result<()> {
        self.save_to(&Self::default_config_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::UtdragError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("utdrag")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded temp directory path.
    pub fn temp_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.temp_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.summary.min_run_segments, 3);
        assert_eq!(settings.summary.max_run_segments, 11);
        assert_eq!(settings.oracle.classify_excerpt_words, 1000);
        assert_eq!(
            settings.summary.default_preset().unwrap(),
            LengthPreset::Middle
        );
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [summary]
            default_length = "long"
            "#,
        )
        .unwrap();
        assert_eq!(settings.summary.default_preset().unwrap(), LengthPreset::Long);
        assert_eq!(settings.summary.min_run_segments, 3);
        assert_eq!(settings.oracle.model, "gpt-4o-mini");
    }
}
