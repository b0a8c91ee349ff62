//! Error types for Utdrag.

use thiserror::Error;

/// Library-level error type for Utdrag operations.
#[derive(Error, Debug)]
pub enum UtdragError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown summary length preset: {0}. Use short, middle, or long.")]
    InvalidPreset(String),

    #[error("Invalid episode input: {0}")]
    InvalidDuration(String),

    #[error("Transcription failed: {0}")]
    Transcription(String),

    #[error("Transcript artifact error: {0}")]
    Transcript(String),

    #[error("Oracle unavailable: {0}")]
    OracleUnavailable(String),

    #[error("Audio assembly failed: {0}")]
    Assembly(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),

    #[error("External tool not found: {0}. Please install it and ensure it's in your PATH.")]
    ToolNotFound(String),

    #[error("External tool failed: {0}")]
    ToolFailed(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for Utdrag operations.
pub type Result<T> = std::result::Result<T, UtdragError>;
