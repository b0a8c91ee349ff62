//! Pre-flight checks before expensive operations.
//!
//! Validates that required tools and configuration are available before
//! starting operations that would otherwise fail midway.

use crate::error::{Result, UtdragError};
use std::process::Command;

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Digest generation needs audio tools and the API key.
    Summarize,
    /// Transcription needs audio tools and the API key.
    Transcribe,
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(operation: Operation) -> Result<()> {
    match operation {
        Operation::Summarize | Operation::Transcribe => {
            check_api_key()?;
            check_tool("ffmpeg")?;
            check_tool("ffprobe")?;
        }
    }
    Ok(())
}

/// Check if OpenAI API key is configured.
fn check_api_key() -> Result<()> {
    match std::env::var("OPENAI_API_KEY") {
        Ok(key) if !key.is_empty() => Ok(()),
        Ok(_) => Err(UtdragError::Config(
            "OPENAI_API_KEY is empty. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
        Err(_) => Err(UtdragError::Config(
            "OPENAI_API_KEY not set. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
    }
}

/// Check if an external tool is available.
pub fn check_tool(name: &str) -> Result<()> {
    // ffmpeg/ffprobe use -version (single dash)
    let version_arg = match name {
        "ffmpeg" | "ffprobe" => "-version",
        _ => "--version",
    };
    match Command::new(name).arg(version_arg).output() {
        Ok(output) if output.status.success() => Ok(()),
        Ok(_) => Err(UtdragError::ToolNotFound(format!(
            "{} is installed but not working correctly",
            name
        ))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(UtdragError::ToolNotFound(name.to_string()))
        }
        Err(e) => Err(UtdragError::ToolNotFound(format!("{}: {}", name, e))),
    }
}
