//! Transcribe command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::transcript::render_artifact;
use crate::transcription::{Transcriber, WhisperTranscriber};
use anyhow::Result;
use std::path::Path;

/// Run the transcribe command.
pub async fn run_transcribe(
    input: &str,
    output: Option<String>,
    language: Option<String>,
    settings: Settings,
) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Transcribe) {
        Output::error(&format!("{}", e));
        Output::info("Run 'utdrag doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let input_path = Path::new(input);
    if !input_path.exists() {
        Output::error(&format!("File not found: {}", input));
        return Err(anyhow::anyhow!("file not found"));
    }

    Output::info(&format!("Transcribing: {}", input));

    let transcriber = WhisperTranscriber::with_config(
        &settings.transcription.model,
        settings.transcription.chunk_duration_seconds,
        settings.transcription.max_concurrent_chunks,
    );

    let transcript = match &language {
        Some(lang) => transcriber.transcribe_with_language(input_path, lang).await?,
        None => transcriber.transcribe(input_path).await?,
    };

    let artifact = render_artifact(&transcript);

    match output {
        Some(path) => {
            std::fs::write(&path, artifact)?;
            Output::success(&format!(
                "Wrote {} segments to {}",
                transcript.segments.len(),
                path
            ));
        }
        None => {
            print!("{}", artifact);
        }
    }

    Ok(())
}
