//! Summarize command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::{Orchestrator, SummaryRequest};
use crate::summary::LengthPreset;
use anyhow::Result;
use std::path::PathBuf;

/// Arguments for the summarize command.
pub struct SummarizeArgs {
    pub episode: String,
    pub output: Option<String>,
    pub intro: Option<String>,
    pub separator: Option<String>,
    pub length: Option<String>,
    pub transcript: Option<String>,
    pub no_fade: bool,
    pub keep_session_files: bool,
}

/// Run the summarize command.
pub async fn run_summarize(args: SummarizeArgs, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Summarize) {
        Output::error(&format!("{}", e));
        Output::info("Run 'utdrag doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let preset: LengthPreset = match &args.length {
        Some(s) => s.parse()?,
        None => settings.summary.default_preset()?,
    };

    let episode = PathBuf::from(&args.episode);
    let output = match &args.output {
        Some(path) => PathBuf::from(path),
        None => default_output(&episode),
    };
    let fade = settings.summary.fade_in && !args.no_fade;

    let request = SummaryRequest {
        episode,
        output,
        intro: args.intro.map(PathBuf::from),
        separator: args.separator.map(PathBuf::from),
        preset,
        fade,
        transcript: args.transcript.map(PathBuf::from),
        keep_session_files: args.keep_session_files,
    };

    Output::info(&format!("Summarizing: {} ({})", args.episode, preset));

    let orchestrator = Orchestrator::new(settings)?;

    match orchestrator.run(request).await {
        Ok(result) => {
            match &result.output_path {
                Some(path) => {
                    Output::success(&format!("Digest written to {}", path.display()));
                    Output::kv("Topic", &result.topic);
                    Output::kv("Type", &result.format.to_string());
                    Output::kv("Passages", &result.runs_accepted.to_string());
                    if let Some(transcript) = &result.transcript_path {
                        Output::kv("Transcript", &transcript.display().to_string());
                    }
                }
                None => {
                    Output::warning(
                        "No relevant segments found - no digest was created. \
                         Try a longer length preset.",
                    );
                }
            }
            Ok(())
        }
        Err(e) => {
            Output::error(&format!("Could not complete summary: {}", e));
            Err(e.into())
        }
    }
}

/// Default digest path next to the episode file.
fn default_output(episode: &std::path::Path) -> PathBuf {
    let stem = episode
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("episode");
    episode.with_file_name(format!("{}_digest.mp3", stem))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output(std::path::Path::new("/tmp/show_ep42.mp3")),
            PathBuf::from("/tmp/show_ep42_digest.mp3")
        );
    }
}
