//! Pipeline orchestrator for Utdrag.
//!
//! Sequences transcription, classification, block planning, per-block
//! relevance selection, timeline assembly, and audio concatenation for one
//! episode.

use crate::audio::{assemble_timeline, probe_duration};
use crate::config::{Prompts, Settings};
use crate::error::{Result, UtdragError};
use crate::oracle::{ChatOracle, Classification, Classifier, EpisodeFormat, RelevanceOracle};
use crate::summary::{
    build_timeline, plan_block_size, ClipRole, ExtractionRun, LengthPreset, RelevanceSelector,
};
use crate::transcript::{format_timestamp, parse_artifact, render_artifact, Transcript};
use crate::transcription::{Transcriber, WhisperTranscriber};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// One digest request.
#[derive(Debug, Clone)]
pub struct SummaryRequest {
    /// Episode audio file.
    pub episode: PathBuf,
    /// Where to write the digest.
    pub output: PathBuf,
    /// Optional intro clip, prepended to the digest.
    pub intro: Option<PathBuf>,
    /// Optional separator clip, inserted between excerpts.
    pub separator: Option<PathBuf>,
    /// Target summary length.
    pub preset: LengthPreset,
    /// Apply a fade-in to each excerpt.
    pub fade: bool,
    /// Reuse an existing transcript artifact instead of transcribing.
    pub transcript: Option<PathBuf>,
    /// Keep the session directory (clips, transcript) after the run.
    pub keep_session_files: bool,
}

/// Result of one digest run.
#[derive(Debug)]
pub struct SummaryResult {
    /// Run-scoped session identifier; namespaces all derived artifacts.
    pub session_id: String,
    /// Classified episode topic.
    pub topic: String,
    /// Classified episode format.
    pub format: EpisodeFormat,
    /// Segments per oracle call.
    pub block_size: usize,
    /// Number of accepted extraction runs across all blocks.
    pub runs_accepted: usize,
    /// The produced digest, or None when no relevant segments were found.
    pub output_path: Option<PathBuf>,
    /// The transcript artifact, when it survives the run.
    pub transcript_path: Option<PathBuf>,
}

/// The main orchestrator for the Utdrag pipeline.
pub struct Orchestrator {
    settings: Settings,
    transcriber: Arc<dyn Transcriber>,
    classifier: Arc<dyn Classifier>,
    oracle: Arc<dyn RelevanceOracle>,
    temp_dir: PathBuf,
}

impl Orchestrator {
    /// Create a new orchestrator with default components.
    pub fn new(settings: Settings) -> Result<Self> {
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        let transcriber: Arc<dyn Transcriber> = Arc::new(WhisperTranscriber::with_config(
            &settings.transcription.model,
            settings.transcription.chunk_duration_seconds,
            settings.transcription.max_concurrent_chunks,
        ));

        let chat_oracle = Arc::new(ChatOracle::new(&settings.oracle, prompts));

        Self::with_components(
            settings,
            transcriber,
            chat_oracle.clone(),
            chat_oracle,
        )
    }

    /// Create an orchestrator with custom components.
    pub fn with_components(
        settings: Settings,
        transcriber: Arc<dyn Transcriber>,
        classifier: Arc<dyn Classifier>,
        oracle: Arc<dyn RelevanceOracle>,
    ) -> Result<Self> {
        let temp_dir = settings.temp_dir();
        std::fs::create_dir_all(&temp_dir)?;

        Ok(Self {
            settings,
            transcriber,
            classifier,
            oracle,
            temp_dir,
        })
    }

    /// Get the settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Run the full digest pipeline for one episode.
    #[instrument(skip(self, request), fields(episode = %request.episode.display()))]
    pub async fn run(&self, request: SummaryRequest) -> Result<SummaryResult> {
        self.validate_inputs(&request)?;

        // Run-scoped identifier threaded through every derived artifact
        let session_id = Uuid::new_v4().simple().to_string();
        let session_dir = self.temp_dir.join(&session_id);
        std::fs::create_dir_all(&session_dir)?;

        let outcome = self.run_in_session(&request, &session_id, &session_dir).await;

        if request.keep_session_files {
            info!("Keeping session files in {}", session_dir.display());
        } else if let Err(e) = std::fs::remove_dir_all(&session_dir) {
            warn!("Failed to clean up session directory: {}", e);
        }

        outcome
    }

    async fn run_in_session(
        &self,
        request: &SummaryRequest,
        session_id: &str,
        session_dir: &std::path::Path,
    ) -> Result<SummaryResult> {
        // Probe the file assembly will actually slice
        let duration_seconds = probe_duration(&request.episode).await?;
        let max = self.settings.transcription.max_duration_seconds;
        if duration_seconds > max as f64 {
            return Err(UtdragError::InvalidInput(format!(
                "Episode duration ({:.0} seconds) exceeds maximum ({} seconds)",
                duration_seconds, max
            )));
        }

        // Transcribe, or reuse a prior artifact
        let (transcript, transcript_path) = match &request.transcript {
            Some(path) => {
                info!("Reusing transcript artifact {}", path.display());
                let content = std::fs::read_to_string(path)?;
                let episode_id = episode_id(&request.episode);
                (parse_artifact(&episode_id, &content)?, None)
            }
            None => {
                info!("Transcribing episode");
                eprintln!("  Transcribing...");
                let transcript = self.transcriber.transcribe(&request.episode).await?;
                eprintln!(
                    "  Transcription complete ({} segments)",
                    transcript.segments.len()
                );
                let artifact_path = session_dir.join(format!("{}_transcript.txt", session_id));
                std::fs::write(&artifact_path, render_artifact(&transcript))?;
                (transcript, Some(artifact_path))
            }
        };

        // Classify format and topic from the leading excerpt
        eprintln!("  Classifying episode...");
        let excerpt = transcript.leading_words(self.settings.oracle.classify_excerpt_words);
        let classification = self.classifier.classify(&excerpt).await?;
        info!(
            "Classified as {} about '{}'",
            classification.format, classification.topic
        );
        eprintln!(
            "  Episode type: {} | Topic: {}",
            classification.format, classification.topic
        );

        // Plan block size and drive the oracle over the tiled transcript
        let block_size = plan_block_size(
            duration_seconds,
            transcript.segments.len(),
            request.preset,
        )?;
        let block_count = transcript.segments.len().div_ceil(block_size);
        info!(
            "Block size {} ({} oracle calls over {} segments)",
            block_size,
            block_count,
            transcript.segments.len()
        );

        let runs = self
            .select_runs(&transcript, block_size, block_count, &classification)
            .await?;
        eprintln!("  Accepted {} relevant passage(s)", runs.len());
        for run in &runs {
            if let (Some(first), Some(last)) = (
                transcript.segment(run.first_index()),
                transcript.segment(run.last_index()),
            ) {
                eprintln!(
                    "    {} - {}",
                    format_timestamp(first.start_seconds),
                    format_timestamp(last.end_seconds)
                );
            }
        }

        // Build and materialize the timeline
        let timeline = build_timeline(
            &runs,
            &transcript,
            request.intro.as_deref(),
            request.separator.as_deref(),
            request.fade,
        )?;

        let mut result = SummaryResult {
            session_id: session_id.to_string(),
            topic: classification.topic,
            format: classification.format,
            block_size,
            runs_accepted: runs.len(),
            output_path: None,
            transcript_path: request.keep_session_files.then_some(transcript_path).flatten(),
        };

        let has_segments = timeline.iter().any(|e| e.role == ClipRole::Segment);
        if !has_segments {
            info!("No relevant segments found; nothing to assemble");
            return Ok(result);
        }

        eprintln!("  Assembling {} clips...", timeline.len());
        let output = assemble_timeline(
            &timeline,
            &request.episode,
            session_dir,
            session_id,
            &request.output,
            self.settings.summary.fade_seconds,
        )
        .await?;

        result.output_path = Some(output);
        Ok(result)
    }

    /// Select extraction runs block by block, in transcript order.
    ///
    /// Blocks are processed strictly sequentially; the returned runs are in
    /// oracle-call order, which the timeline preserves. A throttle delay
    /// between calls respects the oracle's rate limits.
    async fn select_runs(
        &self,
        transcript: &Transcript,
        block_size: usize,
        block_count: usize,
        classification: &Classification,
    ) -> Result<Vec<ExtractionRun>> {
        let selector = RelevanceSelector::new(
            self.oracle.clone(),
            self.settings.summary.min_run_segments,
            self.settings.summary.max_run_segments,
        );
        let throttle = Duration::from_millis(self.settings.summary.throttle_ms);

        let mut runs = Vec::new();
        for (i, block) in transcript.blocks(block_size).enumerate() {
            eprintln!("  Ranking block {}/{}...", i + 1, block_count);
            runs.extend(selector.select(&block, classification).await?);

            if i + 1 < block_count && !throttle.is_zero() {
                tokio::time::sleep(throttle).await;
            }
        }

        Ok(runs)
    }

    fn validate_inputs(&self, request: &SummaryRequest) -> Result<()> {
        if !request.episode.exists() {
            return Err(UtdragError::InvalidInput(format!(
                "episode file not found: {}",
                request.episode.display()
            )));
        }
        for clip in [&request.intro, &request.separator].into_iter().flatten() {
            if !clip.exists() {
                return Err(UtdragError::InvalidInput(format!(
                    "clip file not found: {}",
                    clip.display()
                )));
            }
        }
        if let Some(path) = &request.transcript {
            if !path.exists() {
                return Err(UtdragError::InvalidInput(format!(
                    "transcript file not found: {}",
                    path.display()
                )));
            }
        }
        Ok(())
    }
}

fn episode_id(episode: &std::path::Path) -> String {
    episode
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("episode")
        .to_string()
}
