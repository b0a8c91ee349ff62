//! OpenAI Whisper transcription implementation.

use super::Transcriber;
use crate::audio::split_audio;
use crate::error::{Result, UtdragError};
use crate::openai::create_client;
use crate::transcript::{Transcript, TranscriptSegment};
use async_openai::types::{AudioResponseFormat, CreateTranscriptionRequestArgs};
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use tracing::{debug, info, instrument};

/// A transcribed span before index assignment.
type RawSegment = (f64, f64, String);

/// OpenAI Whisper-based transcriber.
pub struct WhisperTranscriber {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    chunk_duration_seconds: u32,
    max_concurrent_chunks: usize,
}

impl WhisperTranscriber {
    /// Create a new Whisper transcriber with default settings.
    pub fn new() -> Self {
        Self::with_config("whisper-1", 120, 3)
    }

    /// Create a new Whisper transcriber with custom configuration.
    pub fn with_config(
        model: &str,
        chunk_duration_seconds: u32,
        max_concurrent_chunks: usize,
    ) -> Self {
        Self {
            client: create_client(),
            model: model.to_string(),
            chunk_duration_seconds,
            max_concurrent_chunks,
        }
    }

    /// Transcribe a single audio file (no splitting).
    #[instrument(skip(self), fields(audio_path = %audio_path.display()))]
    async fn transcribe_single(
        &self,
        audio_path: &Path,
        language: Option<&str>,
    ) -> Result<Vec<RawSegment>> {
        debug!("Transcribing audio file");

        let file_bytes = tokio::fs::read(audio_path).await?;

        let mut request_builder = CreateTranscriptionRequestArgs::default();
        request_builder
            .file(async_openai::types::AudioInput::from_vec_u8(
                audio_path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or("audio.mp3")
                    .to_string(),
                file_bytes,
            ))
            .model(&self.model)
            .response_format(AudioResponseFormat::VerboseJson);

        if let Some(lang) = language {
            request_builder.language(lang);
        }

        let request = request_builder
            .build()
            .map_err(|e| UtdragError::Transcription(format!("Failed to build request: {}", e)))?;

        let response = self
            .client
            .audio()
            .transcribe_verbose_json(request)
            .await
            .map_err(|e| UtdragError::OpenAI(format!("Whisper API error: {}", e)))?;

        let segments: Vec<RawSegment> = response
            .segments
            .map(|segs| {
                segs.iter()
                    .map(|s| (s.start as f64, s.end as f64, s.text.trim().to_string()))
                    .collect()
            })
            .unwrap_or_else(|| {
                // Fallback: single span from full text
                vec![(0.0, response.duration as f64, response.text.trim().to_string())]
            });

        debug!("Transcribed {} segments", segments.len());
        Ok(segments)
    }

    /// Transcribe an audio file, splitting if necessary, and assign
    /// contiguous 1-based indices across chunks.
    #[instrument(skip(self), fields(audio_path = %audio_path.display()))]
    async fn transcribe_with_splitting(
        &self,
        audio_path: &Path,
        language: Option<&str>,
        episode_id: &str,
    ) -> Result<Transcript> {
        let temp_dir = tempfile::tempdir()?;
        let chunks = split_audio(audio_path, temp_dir.path(), self.chunk_duration_seconds).await?;

        if chunks.len() == 1 {
            let raw = self.transcribe_single(audio_path, language).await?;
            return Ok(index_segments(episode_id, raw));
        }

        let chunk_count = chunks.len();
        info!("Processing {} audio chunks with {}", chunk_count, self.model);

        let pb = ProgressBar::new(chunk_count as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("  {spinner:.green} Whisper   [{bar:30.cyan/blue}] {pos}/{len}")
                .unwrap()
                .progress_chars("█▓░"),
        );

        // Fail fast on the first failed chunk
        let mut results: Vec<(usize, f64, Vec<RawSegment>)> = Vec::with_capacity(chunk_count);

        let mut stream = stream::iter(chunks.into_iter().enumerate())
            .map(|(idx, (chunk_path, time_offset))| {
                let language = language.map(|s| s.to_string());
                async move {
                    let result = self.transcribe_single(&chunk_path, language.as_deref()).await;
                    (idx, time_offset, result)
                }
            })
            .buffer_unordered(self.max_concurrent_chunks);

        while let Some((idx, time_offset, result)) = stream.next().await {
            pb.inc(1);
            match result {
                Ok(raw) => results.push((idx, time_offset, raw)),
                Err(e) => {
                    pb.finish_and_clear();
                    drop(temp_dir);
                    return Err(UtdragError::Transcription(format!(
                        "Chunk {} at {:.0}s failed: {}",
                        idx, time_offset, e
                    )));
                }
            }
        }

        pb.finish_and_clear();

        // Merge in chunk order, re-applying each chunk's time offset
        results.sort_by_key(|(idx, _, _)| *idx);

        let mut all_raw = Vec::new();
        for (_, time_offset, raw) in results {
            all_raw.extend(
                raw.into_iter()
                    .map(|(start, end, text)| (start + time_offset, end + time_offset, text)),
            );
        }

        drop(temp_dir);

        Ok(index_segments(episode_id, all_raw))
    }
}

impl Default for WhisperTranscriber {
    fn default() -> Self {
        Self::new()
    }
}

/// Assign contiguous 1-based indices to raw transcribed spans.
fn index_segments(episode_id: &str, raw: Vec<RawSegment>) -> Transcript {
    let segments = raw
        .into_iter()
        .enumerate()
        .map(|(i, (start, end, text))| TranscriptSegment::new(i as u32 + 1, start, end, text))
        .collect();

    Transcript::new(episode_id.to_string(), segments)
}

#[async_trait]
impl Transcriber for WhisperTranscriber {
    async fn transcribe(&self, audio_path: &Path) -> Result<Transcript> {
        let episode_id = episode_id_from_path(audio_path);
        self.transcribe_with_splitting(audio_path, None, &episode_id)
            .await
    }

    async fn transcribe_with_language(
        &self,
        audio_path: &Path,
        language: &str,
    ) -> Result<Transcript> {
        let episode_id = episode_id_from_path(audio_path);
        self.transcribe_with_splitting(audio_path, Some(language), &episode_id)
            .await
    }
}

fn episode_id_from_path(audio_path: &Path) -> String {
    audio_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("episode")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_segments_are_contiguous_from_one() {
        let transcript = index_segments(
            "ep",
            vec![
                (0.0, 4.0, "a".to_string()),
                (4.0, 9.0, "b".to_string()),
                (9.0, 15.0, "c".to_string()),
            ],
        );

        let indices: Vec<u32> = transcript.segments.iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![1, 2, 3]);
        assert_eq!(transcript.duration_seconds, 15.0);
    }

    #[test]
    fn test_episode_id_from_path() {
        assert_eq!(
            episode_id_from_path(Path::new("/tmp/my_episode.mp3")),
            "my_episode"
        );
    }
}
