//! Speech-to-text transcription.
//!
//! External collaborator: takes audio, returns an ordered sequence of
//! time-stamped, 1-indexed segments. The model behind it is irrelevant to
//! the summary pipeline.

mod whisper;

pub use whisper::WhisperTranscriber;

use crate::error::Result;
use crate::transcript::Transcript;
use async_trait::async_trait;
use std::path::Path;

/// Trait for transcription services.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe an audio file into an indexed transcript.
    async fn transcribe(&self, audio_path: &Path) -> Result<Transcript>;

    /// Transcribe an audio file with a specific language hint.
    async fn transcribe_with_language(
        &self,
        audio_path: &Path,
        language: &str,
    ) -> Result<Transcript>;
}
