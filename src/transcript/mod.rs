//! Time-stamped transcript model.
//!
//! A transcript is an ordered sequence of indexed segments. Segment indices
//! start at 1 and are contiguous; they are the currency of the relevance
//! oracle, which answers with segment numbers rather than timestamps.

mod artifact;

pub use artifact::{parse_artifact, render_artifact};

use serde::{Deserialize, Serialize};

/// A single transcript segment with timestamp information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// 1-based segment index.
    pub index: u32,
    /// Start time in seconds.
    pub start_seconds: f64,
    /// End time in seconds.
    pub end_seconds: f64,
    /// Transcribed text content.
    pub text: String,
}

impl TranscriptSegment {
    /// Create a new transcript segment.
    pub fn new(index: u32, start_seconds: f64, end_seconds: f64, text: String) -> Self {
        Self {
            index,
            start_seconds,
            end_seconds,
            text,
        }
    }

    /// Duration of this segment in seconds.
    pub fn duration(&self) -> f64 {
        self.end_seconds - self.start_seconds
    }
}

/// A complete episode transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    /// Episode identifier (derived from the audio file name).
    pub episode_id: String,
    /// Segments in index order.
    pub segments: Vec<TranscriptSegment>,
    /// Full transcript text (concatenated segments).
    pub full_text: String,
    /// Total duration in seconds.
    pub duration_seconds: f64,
}

impl Transcript {
    /// Create a new transcript from segments.
    pub fn new(episode_id: String, segments: Vec<TranscriptSegment>) -> Self {
        let full_text = segments
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        let duration_seconds = segments.last().map(|s| s.end_seconds).unwrap_or(0.0);

        Self {
            episode_id,
            segments,
            full_text,
            duration_seconds,
        }
    }

    /// Look up a segment by its 1-based index.
    pub fn segment(&self, index: u32) -> Option<&TranscriptSegment> {
        if index == 0 {
            return None;
        }
        self.segments
            .get((index - 1) as usize)
            .filter(|s| s.index == index)
    }

    /// Tile the transcript into contiguous blocks of `block_size` segments.
    ///
    /// Blocks cover every segment exactly once, with no gaps and no overlap;
    /// the last block may be shorter.
    pub fn blocks(&self, block_size: usize) -> impl Iterator<Item = Block<'_>> {
        self.segments
            .chunks(block_size.max(1))
            .map(|segments| Block { segments })
    }

    /// The first `max_words` words of the transcript, for classification.
    pub fn leading_words(&self, max_words: usize) -> String {
        self.full_text
            .split_whitespace()
            .take(max_words)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A contiguous slice of the transcript submitted to the relevance oracle
/// in one call.
#[derive(Debug, Clone, Copy)]
pub struct Block<'a> {
    segments: &'a [TranscriptSegment],
}

impl<'a> Block<'a> {
    /// Segments in this block.
    pub fn segments(&self) -> &'a [TranscriptSegment] {
        self.segments
    }

    /// Number of segments in this block.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether the block is empty. Tiling never produces empty blocks.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Index of the first segment in this block.
    pub fn first_index(&self) -> u32 {
        self.segments.first().map(|s| s.index).unwrap_or(0)
    }

    /// Index of the last segment in this block.
    pub fn last_index(&self) -> u32 {
        self.segments.last().map(|s| s.index).unwrap_or(0)
    }

    /// Render the block for the oracle prompt, segment markers and
    /// timestamps included verbatim.
    pub fn prompt_text(&self) -> String {
        self.segments
            .iter()
            .map(artifact::segment_line)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Format seconds as MM:SS or HH:MM:SS for display.
pub fn format_timestamp(seconds: f64) -> String {
    let total_seconds = seconds as u32;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}", minutes, secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_segments(n: u32) -> Vec<TranscriptSegment> {
        (1..=n)
            .map(|i| {
                let start = (i - 1) as f64 * 10.0;
                TranscriptSegment::new(i, start, start + 10.0, format!("segment {}", i))
            })
            .collect()
    }

    #[test]
    fn test_transcript_creation() {
        let transcript = Transcript::new("ep1".to_string(), sample_segments(3));

        assert_eq!(transcript.episode_id, "ep1");
        assert_eq!(transcript.full_text, "segment 1 segment 2 segment 3");
        assert_eq!(transcript.duration_seconds, 30.0);
    }

    #[test]
    fn test_segment_lookup() {
        let transcript = Transcript::new("ep1".to_string(), sample_segments(5));

        assert_eq!(transcript.segment(1).unwrap().index, 1);
        assert_eq!(transcript.segment(5).unwrap().index, 5);
        assert!(transcript.segment(0).is_none());
        assert!(transcript.segment(6).is_none());
    }

    #[test]
    fn test_blocks_cover_every_segment_once() {
        let transcript = Transcript::new("ep1".to_string(), sample_segments(11));

        let blocks: Vec<_> = transcript.blocks(4).collect();
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[2].len(), 3); // short last block

        let mut covered = Vec::new();
        for block in &blocks {
            for seg in block.segments() {
                covered.push(seg.index);
            }
        }
        assert_eq!(covered, (1..=11).collect::<Vec<_>>());
    }

    #[test]
    fn test_block_index_range() {
        let transcript = Transcript::new("ep1".to_string(), sample_segments(10));

        let blocks: Vec<_> = transcript.blocks(4).collect();
        assert_eq!(blocks[0].first_index(), 1);
        assert_eq!(blocks[0].last_index(), 4);
        assert_eq!(blocks[1].first_index(), 5);
        assert_eq!(blocks[2].first_index(), 9);
        assert_eq!(blocks[2].last_index(), 10);
    }

    #[test]
    fn test_leading_words() {
        let transcript = Transcript::new("ep1".to_string(), sample_segments(4));

        assert_eq!(transcript.leading_words(3), "segment 1 segment");
        assert_eq!(
            transcript.leading_words(100),
            "segment 1 segment 2 segment 3 segment 4"
        );
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0.0), "00:00");
        assert_eq!(format_timestamp(65.0), "01:05");
        assert_eq!(format_timestamp(3665.0), "01:01:05");
    }
}
