//! Transcript artifact format.
//!
//! One line per segment, `Segment <index>: <start>-<end>: <text>`, in
//! strictly increasing index order. This is the on-disk handoff between the
//! transcriber and the summary pipeline, and the exact shape the relevance
//! oracle sees per block.

use super::{Transcript, TranscriptSegment};
use crate::error::{Result, UtdragError};
use regex::Regex;
use std::sync::OnceLock;

fn line_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^Segment (\d+): ([0-9]+(?:\.[0-9]+)?)-([0-9]+(?:\.[0-9]+)?): ?(.*)$")
            .expect("invalid artifact line pattern")
    })
}

/// Render one segment as an artifact line.
pub(super) fn segment_line(segment: &TranscriptSegment) -> String {
    format!(
        "Segment {}: {}-{}: {}",
        segment.index, segment.start_seconds, segment.end_seconds, segment.text
    )
}

/// Render a transcript in artifact format.
pub fn render_artifact(transcript: &Transcript) -> String {
    let mut output = String::new();
    for segment in &transcript.segments {
        output.push_str(&segment_line(segment));
        output.push('\n');
    }
    output
}

/// Parse a transcript from artifact format.
///
/// Validates the segment contract: indices contiguous from 1, start times
/// strictly increasing, end never before start.
pub fn parse_artifact(episode_id: &str, content: &str) -> Result<Transcript> {
    let mut segments = Vec::new();
    let mut prev_start = f64::NEG_INFINITY;

    for (line_no, line) in content.lines().enumerate() {
        let captures = line_pattern().captures(line).ok_or_else(|| {
            UtdragError::Transcript(format!(
                "line {}: expected 'Segment <n>: <start>-<end>: <text>'",
                line_no + 1
            ))
        })?;

        let index: u32 = captures[1]
            .parse()
            .map_err(|_| UtdragError::Transcript(format!("line {}: bad index", line_no + 1)))?;
        let start_seconds: f64 = captures[2]
            .parse()
            .map_err(|_| UtdragError::Transcript(format!("line {}: bad start time", line_no + 1)))?;
        let end_seconds: f64 = captures[3]
            .parse()
            .map_err(|_| UtdragError::Transcript(format!("line {}: bad end time", line_no + 1)))?;

        let expected = segments.len() as u32 + 1;
        if index != expected {
            return Err(UtdragError::Transcript(format!(
                "line {}: segment index {} out of order (expected {})",
                line_no + 1,
                index,
                expected
            )));
        }
        if start_seconds <= prev_start {
            return Err(UtdragError::Transcript(format!(
                "line {}: start time {} does not increase",
                line_no + 1,
                start_seconds
            )));
        }
        if end_seconds < start_seconds {
            return Err(UtdragError::Transcript(format!(
                "line {}: end time {} before start time {}",
                line_no + 1,
                end_seconds,
                start_seconds
            )));
        }

        prev_start = start_seconds;
        segments.push(TranscriptSegment::new(
            index,
            start_seconds,
            end_seconds,
            captures[4].trim().to_string(),
        ));
    }

    if segments.is_empty() {
        return Err(UtdragError::Transcript(
            "artifact contains no segments".to_string(),
        ));
    }

    Ok(Transcript::new(episode_id.to_string(), segments))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_and_parse_round_trip() {
        let transcript = Transcript::new(
            "ep1".to_string(),
            vec![
                TranscriptSegment::new(1, 0.0, 5.2, "Hello world.".to_string()),
                TranscriptSegment::new(2, 5.2, 11.75, "This is a test.".to_string()),
            ],
        );

        let rendered = render_artifact(&transcript);
        assert!(rendered.starts_with("Segment 1: 0-5.2: Hello world.\n"));

        let parsed = parse_artifact("ep1", &rendered).unwrap();
        assert_eq!(parsed.segments.len(), 2);
        assert_eq!(parsed.segments[1].index, 2);
        assert_eq!(parsed.segments[1].start_seconds, 5.2);
        assert_eq!(parsed.segments[1].text, "This is a test.");
    }

    #[test]
    fn test_parse_rejects_malformed_line() {
        let err = parse_artifact("ep1", "Segment one: 0-5: text").unwrap_err();
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn test_parse_rejects_index_gap() {
        let content = "Segment 1: 0-5: a\nSegment 3: 5.5-10: b\n";
        let err = parse_artifact("ep1", content).unwrap_err();
        assert!(err.to_string().contains("out of order"));
    }

    #[test]
    fn test_parse_rejects_non_increasing_start() {
        let content = "Segment 1: 10-15: a\nSegment 2: 5-20: b\n";
        let err = parse_artifact("ep1", content).unwrap_err();
        assert!(err.to_string().contains("does not increase"));
    }

    #[test]
    fn test_parse_rejects_end_before_start() {
        let content = "Segment 1: 10-5: a\n";
        let err = parse_artifact("ep1", content).unwrap_err();
        assert!(err.to_string().contains("before start"));
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert!(parse_artifact("ep1", "").is_err());
    }

    #[test]
    fn test_parse_accepts_decimal_and_integer_seconds() {
        let content = "Segment 1: 0.0-13.5: first\nSegment 2: 14-27: second\n";
        let parsed = parse_artifact("ep1", content).unwrap();
        assert_eq!(parsed.segments[0].end_seconds, 13.5);
        assert_eq!(parsed.segments[1].end_seconds, 27.0);
    }
}
