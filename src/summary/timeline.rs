//! Clip timeline assembly.
//!
//! Maps accepted extraction runs to time ranges in the episode audio and
//! produces the ordered clip sequence handed to the assembly collaborator:
//! `[Intro?] [Segment] ([Separator] [Segment])*`.

use super::selector::ExtractionRun;
use crate::error::{Result, UtdragError};
use crate::transcript::Transcript;
use std::path::{Path, PathBuf};

/// Role of a clip in the final digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipRole {
    Intro,
    Separator,
    Segment,
}

/// What a timeline entry points at.
#[derive(Debug, Clone, PartialEq)]
pub enum ClipSource {
    /// A whole clip file (intro, separator).
    File(PathBuf),
    /// A time range within the episode audio.
    Excerpt {
        start_seconds: f64,
        end_seconds: f64,
    },
}

/// One clip in the final ordered sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineEntry {
    pub role: ClipRole,
    pub source: ClipSource,
    /// Half-second fade-in requested from the assembly collaborator.
    /// Annotation only; set on Segment entries when fades are enabled.
    pub fade_in: bool,
    /// Position in the final sequence.
    pub order: usize,
}

/// Build the ordered clip timeline from accepted runs.
///
/// Runs must arrive flattened in block order. Blocks are processed
/// sequentially in transcript order, so this coincides with time order
/// unless an oracle reorders within a block; call order is preserved either
/// way and no re-sort by time is performed.
///
/// Zero runs yield an empty timeline (or Intro alone): the "no relevant
/// segments found" outcome, which is valid and reportable, not an error.
pub fn build_timeline(
    runs_in_block_order: &[ExtractionRun],
    transcript: &Transcript,
    intro: Option<&Path>,
    separator: Option<&Path>,
    fade_enabled: bool,
) -> Result<Vec<TimelineEntry>> {
    let mut entries = Vec::new();

    if let Some(intro_path) = intro {
        entries.push(TimelineEntry {
            role: ClipRole::Intro,
            source: ClipSource::File(intro_path.to_path_buf()),
            fade_in: false,
            order: 0,
        });
    }

    let mut first_segment = true;
    for run in runs_in_block_order {
        let first = transcript.segment(run.first_index()).ok_or_else(|| {
            UtdragError::InvalidInput(format!(
                "run references unknown segment {}",
                run.first_index()
            ))
        })?;
        let last = transcript.segment(run.last_index()).ok_or_else(|| {
            UtdragError::InvalidInput(format!(
                "run references unknown segment {}",
                run.last_index()
            ))
        })?;

        if !first_segment {
            if let Some(separator_path) = separator {
                entries.push(TimelineEntry {
                    role: ClipRole::Separator,
                    source: ClipSource::File(separator_path.to_path_buf()),
                    fade_in: false,
                    order: 0,
                });
            }
        }
        first_segment = false;

        entries.push(TimelineEntry {
            role: ClipRole::Segment,
            source: ClipSource::Excerpt {
                start_seconds: first.start_seconds,
                end_seconds: last.end_seconds,
            },
            fade_in: fade_enabled,
            order: 0,
        });
    }

    for (order, entry) in entries.iter_mut().enumerate() {
        entry.order = order;
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::TranscriptSegment;

    fn transcript(n: u32) -> Transcript {
        let segments = (1..=n)
            .map(|i| {
                let start = (i - 1) as f64 * 10.0;
                TranscriptSegment::new(i, start, start + 10.0, format!("text {}", i))
            })
            .collect();
        Transcript::new("ep".to_string(), segments)
    }

    fn run(indices: &[u32]) -> ExtractionRun {
        ExtractionRun {
            indices: indices.to_vec(),
        }
    }

    fn roles(entries: &[TimelineEntry]) -> Vec<ClipRole> {
        entries.iter().map(|e| e.role).collect()
    }

    #[test]
    fn test_empty_runs_no_intro_is_empty() {
        let t = transcript(10);
        let entries = build_timeline(&[], &t, None, None, false).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_empty_runs_with_intro_is_intro_only() {
        let t = transcript(10);
        let intro = PathBuf::from("intro.mp3");
        let entries = build_timeline(&[], &t, Some(&intro), None, false).unwrap();
        assert_eq!(roles(&entries), vec![ClipRole::Intro]);
    }

    #[test]
    fn test_two_runs_full_ordering() {
        let t = transcript(20);
        let intro = PathBuf::from("intro.mp3");
        let separator = PathBuf::from("sep.mp3");
        let entries = build_timeline(
            &[run(&[2, 3, 4]), run(&[10, 11, 12])],
            &t,
            Some(&intro),
            Some(&separator),
            true,
        )
        .unwrap();

        assert_eq!(
            roles(&entries),
            vec![
                ClipRole::Intro,
                ClipRole::Segment,
                ClipRole::Separator,
                ClipRole::Segment
            ]
        );
        assert_eq!(
            entries.iter().map(|e| e.order).collect::<Vec<_>>(),
            vec![0, 1, 2, 3]
        );
        assert!(entries[1].fade_in && entries[3].fade_in);
        assert!(!entries[0].fade_in && !entries[2].fade_in);

        // Run [2,3,4] spans segment 2's start to segment 4's end.
        assert_eq!(
            entries[1].source,
            ClipSource::Excerpt {
                start_seconds: 10.0,
                end_seconds: 40.0
            }
        );
    }

    #[test]
    fn test_separator_never_leads_or_repeats() {
        let t = transcript(30);
        let separator = PathBuf::from("sep.mp3");
        let entries = build_timeline(
            &[run(&[1, 2, 3]), run(&[8, 9, 10]), run(&[20, 21, 22])],
            &t,
            None,
            Some(&separator),
            false,
        )
        .unwrap();

        assert_eq!(entries[0].role, ClipRole::Segment);
        for pair in entries.windows(2) {
            assert!(!(pair[0].role == ClipRole::Separator && pair[1].role == ClipRole::Separator));
        }
        assert_eq!(entries.last().unwrap().role, ClipRole::Segment);
    }

    #[test]
    fn test_no_separator_clip_means_no_separator_entries() {
        let t = transcript(20);
        let entries = build_timeline(
            &[run(&[1, 2, 3]), run(&[10, 11, 12])],
            &t,
            None,
            None,
            false,
        )
        .unwrap();
        assert_eq!(roles(&entries), vec![ClipRole::Segment, ClipRole::Segment]);
    }

    #[test]
    fn test_fade_disabled() {
        let t = transcript(10);
        let entries = build_timeline(&[run(&[1, 2, 3])], &t, None, None, false).unwrap();
        assert!(!entries[0].fade_in);
    }

    #[test]
    fn test_unknown_segment_is_an_error() {
        let t = transcript(5);
        let result = build_timeline(&[run(&[7, 8, 9])], &t, None, None, false);
        assert!(result.is_err());
    }
}
