//! Relevance selection: driving the oracle and normalizing its answers.
//!
//! The oracle replies with free text. Nothing in it is trusted: tokens that
//! are not non-negative integers are noise, indices outside the block are
//! dropped, duplicates collapse, and only sufficiently long consecutive runs
//! survive. Normalization is a pure function of the reply and the block's
//! index range.

use crate::error::Result;
use crate::oracle::{Classification, RelevanceOracle};
use crate::transcript::Block;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// A maximal run of consecutive transcript-segment indices accepted as one
/// relevant excerpt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionRun {
    /// Strictly consecutive segment indices, ascending.
    pub indices: Vec<u32>,
}

impl ExtractionRun {
    /// First segment index of the run.
    pub fn first_index(&self) -> u32 {
        self.indices[0]
    }

    /// Last segment index of the run.
    pub fn last_index(&self) -> u32 {
        self.indices[self.indices.len() - 1]
    }

    /// Number of segments in the run.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Runs are never empty; kept for iterator ergonomics.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Parse the oracle's reply into integer tokens.
///
/// Splits on commas and keeps only tokens that parse as non-negative
/// integers; prose, stray whitespace, and anything else is discarded
/// silently.
pub fn parse_selection(raw: &str) -> Vec<u32> {
    raw.split(',')
        .filter_map(|token| token.trim().parse::<u32>().ok())
        .collect()
}

/// Normalize parsed indices into accepted extraction runs.
///
/// A reply of exactly `[0]` (or nothing parseable) is the explicit "nothing
/// relevant" sentinel. Indices outside `[first_index, last_index]` are
/// dropped, the rest deduplicated and sorted, then partitioned into maximal
/// consecutive runs. Runs shorter than `min_len` or longer than `max_len`
/// are discarded whole, never truncated.
pub fn extraction_runs(
    parsed: &[u32],
    first_index: u32,
    last_index: u32,
    min_len: usize,
    max_len: usize,
) -> Vec<ExtractionRun> {
    if matches!(parsed, [] | [0]) {
        return Vec::new();
    }

    let in_range: BTreeSet<u32> = parsed
        .iter()
        .copied()
        .filter(|&i| i >= first_index && i <= last_index)
        .collect();

    let mut runs = Vec::new();
    let mut current: Vec<u32> = Vec::new();

    for index in in_range {
        match current.last() {
            Some(&prev) if index == prev + 1 => current.push(index),
            Some(_) => {
                runs.push(std::mem::take(&mut current));
                current.push(index);
            }
            None => current.push(index),
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }

    runs.into_iter()
        .filter(|run| run.len() >= min_len && run.len() <= max_len)
        .map(|indices| ExtractionRun { indices })
        .collect()
}

/// Drives the relevance oracle per block and validates its output.
pub struct RelevanceSelector {
    oracle: Arc<dyn RelevanceOracle>,
    min_run_segments: usize,
    max_run_segments: usize,
}

impl RelevanceSelector {
    /// Create a selector with run-length bounds.
    pub fn new(
        oracle: Arc<dyn RelevanceOracle>,
        min_run_segments: usize,
        max_run_segments: usize,
    ) -> Self {
        Self {
            oracle,
            min_run_segments,
            max_run_segments,
        }
    }

    /// Select extraction runs for one block.
    ///
    /// Returns zero or more runs in ascending order of their first index;
    /// empty means "nothing relevant in this block" and is a normal
    /// outcome. Only oracle transport failures propagate.
    #[instrument(skip_all, fields(first = block.first_index(), last = block.last_index()))]
    pub async fn select(
        &self,
        block: &Block<'_>,
        classification: &Classification,
    ) -> Result<Vec<ExtractionRun>> {
        let raw = self
            .oracle
            .rank(
                &block.prompt_text(),
                &classification.topic,
                classification.format,
            )
            .await?;

        let parsed = parse_selection(&raw);
        if parsed.is_empty() && raw.trim() != "0" {
            // Malformed reply; treated as "nothing relevant", not an error.
            warn!(
                "Oracle reply had no parseable segment numbers: {}",
                &raw[..raw.len().min(200)]
            );
        }

        let runs = extraction_runs(
            &parsed,
            block.first_index(),
            block.last_index(),
            self.min_run_segments,
            self.max_run_segments,
        );

        debug!(
            "Accepted {} run(s) from {} parsed index(es)",
            runs.len(),
            parsed.len()
        );
        Ok(runs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UtdragError;
    use crate::oracle::EpisodeFormat;
    use crate::transcript::{Transcript, TranscriptSegment};
    use async_trait::async_trait;

    fn runs(parsed: &[u32], first: u32, last: u32) -> Vec<ExtractionRun> {
        extraction_runs(parsed, first, last, 3, 11)
    }

    fn indices(runs: &[ExtractionRun]) -> Vec<Vec<u32>> {
        runs.iter().map(|r| r.indices.clone()).collect()
    }

    #[test]
    fn test_parse_selection_clean() {
        assert_eq!(parse_selection("5,6,7"), vec![5, 6, 7]);
        assert_eq!(parse_selection("12, 13 ,14"), vec![12, 13, 14]);
    }

    #[test]
    fn test_parse_selection_discards_noise() {
        // "are: 4" and "6." fail to parse and are dropped; "5" survives.
        assert_eq!(
            parse_selection("The relevant segments are: 4,5,6."),
            vec![5]
        );
        assert_eq!(parse_selection("none found"), Vec::<u32>::new());
        assert_eq!(parse_selection(""), Vec::<u32>::new());
    }

    #[test]
    fn test_sentinel_zero_yields_no_runs() {
        assert!(runs(&[0], 1, 25).is_empty());
        assert!(runs(&[], 1, 25).is_empty());
    }

    #[test]
    fn test_zero_among_real_indices_is_filtered() {
        assert_eq!(indices(&runs(&[0, 5, 6, 7], 1, 25)), vec![vec![5, 6, 7]]);
    }

    #[test]
    fn test_gap_breaks_contiguity() {
        assert_eq!(
            indices(&runs(&[5, 6, 7, 9, 10, 11], 1, 25)),
            vec![vec![5, 6, 7], vec![9, 10, 11]]
        );
    }

    #[test]
    fn test_out_of_range_discarded() {
        // Block range [11, 14]: 99 is dropped, remaining run meets the minimum.
        assert_eq!(
            indices(&runs(&[12, 13, 14, 99], 11, 14)),
            vec![vec![12, 13, 14]]
        );
    }

    #[test]
    fn test_short_runs_discarded() {
        assert!(runs(&[5], 1, 25).is_empty());
        assert!(runs(&[5, 6], 1, 25).is_empty());
        assert_eq!(indices(&runs(&[5, 6, 7], 1, 25)), vec![vec![5, 6, 7]]);
    }

    #[test]
    fn test_overlong_run_discarded_not_truncated() {
        let twelve: Vec<u32> = (5..17).collect();
        assert!(runs(&twelve, 1, 25).is_empty());

        let eleven: Vec<u32> = (5..16).collect();
        assert_eq!(runs(&eleven, 1, 25).len(), 1);
    }

    #[test]
    fn test_duplicates_collapse() {
        assert_eq!(
            indices(&runs(&[4, 4, 5, 5, 6], 1, 25)),
            vec![vec![4, 5, 6]]
        );
    }

    #[test]
    fn test_unordered_input_is_sorted() {
        assert_eq!(indices(&runs(&[7, 5, 6], 1, 25)), vec![vec![5, 6, 7]]);
    }

    #[test]
    fn test_runs_ascend_by_first_index() {
        let result = runs(&[20, 21, 22, 3, 4, 5], 1, 25);
        assert_eq!(result[0].first_index(), 3);
        assert_eq!(result[1].first_index(), 20);
    }

    struct CannedOracle {
        reply: String,
    }

    #[async_trait]
    impl RelevanceOracle for CannedOracle {
        async fn rank(&self, _: &str, _: &str, _: EpisodeFormat) -> Result<String> {
            Ok(self.reply.clone())
        }
    }

    struct FailingOracle;

    #[async_trait]
    impl RelevanceOracle for FailingOracle {
        async fn rank(&self, _: &str, _: &str, _: EpisodeFormat) -> Result<String> {
            Err(UtdragError::OracleUnavailable("connection reset".into()))
        }
    }

    fn block_transcript() -> Transcript {
        let segments = (1..=8)
            .map(|i| {
                let start = (i - 1) as f64 * 10.0;
                TranscriptSegment::new(i, start, start + 10.0, format!("text {}", i))
            })
            .collect();
        Transcript::new("ep".to_string(), segments)
    }

    #[tokio::test]
    async fn test_select_normalizes_oracle_reply() {
        let transcript = block_transcript();
        let block = transcript.blocks(8).next().unwrap();
        let selector = RelevanceSelector::new(
            Arc::new(CannedOracle {
                reply: "2,3,4,7".to_string(),
            }),
            3,
            11,
        );

        let runs = selector
            .select(&block, &Classification::unknown())
            .await
            .unwrap();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].indices, vec![2, 3, 4]);
    }

    #[tokio::test]
    async fn test_select_malformed_reply_is_empty_not_error() {
        let transcript = block_transcript();
        let block = transcript.blocks(8).next().unwrap();
        let selector = RelevanceSelector::new(
            Arc::new(CannedOracle {
                reply: "I found nothing of note in this block.".to_string(),
            }),
            3,
            11,
        );

        let runs = selector
            .select(&block, &Classification::unknown())
            .await
            .unwrap();
        assert!(runs.is_empty());
    }

    #[tokio::test]
    async fn test_select_propagates_oracle_failure() {
        let transcript = block_transcript();
        let block = transcript.blocks(8).next().unwrap();
        let selector = RelevanceSelector::new(Arc::new(FailingOracle), 3, 11);

        let result = selector.select(&block, &Classification::unknown()).await;
        assert!(matches!(result, Err(UtdragError::OracleUnavailable(_))));
    }
}
