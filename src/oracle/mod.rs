//! Oracle interfaces for classification and relevance ranking.
//!
//! Both calls are external, non-deterministic LLM calls. They sit behind
//! narrow traits so the deterministic parsing and assembly logic can be
//! exercised with synthetic responses.

mod chat;

pub use chat::ChatOracle;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Coarse episode format, as judged by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EpisodeFormat {
    /// Single speaker.
    Solo,
    /// Host and guest(s).
    Interview,
    /// Conference talk or lecture.
    Talk,
    /// Classifier could not tell.
    Unknown,
}

impl EpisodeFormat {
    /// Parse leniently; anything unrecognized is the unknown sentinel.
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "solo" => EpisodeFormat::Solo,
            "interview" => EpisodeFormat::Interview,
            "talk" => EpisodeFormat::Talk,
            _ => EpisodeFormat::Unknown,
        }
    }
}

impl std::fmt::Display for EpisodeFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EpisodeFormat::Solo => write!(f, "solo"),
            EpisodeFormat::Interview => write!(f, "interview"),
            EpisodeFormat::Talk => write!(f, "talk"),
            EpisodeFormat::Unknown => write!(f, "unknown"),
        }
    }
}

/// Result of classifying an episode excerpt.
#[derive(Debug, Clone)]
pub struct Classification {
    /// Episode format label.
    pub format: EpisodeFormat,
    /// Episode topic, ideally at most five words.
    pub topic: String,
}

impl Classification {
    /// Sentinel classification used when the classifier answer is unusable.
    pub fn unknown() -> Self {
        Self {
            format: EpisodeFormat::Unknown,
            topic: "unknown".to_string(),
        }
    }
}

/// Trait for format/topic classification.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classify a transcript excerpt into a format label and topic.
    async fn classify(&self, excerpt: &str) -> Result<Classification>;
}

/// Trait for the relevance-ranking oracle.
#[async_trait]
pub trait RelevanceOracle: Send + Sync {
    /// Rank a transcript block against the episode topic and format.
    ///
    /// Returns the oracle's raw free-text answer; per contract it should be
    /// a comma-separated list of segment numbers, `0` meaning "nothing
    /// relevant", but nothing about the reply is trusted as-is.
    async fn rank(&self, block_text: &str, topic: &str, format: EpisodeFormat) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lenient_formats() {
        assert_eq!(EpisodeFormat::parse_lenient("solo"), EpisodeFormat::Solo);
        assert_eq!(
            EpisodeFormat::parse_lenient(" Interview "),
            EpisodeFormat::Interview
        );
        assert_eq!(EpisodeFormat::parse_lenient("TALK"), EpisodeFormat::Talk);
        assert_eq!(
            EpisodeFormat::parse_lenient("roundtable"),
            EpisodeFormat::Unknown
        );
        assert_eq!(EpisodeFormat::parse_lenient(""), EpisodeFormat::Unknown);
    }

    #[test]
    fn test_format_display() {
        assert_eq!(EpisodeFormat::Solo.to_string(), "solo");
        assert_eq!(EpisodeFormat::Unknown.to_string(), "unknown");
    }
}
