//! Block sizing for oracle queries.
//!
//! The digest's total duration is a roughly constant fraction of the
//! episode, keyed by the length preset. Block size controls how many oracle
//! calls cover the whole transcript at that target density: smaller blocks
//! mean more, finer-grained oracle decisions at higher API cost and latency.

use crate::error::{Result, UtdragError};
use serde::{Deserialize, Serialize};

/// Assumed average duration of one transcript segment, in seconds.
pub const AVERAGE_SEGMENT_SECONDS: f64 = 13.5;

/// Target summary length, as a fraction of the episode duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthPreset {
    /// 1/20 of the episode.
    Short,
    /// 1/10 of the episode.
    Middle,
    /// 1/5 of the episode.
    Long,
}

impl LengthPreset {
    /// Divisor applied to the episode duration to get the target summary
    /// duration.
    pub fn divisor(&self) -> f64 {
        match self {
            LengthPreset::Short => 20.0,
            LengthPreset::Middle => 10.0,
            LengthPreset::Long => 5.0,
        }
    }
}

impl std::str::FromStr for LengthPreset {
    type Err = UtdragError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "short" => Ok(LengthPreset::Short),
            "middle" => Ok(LengthPreset::Middle),
            "long" => Ok(LengthPreset::Long),
            other => Err(UtdragError::InvalidPreset(other.to_string())),
        }
    }
}

impl std::fmt::Display for LengthPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LengthPreset::Short => write!(f, "short"),
            LengthPreset::Middle => write!(f, "middle"),
            LengthPreset::Long => write!(f, "long"),
        }
    }
}

/// Compute how many transcript segments to submit per oracle call.
///
/// `target summary duration = episode duration / preset divisor`; dividing
/// that by the average segment duration gives the number of oracle calls
/// needed to cover the transcript, and the block size follows from the
/// segment count. Clamped to at least 1.
pub fn plan_block_size(
    total_duration_seconds: f64,
    total_segment_count: usize,
    preset: LengthPreset,
) -> Result<usize> {
    if !total_duration_seconds.is_finite() || total_duration_seconds <= 0.0 {
        return Err(UtdragError::InvalidDuration(format!(
            "episode duration must be positive, got {}",
            total_duration_seconds
        )));
    }
    if total_segment_count == 0 {
        return Err(UtdragError::InvalidDuration(
            "transcript contains no segments".to_string(),
        ));
    }

    let target_summary_seconds = total_duration_seconds / preset.divisor();
    let needed_oracle_calls = target_summary_seconds / AVERAGE_SEGMENT_SECONDS;
    let block_size = (total_segment_count as f64 / needed_oracle_calls).round();

    Ok((block_size as usize).max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_middle_preset_reference_values() {
        // 3600s episode, 266 segments: target 360s, ~26.67 calls, block 10.
        assert_eq!(plan_block_size(3600.0, 266, LengthPreset::Middle).unwrap(), 10);
    }

    #[test]
    fn test_short_and_long_presets() {
        assert_eq!(plan_block_size(3600.0, 266, LengthPreset::Short).unwrap(), 20);
        assert_eq!(plan_block_size(3600.0, 266, LengthPreset::Long).unwrap(), 5);
    }

    #[test]
    fn test_block_size_clamped_to_one() {
        // Tiny episode with few segments rounds down to zero without the clamp.
        assert_eq!(plan_block_size(600.0, 2, LengthPreset::Long).unwrap(), 1);
    }

    #[test]
    fn test_invalid_duration() {
        assert!(matches!(
            plan_block_size(0.0, 100, LengthPreset::Middle),
            Err(UtdragError::InvalidDuration(_))
        ));
        assert!(matches!(
            plan_block_size(-3.0, 100, LengthPreset::Middle),
            Err(UtdragError::InvalidDuration(_))
        ));
        assert!(matches!(
            plan_block_size(f64::NAN, 100, LengthPreset::Middle),
            Err(UtdragError::InvalidDuration(_))
        ));
    }

    #[test]
    fn test_zero_segments() {
        assert!(matches!(
            plan_block_size(3600.0, 0, LengthPreset::Middle),
            Err(UtdragError::InvalidDuration(_))
        ));
    }

    #[test]
    fn test_preset_parsing() {
        assert_eq!("short".parse::<LengthPreset>().unwrap(), LengthPreset::Short);
        assert_eq!("Middle".parse::<LengthPreset>().unwrap(), LengthPreset::Middle);
        assert_eq!("LONG".parse::<LengthPreset>().unwrap(), LengthPreset::Long);
        assert!(matches!(
            "tiny".parse::<LengthPreset>(),
            Err(UtdragError::InvalidPreset(_))
        ));
    }
}
