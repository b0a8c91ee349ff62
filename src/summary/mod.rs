//! Segment selection and timeline reconstruction.
//!
//! The deterministic heart of the digest pipeline: block sizing arithmetic
//! ([`planner`]), normalization of oracle answers into contiguous extraction
//! runs ([`selector`]), and assembly of the ordered clip timeline
//! ([`timeline`]). Everything here is a pure function of its inputs apart
//! from the selector's single oracle call.

pub mod planner;
pub mod selector;
pub mod timeline;

pub use planner::{plan_block_size, LengthPreset};
pub use selector::{ExtractionRun, RelevanceSelector};
pub use timeline::{build_timeline, ClipRole, ClipSource, TimelineEntry};
