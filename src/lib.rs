//! Utdrag - Podcast Audio Digests
//!
//! A CLI tool that turns a full podcast episode into a short audio digest:
//! the most relevant passages, cut from the original audio and concatenated
//! with an optional intro and separator.
//!
//! The name "Utdrag" comes from the Norwegian word for "excerpt."
//!
//! # Overview
//!
//! Utdrag allows you to:
//! - Transcribe a podcast episode into time-stamped, indexed segments
//! - Classify the episode's format and topic with an LLM
//! - Ask an LLM oracle, block by block, which segments matter
//! - Cut the accepted passages and assemble them into one MP3 digest
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration and prompt templates
//! - `transcript` - Indexed transcript model and artifact format
//! - `transcription` - Speech-to-text transcription
//! - `oracle` - LLM classification and relevance-ranking interfaces
//! - `summary` - Block planning, selection normalization, timeline assembly
//! - `audio` - ffmpeg/ffprobe wrappers for cutting and concatenation
//! - `orchestrator` - Pipeline coordination
//!
//! # Example
//!
//! ```rust,no_run
//! use utdrag::config::Settings;
//! use utdrag::orchestrator::{Orchestrator, SummaryRequest};
//! use utdrag::summary::LengthPreset;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let orchestrator = Orchestrator::new(settings)?;
//!
//!     let result = orchestrator
//!         .run(SummaryRequest {
//!             episode: "episode.mp3".into(),
//!             output: "episode_digest.mp3".into(),
//!             intro: None,
//!             separator: None,
//!             preset: LengthPreset::Middle,
//!             fade: true,
//!             transcript: None,
//!             keep_session_files: false,
//!         })
//!         .await?;
//!
//!     match result.output_path {
//!         Some(path) => println!("Digest at {}", path.display()),
//!         None => println!("No relevant segments found"),
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod audio;
pub mod cli;
pub mod config;
pub mod error;
pub mod openai;
pub mod oracle;
pub mod orchestrator;
pub mod summary;
pub mod transcript;
pub mod transcription;

pub use error::{Result, UtdragError};
