//! CLI module for Utdrag.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Utdrag - Podcast Audio Digests
///
/// A CLI tool that cuts the most relevant passages out of a podcast episode
/// and concatenates them into a short audio digest. The name "Utdrag" comes
/// from the Norwegian word for "excerpt."
#[derive(Parser, Debug)]
#[command(name = "utdrag")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize Utdrag and verify system requirements
    Init,

    /// Check system requirements and configuration
    Doctor,

    /// Create an audio digest of a podcast episode
    Summarize {
        /// Episode audio file (MP3)
        episode: String,

        /// Output file for the digest (default: <episode>_digest.mp3)
        #[arg(short, long)]
        output: Option<String>,

        /// Intro clip prepended to the digest
        #[arg(long)]
        intro: Option<String>,

        /// Separator clip inserted between excerpts
        #[arg(long)]
        separator: Option<String>,

        /// Summary length preset (short, middle, long)
        #[arg(short, long)]
        length: Option<String>,

        /// Reuse an existing transcript artifact instead of transcribing
        #[arg(long)]
        transcript: Option<String>,

        /// Disable the fade-in on each excerpt
        #[arg(long)]
        no_fade: bool,

        /// Keep session files (clips, transcript) after the run
        #[arg(long)]
        keep_session_files: bool,
    },

    /// Transcribe an episode to a transcript artifact
    Transcribe {
        /// Episode audio file
        input: String,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<String>,

        /// Language hint for transcription (e.g. "en", "de")
        #[arg(short, long)]
        language: Option<String>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,
}
