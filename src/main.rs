//! Utdrag CLI entry point.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use utdrag::cli::commands::{self, SummarizeArgs};
use utdrag::cli::{Cli, Commands};
use utdrag::config::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("utdrag={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Load configuration
    let settings = match &cli.config {
        Some(path) => Settings::load_from(Some(&std::path::PathBuf::from(path)))?,
        None => Settings::load()?,
    };

    // Ensure the temp directory exists
    std::fs::create_dir_all(settings.temp_dir())?;

    // Execute command
    match cli.command {
        Commands::Init => {
            commands::run_init(&settings)?;
        }

        Commands::Doctor => {
            commands::run_doctor(&settings)?;
        }

        Commands::Summarize {
            episode,
            output,
            intro,
            separator,
            length,
            transcript,
            no_fade,
            keep_session_files,
        } => {
            commands::run_summarize(
                SummarizeArgs {
                    episode,
                    output,
                    intro,
                    separator,
                    length,
                    transcript,
                    no_fade,
                    keep_session_files,
                },
                settings,
            )
            .await?;
        }

        Commands::Transcribe {
            input,
            output,
            language,
        } => {
            commands::run_transcribe(&input, output, language, settings).await?;
        }

        Commands::Config { action } => {
            commands::run_config(&action, settings)?;
        }
    }

    Ok(())
}
