//! Doctor command implementation.

use crate::cli::preflight::check_tool;
use crate::cli::Output;
use crate::config::Settings;
use crate::openai::is_api_key_configured;
use anyhow::Result;

/// Run the doctor command: report on tools, keys, and configuration.
pub fn run_doctor(settings: &Settings) -> Result<()> {
    Output::header("System check");

    let mut problems = 0;

    for tool in ["ffmpeg", "ffprobe"] {
        match check_tool(tool) {
            Ok(()) => Output::kv(tool, "ok"),
            Err(e) => {
                Output::kv(tool, "missing");
                Output::warning(&format!("{}", e));
                problems += 1;
            }
        }
    }

    if is_api_key_configured() {
        Output::kv("OPENAI_API_KEY", "set");
    } else {
        Output::kv("OPENAI_API_KEY", "not set");
        Output::warning("Set it with: export OPENAI_API_KEY='sk-...'");
        problems += 1;
    }

    Output::header("Configuration");
    let config_path = Settings::default_config_path();
    Output::kv(
        "Config file",
        &format!(
            "{} ({})",
            config_path.display(),
            if config_path.exists() {
                "exists"
            } else {
                "using defaults"
            }
        ),
    );
    Output::kv("Temp dir", &settings.temp_dir().display().to_string());
    Output::kv("Oracle model", &settings.oracle.model);
    Output::kv("Whisper model", &settings.transcription.model);
    Output::kv("Default length", &settings.summary.default_length);

    println!();
    if problems == 0 {
        Output::success("All checks passed.");
    } else {
        Output::warning(&format!("{} problem(s) found.", problems));
    }

    Ok(())
}
