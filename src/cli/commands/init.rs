//! Init command implementation.

use crate::cli::Output;
use crate::config::Settings;
use anyhow::Result;

/// Run the init command: write a default config file and prepare
/// directories.
pub fn run_init(settings: &Settings) -> Result<()> {
    let config_path = Settings::default_config_path();

    if config_path.exists() {
        Output::info(&format!(
            "Configuration already exists at {}",
            config_path.display()
        ));
    } else {
        settings.save()?;
        Output::success(&format!(
            "Wrote default configuration to {}",
            config_path.display()
        ));
    }

    std::fs::create_dir_all(settings.temp_dir())?;
    Output::success(&format!(
        "Temp directory ready at {}",
        settings.temp_dir().display()
    ));

    Output::info("Run 'utdrag doctor' to verify system requirements.");
    Ok(())
}
