//! CLI command implementations.

mod config;
mod doctor;
mod init;
mod summarize;
mod transcribe;

pub use config::run_config;
pub use doctor::run_doctor;
pub use init::run_init;
pub use summarize::{run_summarize, SummarizeArgs};
pub use transcribe::run_transcribe;
