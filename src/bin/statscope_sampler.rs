//! statscope-sampler - appends one telemetry record per second to the log.
//!
//! The log path comes from the shared settings file (first CLI argument
//! overrides it). Diagnostics go to stderr via `RUST_LOG`.

use statscope::sampler::{self, SAMPLE_INTERVAL};
use statscope::settings::Settings;
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = Settings::load_or_default(Settings::default_path());
    let log_file = std::env::args()
        .nth(1)
        .map_or(settings.log_file, PathBuf::from);

    sampler::run(&log_file, SAMPLE_INTERVAL)?;
    Ok(())
}
