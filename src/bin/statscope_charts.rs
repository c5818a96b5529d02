//! statscope-charts - time-series chart dashboard over the telemetry log.

use statscope::charts::ChartApp;
use statscope::settings::Settings;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let settings = Settings::load_or_default(Settings::default_path());
    ChartApp::new(settings).run()?;
    Ok(())
}
