//! statscope-gauges - analog gauge dashboard over the telemetry log.

use statscope::gauges::GaugeApp;
use statscope::settings::Settings;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let settings = Settings::load_or_default(Settings::default_path());
    GaugeApp::new(settings).run()?;
    Ok(())
}
