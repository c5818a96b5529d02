//! Viewer settings: which gauges to show, display colors, log location.
//!
//! YAML file under the user config directory, read once at process start.
//! Missing or invalid settings silently fall back to defaults — a broken
//! settings file should never keep a dashboard from opening.

use crate::aggregate::Metric;
use crate::error::{Result, StatscopeError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default log file name, shared by the sampler and both viewers.
pub const DEFAULT_LOG_FILE: &str = "system_stats.log";

/// Per-metric gauge toggles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricToggles {
    /// Show the CPU gauge.
    #[serde(default = "default_enabled")]
    pub cpu: bool,
    /// Show the memory gauge.
    #[serde(default = "default_enabled")]
    pub memory: bool,
    /// Show the disk gauge.
    #[serde(default = "default_enabled")]
    pub disk: bool,
    /// Show the aggregate temperature gauge.
    #[serde(default = "default_enabled")]
    pub temp: bool,
}

fn default_enabled() -> bool {
    true
}

impl Default for MetricToggles {
    fn default() -> Self {
        Self { cpu: true, memory: true, disk: true, temp: true }
    }
}

impl MetricToggles {
    /// Whether the given metric's gauge is enabled.
    #[must_use]
    pub fn enabled(&self, metric: Metric) -> bool {
        match metric {
            Metric::Cpu => self.cpu,
            Metric::Memory => self.memory,
            Metric::Disk => self.disk,
            Metric::Temperature => self.temp,
        }
    }
}

/// Display colors, `#RRGGBB`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Palette {
    /// Background color.
    #[serde(default = "default_bg")]
    pub bg: String,
    /// Foreground color.
    #[serde(default = "default_fg")]
    pub fg: String,
}

fn default_bg() -> String {
    "#000000".to_string()
}
fn default_fg() -> String {
    "#FFFFFF".to_string()
}

impl Default for Palette {
    fn default() -> Self {
        Self { bg: default_bg(), fg: default_fg() }
    }
}

/// Viewer settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Which gauges to show.
    #[serde(default)]
    pub metrics: MetricToggles,

    /// Display theme.
    #[serde(default)]
    pub colors: Palette,

    /// Log file location; relative paths resolve against the working
    /// directory, matching the sampler's default.
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
}

fn default_log_file() -> PathBuf {
    PathBuf::from(DEFAULT_LOG_FILE)
}

impl Settings {
    /// Creates settings with default values.
    #[must_use]
    pub fn new() -> Self {
        Self { metrics: MetricToggles::default(), colors: Palette::default(), log_file: default_log_file() }
    }

    /// Conventional settings path: `<config dir>/statscope/config.yaml`.
    #[must_use]
    pub fn default_path() -> PathBuf {
        dirs::config_dir().map(|p| p.join("statscope/config.yaml")).unwrap_or_default()
    }

    /// Loads settings from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .map_err(|_| StatscopeError::SettingsNotFound(path.display().to_string()))?;

        Self::parse(&content)
    }

    /// Parses settings from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error with line number if parsing fails.
    pub fn parse(yaml: &str) -> Result<Self> {
        serde_yaml_ng::from_str(yaml).map_err(|e| {
            let line = e.location().map(|l| l.line()).unwrap_or(0);
            StatscopeError::SettingsParse { line, message: e.to_string() }
        })
    }

    /// Loads settings with silent fallback to defaults.
    #[must_use]
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// The metrics whose gauges are enabled, in display order.
    #[must_use]
    pub fn enabled_metrics(&self) -> Vec<Metric> {
        crate::aggregate::ALL_METRICS
            .into_iter()
            .filter(|m| self.metrics.enabled(*m))
            .collect()
    }
}
