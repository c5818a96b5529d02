//! Sample producer: measures machine metrics once per interval and appends
//! one log line per sample.
//!
//! The sampler is the only writer of the log file; the gauge and chart
//! viewers read it concurrently. Appends are line-buffered single writes, and
//! readers already reject a torn final line, so no cross-process locking is
//! needed. On first run the file is created with a short human-readable
//! preamble, which readers reject as non-matching lines.

use crate::error::{Result, StatscopeError};
use crate::record::{self, TelemetryRecord};
use chrono::{Local, NaiveDateTime, Timelike};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;
use std::time::Duration;
use sysinfo::{Components, Disks, System};

/// Cadence of the append loop.
pub const SAMPLE_INTERVAL: Duration = Duration::from_secs(1);

/// Preamble written when the log file is first created.
const PREAMBLE: &str = "System Stats Log\nTime - CPU - Temps - Memory - Disk\n";

/// Collects cpu/memory/disk/temperature samples via `sysinfo`.
pub struct Sampler {
    sys: System,
    disks: Disks,
    components: Components,
}

impl Sampler {
    /// Initializes system probes. The first CPU reading needs two refreshes
    /// spaced apart; the initial refresh here primes it so the first sampled
    /// value is meaningful.
    #[must_use]
    pub fn new() -> Self {
        let mut sys = System::new_all();
        sys.refresh_cpu_usage();
        let disks = Disks::new_with_refreshed_list();
        let components = Components::new_with_refreshed_list();
        Self { sys, disks, components }
    }

    /// Takes one sample of all metrics at the current local time.
    pub fn sample(&mut self) -> TelemetryRecord {
        self.sys.refresh_cpu_usage();
        self.sys.refresh_memory();
        self.disks.refresh(true);
        self.components.refresh(true);

        TelemetryRecord {
            timestamp: now_seconds(),
            cpu: f64::from(self.sys.global_cpu_usage()),
            memory: self.memory_percent(),
            disk: self.disk_percent(),
            temperatures: self.temperatures(),
        }
    }

    fn memory_percent(&self) -> f64 {
        let total = self.sys.total_memory();
        if total == 0 {
            return 0.0;
        }
        self.sys.used_memory() as f64 / total as f64 * 100.0
    }

    /// Usage of the root filesystem, falling back to the first listed disk.
    fn disk_percent(&self) -> f64 {
        let disk = self
            .disks
            .iter()
            .find(|d| d.mount_point() == Path::new("/"))
            .or_else(|| self.disks.iter().next());

        let Some(disk) = disk else {
            return 0.0;
        };
        let total = disk.total_space();
        if total == 0 {
            return 0.0;
        }
        let used = total.saturating_sub(disk.available_space());
        used as f64 / total as f64 * 100.0
    }

    fn temperatures(&self) -> BTreeMap<String, f64> {
        let mut temps = BTreeMap::new();
        for comp in &self.components {
            let Some(temp) = comp.temperature() else {
                log::debug!("no reading from sensor '{}'", comp.label());
                continue;
            };
            if !temp.is_finite() {
                continue;
            }
            let label = sanitize_label(comp.label());
            // An empty label would not survive the line grammar.
            if label.is_empty() {
                continue;
            }
            temps.insert(label, f64::from(temp));
        }
        temps
    }
}

impl Default for Sampler {
    fn default() -> Self {
        Self::new()
    }
}

/// Local time truncated to whole seconds, matching the log grammar.
fn now_seconds() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

/// Replaces characters that would break the line grammar. Labels end up
/// between a brace and a colon in the map literal, so commas and braces
/// cannot pass through.
fn sanitize_label(label: &str) -> String {
    label
        .chars()
        .map(|c| if matches!(c, ',' | '{' | '}') { ' ' } else { c })
        .collect::<String>()
        .trim()
        .to_string()
}

/// Appends one record to the log file, creating it (with the preamble) on
/// first use.
///
/// # Errors
///
/// Returns [`StatscopeError::LogAppend`] if the file cannot be opened or
/// written.
pub fn append_record(path: &Path, record: &TelemetryRecord) -> Result<()> {
    let wrap = |source: std::io::Error| StatscopeError::LogAppend {
        path: path.display().to_string(),
        source,
    };

    let fresh = !path.exists();
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(wrap)?;

    if fresh {
        file.write_all(PREAMBLE.as_bytes()).map_err(wrap)?;
    }

    let mut line = record::format_line(record);
    line.push('\n');
    file.write_all(line.as_bytes()).map_err(wrap)?;
    Ok(())
}

/// Runs the append loop until the process is terminated.
///
/// # Errors
///
/// Returns an error if an append fails.
pub fn run(log_file: &Path, interval: Duration) -> Result<()> {
    let mut sampler = Sampler::new();
    log::info!("sampling every {:?} into {}", interval, log_file.display());

    loop {
        let sample = sampler.sample();
        append_record(log_file, &sample)?;
        log::info!("{}", record::format_line(&sample));
        std::thread::sleep(interval);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::Store;

    #[test]
    fn test_sample_values_in_range() {
        let mut sampler = Sampler::new();
        let record = sampler.sample();

        assert!((0.0..=100.0).contains(&record.memory));
        assert!((0.0..=100.0).contains(&record.disk));
        assert!(record.cpu >= 0.0);
        for value in record.temperatures.values() {
            assert!(value.is_finite());
        }
    }

    #[test]
    fn test_sampled_record_round_trips() {
        let mut sampler = Sampler::new();
        let record = sampler.sample();

        let parsed = record::parse_line(&record::format_line(&record))
            .expect("sampled record should match the grammar");
        assert_eq!(parsed.timestamp, record.timestamp);
        assert_eq!(
            parsed.temperatures.keys().collect::<Vec<_>>(),
            record.temperatures.keys().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_append_creates_preamble_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("system_stats.log");

        let mut sampler = Sampler::new();
        append_record(&path, &sampler.sample()).unwrap();
        append_record(&path, &sampler.sample()).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.matches("System Stats Log").count(), 1);

        // Readers skip the preamble and see both records.
        let series = Store::new(&path).load().unwrap();
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn test_sanitize_label() {
        assert_eq!(sanitize_label("Core 0"), "Core 0");
        assert_eq!(sanitize_label("weird, sensor"), "weird  sensor");
        assert_eq!(sanitize_label("{brace}"), "brace");
    }

    #[test]
    fn test_now_seconds_has_no_subseconds() {
        use chrono::Timelike;
        assert_eq!(now_seconds().nanosecond(), 0);
    }
}
