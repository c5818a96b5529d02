//! Time-series store: whole-file reload and trailing-window queries.
//!
//! The series mirrors file-append order. Each [`Store::load`] re-reads and
//! re-parses the entire log; there is no cache and no incremental tail
//! reader. That is O(file) per refresh, which is fine at one sample per
//! second with bounded retention — it becomes the thing to fix first if
//! retention ever grows unbounded.

use crate::error::{Result, StatscopeError};
use crate::record::{self, TelemetryRecord};
use chrono::{Duration, NaiveDateTime};
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

/// File-backed source of the telemetry series.
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    /// Creates a store reading from the given log file.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing log file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the full series from the log file, in file order.
    ///
    /// Lines that fail to parse (the preamble, torn writes, corruption) are
    /// skipped silently. A missing file is not an error: the producer may not
    /// have started yet, so an empty series is returned and rendering defers.
    ///
    /// # Errors
    ///
    /// Returns [`StatscopeError::LogRead`] for I/O failures other than the
    /// file not existing.
    pub fn load(&self) -> Result<Vec<TelemetryRecord>> {
        let file = match std::fs::File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(StatscopeError::LogRead {
                    path: self.path.display().to_string(),
                    source,
                })
            }
        };

        let mut series = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = match line {
                Ok(line) => line,
                // A read error mid-file (e.g. invalid UTF-8) ends the pass;
                // everything parsed so far is still usable.
                Err(e) => {
                    log::warn!("stopped reading {}: {}", self.path.display(), e);
                    break;
                }
            };
            if let Some(rec) = record::parse_line(&line) {
                series.push(rec);
            }
        }
        Ok(series)
    }
}

/// Returns the trailing window: all records with `timestamp >= now - duration`.
///
/// The series is assumed chronological (it mirrors file-append order;
/// monotonicity is not verified), so the window is the contiguous suffix
/// found by a partition point on the cutoff. Empty if no record qualifies.
#[must_use]
pub fn window(
    series: &[TelemetryRecord],
    now: NaiveDateTime,
    duration: Duration,
) -> &[TelemetryRecord] {
    let cutoff = now - duration;
    let start = series.partition_point(|r| r.timestamp < cutoff);
    &series[start..]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::collections::BTreeMap;
    use std::io::Write;

    fn ts(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn rec(timestamp: NaiveDateTime, cpu: f64) -> TelemetryRecord {
        TelemetryRecord {
            timestamp,
            cpu,
            memory: 50.0,
            disk: 60.0,
            temperatures: BTreeMap::new(),
        }
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let store = Store::new("/nonexistent/system_stats.log");
        let series = store.load().unwrap();
        assert!(series.is_empty());
    }

    #[test]
    fn test_load_skips_preamble_and_torn_lines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "System Stats Log").unwrap();
        writeln!(file, "Time - CPU - Temps - Memory - Disk").unwrap();
        writeln!(
            file,
            "2024-05-01 10:00:00 - CPU: 10%, CPU Temps: {{}}, Memory: 40%, Disk: 70%"
        )
        .unwrap();
        writeln!(
            file,
            "2024-05-01 10:00:01 - CPU: 20%, CPU Temps: {{Core 0: 45.0}}, Memory: 41%, Disk: 70%"
        )
        .unwrap();
        // Torn final line, no trailing newline.
        write!(file, "2024-05-01 10:00:02 - CPU: 30%, CPU Te").unwrap();
        file.flush().unwrap();

        let series = Store::new(file.path()).load().unwrap();
        assert_eq!(series.len(), 2);
        assert!((series[0].cpu - 10.0).abs() < 1e-9);
        assert!((series[1].cpu - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_load_preserves_file_order() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        for cpu in [30, 10, 20] {
            writeln!(
                file,
                "2024-05-01 10:00:0{} - CPU: {}%, CPU Temps: {{}}, Memory: 40%, Disk: 70%",
                cpu / 10,
                cpu
            )
            .unwrap();
        }
        file.flush().unwrap();

        let series = Store::new(file.path()).load().unwrap();
        let cpus: Vec<f64> = series.iter().map(|r| r.cpu).collect();
        assert_eq!(cpus, vec![30.0, 10.0, 20.0]);
    }

    #[test]
    fn test_window_trailing_suffix() {
        // Spec scenario: records at 10:00:00, 10:00:30, 10:01:30, 10:03:00;
        // a 2-minute window at 10:03:00 keeps the last two.
        let series = vec![
            rec(ts(10, 0, 0), 10.0),
            rec(ts(10, 0, 30), 20.0),
            rec(ts(10, 1, 30), 90.0),
            rec(ts(10, 3, 0), 5.0),
        ];

        let win = window(&series, ts(10, 3, 0), Duration::minutes(2));
        assert_eq!(win.len(), 2);
        assert!((win[0].cpu - 90.0).abs() < 1e-9);
        assert!((win[1].cpu - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_window_cutoff_is_inclusive() {
        let series = vec![rec(ts(10, 1, 0), 1.0), rec(ts(10, 2, 0), 2.0)];

        // Cutoff falls exactly on the first record.
        let win = window(&series, ts(10, 2, 0), Duration::minutes(1));
        assert_eq!(win.len(), 2);
    }

    #[test]
    fn test_window_empty_when_all_stale() {
        let series = vec![rec(ts(9, 0, 0), 1.0)];
        let win = window(&series, ts(10, 0, 0), Duration::minutes(2));
        assert!(win.is_empty());
    }

    #[test]
    fn test_window_of_empty_series() {
        let win = window(&[], ts(10, 0, 0), Duration::minutes(2));
        assert!(win.is_empty());
    }
}
