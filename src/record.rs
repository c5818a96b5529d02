//! Log-line grammar: parsing and formatting of telemetry records.
//!
//! One record per line, append-only, UTF-8:
//!
//! ```text
//! 2024-05-01 10:00:00 - CPU: 12.5%, CPU Temps: {Core 0: 45.0, Core 1: 47.2}, Memory: 63.1%, Disk: 72.0%
//! ```
//!
//! Parsing is line-local and silent: anything that does not match the grammar
//! (including a torn final line from a writer caught mid-append) yields `None`
//! and is skipped by the store. The temperature component is a brace-delimited
//! map literal decoded by a dedicated tolerant parser — it is only ever text,
//! never evaluated.

use chrono::NaiveDateTime;
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::sync::LazyLock;

/// Timestamp format used by the log, exact.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

static LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?P<time>\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}) - CPU: (?P<cpu>[\d.]+)%, CPU Temps: (?P<temps>\{.*?\}), Memory: (?P<memory>[\d.]+)%, Disk: (?P<disk>[\d.]+)%",
    )
    .expect("log line pattern is valid")
});

/// One parsed snapshot of machine metrics at a timestamp.
///
/// Immutable once constructed; produced only by [`parse_line`] (readers) and
/// the sampler (writer side, via [`format_line`]).
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryRecord {
    /// When the sample was taken.
    pub timestamp: NaiveDateTime,
    /// Processor load, percent (0-100).
    pub cpu: f64,
    /// Memory in use, percent (0-100).
    pub memory: f64,
    /// Disk in use, percent (0-100).
    pub disk: f64,
    /// Named temperature sensors and their readings. May be empty when the
    /// platform reports no sensors.
    pub temperatures: BTreeMap<String, f64>,
}

impl TelemetryRecord {
    /// Mean of the temperature map, or 0.0 when it is empty.
    #[must_use]
    pub fn mean_temperature(&self) -> f64 {
        if self.temperatures.is_empty() {
            return 0.0;
        }
        self.temperatures.values().sum::<f64>() / self.temperatures.len() as f64
    }
}

/// Parses one log line into a record.
///
/// Returns `None` for anything that does not match the grammar: the file
/// preamble, a torn final line, a bad timestamp or numeric field, or a
/// malformed temperature literal. Rejection is deliberately silent — readers
/// skip the line and continue.
#[must_use]
pub fn parse_line(line: &str) -> Option<TelemetryRecord> {
    let caps = LINE_RE.captures(line)?;

    let timestamp = NaiveDateTime::parse_from_str(&caps["time"], TIMESTAMP_FORMAT).ok()?;
    let cpu = caps["cpu"].parse::<f64>().ok()?;
    let memory = caps["memory"].parse::<f64>().ok()?;
    let disk = caps["disk"].parse::<f64>().ok()?;
    let temperatures = parse_temperature_map(&caps["temps"])?;

    Some(TelemetryRecord { timestamp, cpu, memory, disk, temperatures })
}

/// Decodes the `{label: value, ...}` temperature literal.
///
/// Tolerant of the forms both producers emit: labels may be bare or wrapped
/// in single or double quotes (the value is taken after the *last* colon of a
/// pair, so labels may themselves contain colons). `{}` yields an empty map.
/// Anything else — stray braces, an empty label, a non-numeric value —
/// rejects the whole literal, which in turn rejects the line.
fn parse_temperature_map(text: &str) -> Option<BTreeMap<String, f64>> {
    let inner = text.strip_prefix('{')?.strip_suffix('}')?;
    if inner.contains(['{', '}']) {
        return None;
    }

    let mut map = BTreeMap::new();
    if inner.trim().is_empty() {
        return Some(map);
    }

    for pair in inner.split(',') {
        let (label, value) = pair.rsplit_once(':')?;
        let label = strip_quotes(label.trim());
        if label.is_empty() {
            return None;
        }
        let value = value.trim().parse::<f64>().ok()?;
        map.insert(label.to_string(), value);
    }

    Some(map)
}

/// Strips one matching pair of single or double quotes, if present.
fn strip_quotes(label: &str) -> &str {
    let bytes = label.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if (first == b'\'' && last == b'\'') || (first == b'"' && last == b'"') {
            return &label[1..label.len() - 1];
        }
    }
    label
}

/// Formats a record as one log line (no trailing newline).
///
/// Inverse of [`parse_line`]: `parse_line(&format_line(r))` recovers `r`
/// exactly, provided sensor labels contain no commas or braces.
#[must_use]
pub fn format_line(record: &TelemetryRecord) -> String {
    let mut temps = String::from("{");
    for (i, (label, value)) in record.temperatures.iter().enumerate() {
        if i > 0 {
            temps.push_str(", ");
        }
        let _ = write!(temps, "{label}: {value}");
    }
    temps.push('}');

    format!(
        "{} - CPU: {}%, CPU Temps: {}, Memory: {}%, Disk: {}%",
        record.timestamp.format(TIMESTAMP_FORMAT),
        record.cpu,
        temps,
        record.memory,
        record.disk,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn test_parse_valid_line() {
        let line = "2024-05-01 10:00:00 - CPU: 12.5%, CPU Temps: {Core 0: 45.0, Core 1: 47.2}, Memory: 63.1%, Disk: 72.0%";
        let record = parse_line(line).expect("line should parse");

        assert_eq!(record.timestamp, ts(10, 0, 0));
        assert!((record.cpu - 12.5).abs() < 1e-9);
        assert!((record.memory - 63.1).abs() < 1e-9);
        assert!((record.disk - 72.0).abs() < 1e-9);
        assert_eq!(record.temperatures.len(), 2);
        assert!((record.temperatures["Core 0"] - 45.0).abs() < 1e-9);
        assert!((record.temperatures["Core 1"] - 47.2).abs() < 1e-9);
    }

    #[test]
    fn test_parse_single_quoted_labels() {
        // The original producer writes dict repr with single-quoted keys.
        let line = "2024-05-01 10:00:00 - CPU: 3.0%, CPU Temps: {'Package id 0': 51.0, 'Core 0': 48.5}, Memory: 40.0%, Disk: 55.0%";
        let record = parse_line(line).expect("quoted labels should parse");

        assert_eq!(
            record.temperatures.keys().cloned().collect::<Vec<_>>(),
            vec!["Core 0".to_string(), "Package id 0".to_string()]
        );
    }

    #[test]
    fn test_parse_empty_temperature_map() {
        let line =
            "2024-05-01 10:00:00 - CPU: 5.0%, CPU Temps: {}, Memory: 10.0%, Disk: 20.0%";
        let record = parse_line(line).expect("empty map is valid");

        assert!(record.temperatures.is_empty());
        assert!((record.mean_temperature() - 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_parse_label_with_colon() {
        let line = "2024-05-01 10:00:00 - CPU: 5.0%, CPU Temps: {acpi: zone 0: 38.0}, Memory: 10.0%, Disk: 20.0%";
        let record = parse_line(line).expect("label with colon should parse");

        assert!((record.temperatures["acpi: zone 0"] - 38.0).abs() < 1e-9);
    }

    #[test]
    fn test_reject_preamble_lines() {
        assert!(parse_line("System Stats Log").is_none());
        assert!(parse_line("Time - CPU - Temps - Memory - Disk").is_none());
        assert!(parse_line("").is_none());
    }

    #[test]
    fn test_reject_torn_line() {
        // Writer caught mid-append: truncated before the disk field.
        let line = "2024-05-01 10:00:00 - CPU: 12.5%, CPU Temps: {Core 0: 45.0}, Memo";
        assert!(parse_line(line).is_none());
    }

    #[test]
    fn test_reject_bad_timestamp() {
        let line =
            "2024-13-01 10:00:00 - CPU: 5.0%, CPU Temps: {}, Memory: 10.0%, Disk: 20.0%";
        assert!(parse_line(line).is_none());
    }

    #[test]
    fn test_reject_malformed_temperature_literal() {
        // Non-numeric value.
        let line = "2024-05-01 10:00:00 - CPU: 5.0%, CPU Temps: {Core 0: warm}, Memory: 10.0%, Disk: 20.0%";
        assert!(parse_line(line).is_none());

        // Missing colon in a pair.
        let line = "2024-05-01 10:00:00 - CPU: 5.0%, CPU Temps: {Core 0}, Memory: 10.0%, Disk: 20.0%";
        assert!(parse_line(line).is_none());

        // Empty label.
        let line = "2024-05-01 10:00:00 - CPU: 5.0%, CPU Temps: {: 45.0}, Memory: 10.0%, Disk: 20.0%";
        assert!(parse_line(line).is_none());
    }

    #[test]
    fn test_reject_extra_dotted_numeric() {
        let line =
            "2024-05-01 10:00:00 - CPU: 1.2.3%, CPU Temps: {}, Memory: 10.0%, Disk: 20.0%";
        assert!(parse_line(line).is_none());
    }

    #[test]
    fn test_format_then_parse_round_trip() {
        let mut temperatures = BTreeMap::new();
        temperatures.insert("Core 0".to_string(), 45.25);
        temperatures.insert("Package id 0".to_string(), 51.0);

        let record = TelemetryRecord {
            timestamp: ts(10, 30, 15),
            cpu: 12.5,
            memory: 63.125,
            disk: 72.0,
            temperatures,
        };

        let parsed = parse_line(&format_line(&record)).expect("formatted line should parse");
        assert_eq!(parsed, record);
    }

    #[test]
    fn test_strip_quotes_edge_cases() {
        assert_eq!(strip_quotes("'Core 0'"), "Core 0");
        assert_eq!(strip_quotes("\"Core 0\""), "Core 0");
        assert_eq!(strip_quotes("Core 0"), "Core 0");
        // Mismatched quotes are left alone.
        assert_eq!(strip_quotes("'Core 0\""), "'Core 0\"");
        assert_eq!(strip_quotes("'"), "'");
    }
}
