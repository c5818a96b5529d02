//! Plot-point preparation for the time-series chart panels.
//!
//! `ratatui`'s `Chart` consumes `(f64, f64)` point slices, so the window is
//! flattened here: x is seconds since the first record in the window, y is
//! the metric value. The temperature panel carries one series per sensor
//! label, and the label set is derived from the records actually present —
//! sensors appear and disappear with the data, there is no fixed set.

use crate::aggregate::Metric;
use crate::record::TelemetryRecord;
use std::collections::BTreeSet;

/// Seconds from the first windowed record to each record, paired with the
/// metric's value. Empty input yields an empty series.
#[must_use]
pub fn metric_points(window: &[TelemetryRecord], metric: Metric) -> Vec<(f64, f64)> {
    let Some(first) = window.first() else {
        return Vec::new();
    };
    window
        .iter()
        .map(|r| {
            let x = (r.timestamp - first.timestamp).num_milliseconds() as f64 / 1000.0;
            (x, metric.value_of(r))
        })
        .collect()
}

/// The union of sensor labels present in the window, sorted.
#[must_use]
pub fn sensor_labels(window: &[TelemetryRecord]) -> Vec<String> {
    let labels: BTreeSet<&str> =
        window.iter().flat_map(|r| r.temperatures.keys().map(String::as_str)).collect();
    labels.into_iter().map(str::to_string).collect()
}

/// One `(x, y)` series per sensor label present in the window.
///
/// Records in which a sensor is absent contribute no point to that sensor's
/// series (the line simply has a gap in coverage, it is not zero-filled).
#[must_use]
pub fn sensor_points(window: &[TelemetryRecord]) -> Vec<(String, Vec<(f64, f64)>)> {
    let Some(first) = window.first() else {
        return Vec::new();
    };

    sensor_labels(window)
        .into_iter()
        .map(|label| {
            let points = window
                .iter()
                .filter_map(|r| {
                    let value = *r.temperatures.get(&label)?;
                    let x = (r.timestamp - first.timestamp).num_milliseconds() as f64 / 1000.0;
                    Some((x, value))
                })
                .collect();
            (label, points)
        })
        .collect()
}

/// Inclusive y bounds covering all given series, padded so a flat line does
/// not sit on the panel border. Defaults to 0..100 for empty input.
#[must_use]
pub fn y_bounds(series: &[&[(f64, f64)]]) -> [f64; 2] {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for points in series {
        for &(_, y) in *points {
            min = min.min(y);
            max = max.max(y);
        }
    }
    if !min.is_finite() || !max.is_finite() {
        return [0.0, 100.0];
    }
    let pad = ((max - min) * 0.1).max(1.0);
    [min - pad, max + pad]
}
