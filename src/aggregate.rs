//! Per-metric summary statistics over a window.

use crate::record::TelemetryRecord;

/// Metric selector for aggregation and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    /// Processor load, percent.
    Cpu,
    /// Memory in use, percent.
    Memory,
    /// Disk in use, percent.
    Disk,
    /// Aggregate temperature: the mean of a record's sensor map. Sensor-level
    /// detail is only used by the chart panels, never by the gauge path.
    Temperature,
}

/// All metrics, in display order.
pub const ALL_METRICS: [Metric; 4] =
    [Metric::Cpu, Metric::Memory, Metric::Disk, Metric::Temperature];

impl Metric {
    /// Display label for panel titles and gauges.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Metric::Cpu => "CPU",
            Metric::Memory => "Memory",
            Metric::Disk => "Disk",
            Metric::Temperature => "Temp",
        }
    }

    /// Extracts this metric's value from one record.
    ///
    /// For [`Metric::Temperature`] this is the mean of the record's sensor
    /// map; an empty map yields 0.0 (a failed sensor read upstream leaves the
    /// map empty, and that must not divide by zero).
    #[must_use]
    pub fn value_of(self, record: &TelemetryRecord) -> f64 {
        match self {
            Metric::Cpu => record.cpu,
            Metric::Memory => record.memory,
            Metric::Disk => record.disk,
            Metric::Temperature => record.mean_temperature(),
        }
    }
}

/// Summary of one metric over a window: last value plus window extremes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricSummary {
    /// Which metric this summarizes.
    pub metric: Metric,
    /// Value of the last record in the window.
    pub current: f64,
    /// Minimum over the window.
    pub min: f64,
    /// Maximum over the window.
    pub max: f64,
}

/// Summarizes one metric over a non-empty window.
///
/// `current` is taken from the last record; `min`/`max` range over every
/// record in the window.
///
/// # Panics
///
/// Panics if `window` is empty. Callers check for data first and defer
/// rendering — an empty window means "nothing to show yet", not a summary.
#[must_use]
pub fn summarize(window: &[TelemetryRecord], metric: Metric) -> MetricSummary {
    assert!(!window.is_empty(), "summarize requires a non-empty window");

    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut current = 0.0;
    for record in window {
        let value = metric.value_of(record);
        min = min.min(value);
        max = max.max(value);
        current = value;
    }

    MetricSummary { metric, current, min, max }
}
