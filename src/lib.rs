//! # statscope
//!
//! Log-driven system telemetry dashboards for the terminal.
//!
//! A sampler process appends one textual record per second to an append-only
//! log; two independent viewers re-parse that log on their own timers and
//! render it — analog gauges with an animated needle, and multi-panel
//! time-series charts over a trailing window. The processes share nothing but
//! the log file: one writer, up to two readers, each tolerating a torn final
//! line by ordinary parse rejection.
//!
//! ## Pipeline
//!
//! ```text
//! sampler → log file → record::parse_line → series::Store → aggregate → animate → dials/charts
//! ```
//!
//! Control flow is pull-based: each viewer re-triggers the whole
//! reload → window → aggregate → animate pipeline on its own tick, and runs
//! it to completion before the next tick is considered.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use statscope::gauges::GaugeApp;
//! use statscope::settings::Settings;
//!
//! let settings = Settings::load_or_default(Settings::default_path());
//! GaugeApp::new(settings).run()?;
//! ```

#![warn(missing_docs)]
// Allow unwrap() in tests only - banned in production code
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub use error::{Result, StatscopeError};

pub mod aggregate;
pub mod animate;
pub mod record;
pub mod series;
pub mod settings;
pub mod theme;

pub mod widgets;

pub mod charts;
pub mod gauges;
pub mod sampler;

/// Commonly used types.
pub mod prelude {
    pub use super::aggregate::{summarize, Metric, MetricSummary};
    pub use super::animate::Interpolation;
    pub use super::charts::ChartApp;
    pub use super::error::{Result, StatscopeError};
    pub use super::gauges::GaugeApp;
    pub use super::record::{format_line, parse_line, TelemetryRecord};
    pub use super::series::{window, Store};
    pub use super::settings::Settings;
}
