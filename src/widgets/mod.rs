//! Rendering widgets for the dashboards.

pub mod chart;
pub mod dial;

pub use dial::Dial;
